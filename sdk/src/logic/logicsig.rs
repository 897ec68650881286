//! Logic signatures: programs that authorize transactions.
//!
//! A [`LogicSig`] is used in one of two modes:
//!
//! - **escrow**: no signature attached. The program's own address is the
//!   account, and the program alone decides what it may send.
//! - **delegated**: an ordinary account (single or multisig) signs
//!   `"Program" || program`, letting the program approve transactions on
//!   that account's behalf.
//!
//! [`LogicSigAccount`] pairs the logic sig with the key of a single
//! delegating signer, so the authorizing address is known without
//! guessing. [`LogicSigTransaction`] is the envelope that carries one.

use tracing::debug;

use super::program::{self, program_address_unchecked};
use super::LogicSigError;
use crate::config::PROGRAM_TAG;
use crate::crypto::hash::tagged;
use crate::crypto::keys::{Account, Signature};
use crate::crypto::signatures::verify;
use crate::encoding::value::expect_bytes;
use crate::encoding::{Canonical, DecodeError, MapBuilder, MapReader, Value};
use crate::identity::address::Address;
use crate::multisig::{MultisigAccount, MultisigSig};
use crate::transaction::builder::Transaction;
use crate::transaction::signing::read_txn;

// ---------------------------------------------------------------------------
// LogicSig
// ---------------------------------------------------------------------------

/// A program, its arguments, and an optional delegation.
///
/// Encoded as `{arg, l, msig, sig}`. At most one of `sig`/`msig` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicSig {
    program: Vec<u8>,
    args: Vec<Vec<u8>>,
    sig: Option<Signature>,
    msig: Option<MultisigSig>,
}

impl LogicSig {
    /// Undelegated logic sig. The program must pass the sanity check.
    pub fn new(program: Vec<u8>, args: Vec<Vec<u8>>) -> Result<Self, LogicSigError> {
        program::program_address(&program)?;
        Ok(Self {
            program,
            args,
            sig: None,
            msig: None,
        })
    }

    pub fn program(&self) -> &[u8] {
        &self.program
    }

    pub fn args(&self) -> &[Vec<u8>] {
        &self.args
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.sig.as_ref()
    }

    pub fn multisig(&self) -> Option<&MultisigSig> {
        self.msig.as_ref()
    }

    /// The escrow address of the program.
    pub fn program_address(&self) -> Address {
        program_address_unchecked(&self.program)
    }

    /// `"Program" || program`: what a delegating signer signs.
    pub fn bytes_to_sign(&self) -> Vec<u8> {
        tagged(PROGRAM_TAG, &self.program)
    }

    pub fn is_delegated(&self) -> bool {
        self.sig.is_some() || self.msig.is_some()
    }

    /// Checks that this logic sig may authorize for `authorizer`.
    ///
    /// Escrow mode needs `authorizer` to be the program address. A single
    /// delegation must verify under `authorizer`'s key. A multisig
    /// delegation must meet its threshold and belong to `authorizer`.
    pub fn verify(&self, authorizer: &Address) -> Result<(), LogicSigError> {
        program::program_address(&self.program)?;
        match (&self.sig, &self.msig) {
            (Some(_), Some(_)) => Err(LogicSigError::BothDelegations),
            (None, None) => {
                let expected = self.program_address();
                if expected == *authorizer {
                    Ok(())
                } else {
                    Err(LogicSigError::AddressMismatch {
                        expected,
                        found: *authorizer,
                    })
                }
            }
            (Some(sig), None) => {
                if verify(authorizer.as_bytes(), &self.bytes_to_sign(), sig) {
                    Ok(())
                } else {
                    Err(LogicSigError::InvalidDelegation)
                }
            }
            (None, Some(msig)) => {
                let expected = msig.account().address();
                if expected != *authorizer {
                    return Err(LogicSigError::AddressMismatch {
                        expected,
                        found: *authorizer,
                    });
                }
                msig.verify(&self.bytes_to_sign())?;
                Ok(())
            }
        }
    }
}

impl Canonical for LogicSig {
    fn to_value(&self) -> Value {
        let args = self.args.iter().map(|a| Value::Bytes(a.clone())).collect();
        let msig = self.msig.as_ref().map(Canonical::to_value);
        let mut builder = MapBuilder::new()
            .array("arg", args)
            .bytes("l", &self.program)
            .optional_fixed("sig", self.sig.as_ref().map(|s| s.as_bytes().as_slice()));
        if let Some(msig) = msig {
            builder = builder.value("msig", msig);
        }
        builder.build()
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let mut r = MapReader::new(value, "lsig")?;
        let args = r
            .array("arg")?
            .into_iter()
            .enumerate()
            .map(|(i, v)| expect_bytes(v, format!("lsig.arg[{}]", i)))
            .collect::<Result<Vec<_>, _>>()?;
        let program = r.bytes("l")?;
        if program.is_empty() {
            return Err(DecodeError::MissingField { field: r.field("l") });
        }
        let sig = r.optional_fixed::<64>("sig")?.map(Signature::from_bytes);
        let msig = r.take("msig").map(MultisigSig::from_value).transpose()?;
        if sig.is_some() && msig.is_some() {
            return Err(DecodeError::InvalidField {
                field: "lsig".into(),
                reason: "both sig and msig are present".into(),
            });
        }
        r.finish()?;
        Ok(Self {
            program,
            args,
            sig,
            msig,
        })
    }
}

// ---------------------------------------------------------------------------
// LogicSigAccount
// ---------------------------------------------------------------------------

/// A logic sig together with the key of its single delegating signer.
///
/// Encoded as `{lsig, sigkey}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicSigAccount {
    lsig: LogicSig,
    sigkey: Option<Address>,
}

impl LogicSigAccount {
    /// Fails with [`ProgramError::SanityWarning`](super::ProgramError) for
    /// bytes that do not look like a program.
    pub fn new(program: Vec<u8>, args: Vec<Vec<u8>>) -> Result<Self, LogicSigError> {
        Ok(Self {
            lsig: LogicSig::new(program, args)?,
            sigkey: None,
        })
    }

    pub fn lsig(&self) -> &LogicSig {
        &self.lsig
    }

    /// The single delegating signer, if any.
    pub fn signing_key(&self) -> Option<Address> {
        self.sigkey
    }

    pub fn is_delegated(&self) -> bool {
        self.lsig.is_delegated()
    }

    /// The account this logic sig authorizes for: the delegating signer,
    /// the delegating multisig account, or the program itself.
    pub fn address(&self) -> Address {
        if let Some(key) = self.sigkey {
            return key;
        }
        match &self.lsig.msig {
            Some(msig) => msig.account().address(),
            None => self.lsig.program_address(),
        }
    }

    /// Delegates to `account`.
    pub fn sign(&mut self, account: &Account) -> Result<(), LogicSigError> {
        if self.lsig.msig.is_some() {
            return Err(LogicSigError::AlreadyDelegated);
        }
        self.lsig.sig = Some(account.sign_raw(&self.lsig.bytes_to_sign()));
        self.sigkey = Some(account.address());
        debug!(signer = %account.address(), "delegated logic sig");
        Ok(())
    }

    /// Delegates to a multisig account, adding `account`'s signature as
    /// the first one.
    pub fn sign_multisig(
        &mut self,
        multisig: MultisigAccount,
        account: &Account,
    ) -> Result<(), LogicSigError> {
        if self.lsig.sig.is_some() {
            return Err(LogicSigError::AlreadyDelegated);
        }
        let mut msig = MultisigSig::new(multisig);
        msig.sign_message(account, &self.lsig.bytes_to_sign())?;
        debug!(
            multisig = %msig.account().address(),
            signer = %account.address(),
            "started multisig delegation of logic sig"
        );
        self.lsig.msig = Some(msig);
        Ok(())
    }

    /// Adds another cosigner to an existing multisig delegation.
    pub fn append_to_multisig(&mut self, account: &Account) -> Result<(), LogicSigError> {
        let message = self.lsig.bytes_to_sign();
        let msig = self
            .lsig
            .msig
            .as_mut()
            .ok_or(LogicSigError::NotMultisigDelegated)?;
        msig.sign_message(account, &message)?;
        Ok(())
    }

    /// Whether the logic sig authorizes for [`LogicSigAccount::address`].
    pub fn verify(&self) -> bool {
        self.lsig.verify(&self.address()).is_ok()
    }
}

impl Canonical for LogicSigAccount {
    fn to_value(&self) -> Value {
        MapBuilder::new()
            .value("lsig", self.lsig.to_value())
            .optional_fixed("sigkey", self.sigkey.as_ref().map(|a| a.as_bytes().as_slice()))
            .build()
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let mut r = MapReader::new(value, "lsigaccount")?;
        let lsig = r
            .take("lsig")
            .ok_or_else(|| DecodeError::MissingField { field: r.field("lsig") })
            .and_then(LogicSig::from_value)?;
        let sigkey = r.optional_fixed::<32>("sigkey")?.map(Address::new);
        r.finish()?;
        if lsig.sig.is_some() != sigkey.is_some() {
            return Err(DecodeError::InvalidField {
                field: "lsigaccount.sigkey".into(),
                reason: "signing key must accompany a single delegation".into(),
            });
        }
        Ok(Self { lsig, sigkey })
    }
}

// ---------------------------------------------------------------------------
// LogicSigTransaction
// ---------------------------------------------------------------------------

/// A transaction authorized by a logic sig, encoded as `{lsig, sgnr, txn}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicSigTransaction {
    txn: Transaction,
    lsig: LogicSig,
    auth_addr: Address,
}

impl LogicSigTransaction {
    /// Records the account's address as authorizer when it is not the
    /// sender.
    pub fn new(txn: Transaction, account: &LogicSigAccount) -> Self {
        let address = account.address();
        let auth_addr = if address == txn.sender() {
            Address::ZERO
        } else {
            address
        };
        debug!(
            txid = %txn.id(),
            delegated = account.is_delegated(),
            rekeyed = !auth_addr.is_zero(),
            "wrapped transaction with logic sig"
        );
        Self {
            txn,
            lsig: account.lsig.clone(),
            auth_addr,
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.txn
    }

    pub fn lsig(&self) -> &LogicSig {
        &self.lsig
    }

    pub fn auth_addr(&self) -> Address {
        self.auth_addr
    }

    /// The address the logic sig has to authorize for.
    pub fn authorizer(&self) -> Address {
        if self.auth_addr.is_zero() {
            self.txn.sender()
        } else {
            self.auth_addr
        }
    }

    pub fn id(&self) -> String {
        self.txn.id()
    }

    pub fn verify(&self) -> Result<(), LogicSigError> {
        self.lsig.verify(&self.authorizer())
    }
}

impl Canonical for LogicSigTransaction {
    fn to_value(&self) -> Value {
        MapBuilder::new()
            .value("lsig", self.lsig.to_value())
            .fixed("sgnr", self.auth_addr.as_bytes())
            .value("txn", self.txn.to_value())
            .build()
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let mut r = MapReader::new(value, "stxn")?;
        let lsig = r
            .take("lsig")
            .ok_or_else(|| DecodeError::MissingField { field: r.field("lsig") })
            .and_then(LogicSig::from_value)?;
        let auth_addr = Address::new(r.fixed("sgnr")?);
        let txn = read_txn(&mut r)?;
        r.finish()?;
        Ok(Self {
            txn,
            lsig,
            auth_addr,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::ProgramError;
    use crate::transaction::builder::TransactionBuilder;
    use crate::transaction::types::{SuggestedParams, TransactionKind};

    const PROGRAM: [u8; 5] = [0x01, 0x20, 0x01, 0x01, 0x22];

    fn txn_from(sender: Address) -> Transaction {
        let params = SuggestedParams {
            fee: 1000,
            first_valid: 1,
            last_valid: 100,
            genesis_hash: [3; 32],
            genesis_id: String::new(),
            flat_fee: true,
        };
        TransactionBuilder::new(sender, &params, TransactionKind::payment(Address::new([9; 32]), 5))
            .build()
            .unwrap()
    }

    fn cosigners() -> Vec<Account> {
        (1..=3u8).map(|i| Account::from_seed(&[i; 32])).collect()
    }

    fn multisig() -> MultisigAccount {
        MultisigAccount::new(1, 2, cosigners().iter().map(Account::address).collect()).unwrap()
    }

    #[test]
    fn sanity_check_on_creation() {
        let err = LogicSigAccount::new(b"".to_vec(), vec![]).unwrap_err();
        assert!(matches!(
            err,
            LogicSigError::Program(ProgramError::SanityWarning { issue: program::EMPTY_PROGRAM, .. })
        ));
        assert!(LogicSigAccount::new(PROGRAM.to_vec(), vec![]).is_ok());
    }

    #[test]
    fn escrow_account() {
        let account = LogicSigAccount::new(PROGRAM.to_vec(), vec![b"x".to_vec()]).unwrap();
        assert!(!account.is_delegated());
        assert_eq!(account.address(), program_address_unchecked(&PROGRAM));
        assert!(account.verify());

        let stxn = LogicSigTransaction::new(txn_from(account.address()), &account);
        assert!(stxn.auth_addr().is_zero());
        assert!(stxn.verify().is_ok());
    }

    #[test]
    fn escrow_cannot_spend_for_others() {
        let account = LogicSigAccount::new(PROGRAM.to_vec(), vec![]).unwrap();
        let value = MapBuilder::new()
            .value("lsig", account.lsig().to_value())
            .value("txn", txn_from(Address::new([7; 32])).to_value())
            .build();
        let stxn = LogicSigTransaction::from_value(value).unwrap();
        assert!(matches!(
            stxn.verify(),
            Err(LogicSigError::AddressMismatch { .. })
        ));
    }

    #[test]
    fn single_delegation() {
        let signer = Account::from_seed(&[1; 32]);
        let mut account = LogicSigAccount::new(PROGRAM.to_vec(), vec![]).unwrap();
        account.sign(&signer).unwrap();
        assert!(account.is_delegated());
        assert_eq!(account.address(), signer.address());
        assert!(account.verify());

        let stxn = LogicSigTransaction::new(txn_from(signer.address()), &account);
        assert!(stxn.verify().is_ok());
        let back = LogicSigTransaction::from_canonical_bytes(&stxn.to_canonical_bytes()).unwrap();
        assert_eq!(back, stxn);
    }

    #[test]
    fn multisig_delegation() {
        let signers = cosigners();
        let mut account = LogicSigAccount::new(PROGRAM.to_vec(), vec![]).unwrap();
        account.sign_multisig(multisig(), &signers[0]).unwrap();
        assert_eq!(account.address(), multisig().address());
        assert!(!account.verify());

        account.append_to_multisig(&signers[2]).unwrap();
        assert!(account.verify());
        assert!(matches!(account.sign(&signers[0]), Err(LogicSigError::AlreadyDelegated)));
    }

    #[test]
    fn append_without_multisig() {
        let mut account = LogicSigAccount::new(PROGRAM.to_vec(), vec![]).unwrap();
        assert!(matches!(
            account.append_to_multisig(&cosigners()[0]),
            Err(LogicSigError::NotMultisigDelegated)
        ));
    }

    #[test]
    fn rekeyed_sender_records_authorizer() {
        let signer = Account::from_seed(&[1; 32]);
        let mut account = LogicSigAccount::new(PROGRAM.to_vec(), vec![]).unwrap();
        account.sign(&signer).unwrap();
        let stxn = LogicSigTransaction::new(txn_from(Address::new([4; 32])), &account);
        assert_eq!(stxn.auth_addr(), signer.address());
        assert!(stxn.verify().is_ok());
    }

    #[test]
    fn account_roundtrip() {
        let mut account = LogicSigAccount::new(PROGRAM.to_vec(), vec![vec![], b"a".to_vec()]).unwrap();
        account.sign(&Account::from_seed(&[1; 32])).unwrap();
        let bytes = account.to_canonical_bytes();
        let back = LogicSigAccount::from_canonical_bytes(&bytes).unwrap();
        assert_eq!(back, account);
        assert_eq!(back.lsig().args()[0], Vec::<u8>::new());
    }

    #[test]
    fn decode_rejects_both_delegations() {
        let signers = cosigners();
        let mut account = LogicSigAccount::new(PROGRAM.to_vec(), vec![]).unwrap();
        account.sign_multisig(multisig(), &signers[0]).unwrap();
        let mut value = account.lsig().to_value();
        if let Value::Map(entries) = &mut value {
            entries.insert("sig".into(), Value::Bytes(vec![1; 64]));
        }
        assert!(matches!(
            LogicSig::from_value(value),
            Err(DecodeError::InvalidField { .. })
        ));
    }
}
