//! Multisig-authorized transactions and their merge protocol.
//!
//! Each cosigner usually holds their own copy: they all start from the same
//! unsigned [`MultisigTransaction`], sign locally, and exchange the encoded
//! bytes. [`MultisigTransaction::merge`] then folds the copies back into one.
//! Nothing is locked and nothing is resolved silently; two different
//! signatures for the same slot abort the merge.

use tracing::debug;

use super::{MultisigAccount, MultisigError, MultisigSig};
use crate::crypto::keys::Account;
use crate::encoding::{Canonical, DecodeError, MapBuilder, MapReader, Value};
use crate::identity::address::Address;
use crate::transaction::builder::Transaction;
use crate::transaction::signing::read_txn;

/// A transaction plus the signature arena of the multisig account that
/// authorizes it, encoded as `{msig, sgnr, txn}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigTransaction {
    txn: Transaction,
    msig: MultisigSig,
    auth_addr: Address,
}

impl MultisigTransaction {
    /// Starts with every slot empty. When the multisig address is not the
    /// sender, it is recorded as the authorizer.
    pub fn new(txn: Transaction, account: MultisigAccount) -> Self {
        let address = account.address();
        let auth_addr = if address == txn.sender() {
            Address::ZERO
        } else {
            address
        };
        Self {
            txn,
            msig: MultisigSig::new(account),
            auth_addr,
        }
    }

    /// Wraps a signature arena produced elsewhere.
    pub fn from_parts(txn: Transaction, msig: MultisigSig, auth_addr: Address) -> Self {
        Self {
            txn,
            msig,
            auth_addr,
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.txn
    }

    pub fn multisig(&self) -> &MultisigSig {
        &self.msig
    }

    pub fn account(&self) -> &MultisigAccount {
        self.msig.account()
    }

    pub fn auth_addr(&self) -> Address {
        self.auth_addr
    }

    pub fn id(&self) -> String {
        self.txn.id()
    }

    /// Signs the transaction with `account` into its slot.
    pub fn sign(&mut self, account: &Account) -> Result<(), MultisigError> {
        let index = self.msig.sign_message(account, &self.txn.bytes_to_sign())?;
        debug!(
            txid = %self.txn.id(),
            index,
            filled = self.msig.signature_count(),
            threshold = self.msig.account().threshold(),
            "signed multisig transaction"
        );
        Ok(())
    }

    pub fn signature_count(&self) -> usize {
        self.msig.signature_count()
    }

    /// Whether enough slots are filled to submit.
    pub fn is_ready(&self) -> bool {
        self.msig.meets_threshold()
    }

    /// Index-wise union of independently signed copies.
    ///
    /// All copies must carry the same transaction, account, and authorizer.
    /// The result does not depend on the order of `parts`, and merging a
    /// copy with itself changes nothing. Readiness is not checked here.
    pub fn merge(parts: &[MultisigTransaction]) -> Result<MultisigTransaction, MultisigError> {
        let (first, rest) = parts.split_first().ok_or(MultisigError::EmptyMerge)?;
        let mut merged = first.clone();
        let txn_bytes = merged.txn.to_canonical_bytes();
        for other in rest {
            if other.txn.to_canonical_bytes() != txn_bytes {
                return Err(MultisigError::MismatchedTransactions(
                    "underlying transactions differ".into(),
                ));
            }
            if other.msig.account() != merged.msig.account() {
                return Err(MultisigError::MismatchedTransactions(
                    "multisig descriptors differ".into(),
                ));
            }
            if other.auth_addr != merged.auth_addr {
                return Err(MultisigError::MismatchedTransactions(
                    "authorizing addresses differ".into(),
                ));
            }
            merged.msig.merge_from(&other.msig)?;
        }
        debug!(
            txid = %merged.txn.id(),
            parts = parts.len(),
            filled = merged.signature_count(),
            "merged multisig transactions"
        );
        Ok(merged)
    }

    /// Merges the canonical encodings of several copies.
    pub fn merge_encoded(parts: &[&[u8]]) -> Result<MultisigTransaction, MultisigError> {
        let decoded = parts
            .iter()
            .map(|bytes| MultisigTransaction::from_canonical_bytes(bytes))
            .collect::<Result<Vec<_>, _>>()?;
        Self::merge(&decoded)
    }
}

impl Canonical for MultisigTransaction {
    fn to_value(&self) -> Value {
        MapBuilder::new()
            .value("msig", self.msig.to_value())
            .fixed("sgnr", self.auth_addr.as_bytes())
            .value("txn", self.txn.to_value())
            .build()
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let mut r = MapReader::new(value, "stxn")?;
        let msig = r
            .take("msig")
            .ok_or_else(|| DecodeError::MissingField { field: r.field("msig") })
            .and_then(MultisigSig::from_value)?;
        let auth_addr = Address::new(r.fixed("sgnr")?);
        let txn = read_txn(&mut r)?;
        r.finish()?;
        Ok(Self {
            txn,
            msig,
            auth_addr,
        })
    }
}
