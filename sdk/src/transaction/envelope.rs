//! The signed-transaction envelope in all three forms.
//!
//! On the wire a signed transaction is a map with `txn`, an optional `sgnr`,
//! and exactly one authorization: `sig`, `msig`, or `lsig`. Code that
//! receives bytes from elsewhere (a node, a wallet, a file) does not know
//! which form it has, so [`SignedEnvelope`] decodes any of them and refuses
//! maps that carry none or several.

use crate::encoding::{Canonical, DecodeError, Value};
use crate::identity::address::Address;
use crate::logic::LogicSigTransaction;
use crate::multisig::MultisigTransaction;

use super::builder::Transaction;
use super::signing::SignedTransaction;

const AUTHORIZATIONS: [&str; 3] = ["sig", "msig", "lsig"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignedEnvelope {
    Single(SignedTransaction),
    Multisig(MultisigTransaction),
    Logic(LogicSigTransaction),
}

impl SignedEnvelope {
    pub fn transaction(&self) -> &Transaction {
        match self {
            SignedEnvelope::Single(s) => s.transaction(),
            SignedEnvelope::Multisig(m) => m.transaction(),
            SignedEnvelope::Logic(l) => l.transaction(),
        }
    }

    /// The `sgnr` field, [`Address::ZERO`] when the sender authorizes.
    pub fn auth_addr(&self) -> Address {
        match self {
            SignedEnvelope::Single(s) => s.auth_addr(),
            SignedEnvelope::Multisig(m) => m.auth_addr(),
            SignedEnvelope::Logic(l) => l.auth_addr(),
        }
    }

    /// The account whose authorization is being claimed.
    pub fn authorizer(&self) -> Address {
        let auth = self.auth_addr();
        if auth.is_zero() {
            self.transaction().sender()
        } else {
            auth
        }
    }

    pub fn id(&self) -> String {
        self.transaction().id()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SignedEnvelope::Single(_) => "sig",
            SignedEnvelope::Multisig(_) => "msig",
            SignedEnvelope::Logic(_) => "lsig",
        }
    }
}

impl From<SignedTransaction> for SignedEnvelope {
    fn from(s: SignedTransaction) -> Self {
        SignedEnvelope::Single(s)
    }
}

impl From<MultisigTransaction> for SignedEnvelope {
    fn from(m: MultisigTransaction) -> Self {
        SignedEnvelope::Multisig(m)
    }
}

impl From<LogicSigTransaction> for SignedEnvelope {
    fn from(l: LogicSigTransaction) -> Self {
        SignedEnvelope::Logic(l)
    }
}

impl Canonical for SignedEnvelope {
    fn to_value(&self) -> Value {
        match self {
            SignedEnvelope::Single(s) => s.to_value(),
            SignedEnvelope::Multisig(m) => m.to_value(),
            SignedEnvelope::Logic(l) => l.to_value(),
        }
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let present: Vec<&str> = match &value {
            Value::Map(entries) => AUTHORIZATIONS
                .iter()
                .copied()
                .filter(|k| entries.contains_key(*k))
                .collect(),
            other => {
                return Err(DecodeError::WrongType {
                    field: "stxn".into(),
                    expected: "map",
                    found: other.kind(),
                })
            }
        };
        match present.as_slice() {
            ["sig"] => SignedTransaction::from_value(value).map(SignedEnvelope::Single),
            ["msig"] => MultisigTransaction::from_value(value).map(SignedEnvelope::Multisig),
            ["lsig"] => LogicSigTransaction::from_value(value).map(SignedEnvelope::Logic),
            [] => Err(DecodeError::MissingField {
                field: "stxn.sig".into(),
            }),
            _ => Err(DecodeError::InvalidField {
                field: "stxn".into(),
                reason: format!("more than one authorization: {}", present.join(", ")),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::Account;
    use crate::encoding::MapBuilder;
    use crate::logic::LogicSigAccount;
    use crate::multisig::MultisigAccount;
    use crate::transaction::builder::TransactionBuilder;
    use crate::transaction::types::{SuggestedParams, TransactionKind};

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

    #[test]
    fn decodes_each_form() {
        let account = Account::from_seed(&[1; 32]);
        let single: SignedEnvelope = txn_from(account.address()).sign(&account).into();

        let msig_account = MultisigAccount::new(1, 1, vec![account.address()]).unwrap();
        let mut m = MultisigTransaction::new(txn_from(msig_account.address()), msig_account);
        m.sign(&account).unwrap();
        let multi: SignedEnvelope = m.into();

        let lsig = LogicSigAccount::new(vec![0x01, 0x20, 0x01, 0x01, 0x22], vec![]).unwrap();
        let logic: SignedEnvelope = LogicSigTransaction::new(txn_from(lsig.address()), &lsig).into();

        for envelope in [single, multi, logic] {
            let back = SignedEnvelope::from_canonical_bytes(&envelope.to_canonical_bytes()).unwrap();
            assert_eq!(back.kind(), envelope.kind());
            assert_eq!(back, envelope);
        }
    }

    #[test]
    fn rejects_missing_authorization() {
        let value = MapBuilder::new()
            .value("txn", txn_from(Address::new([2; 32])).to_value())
            .build();
        assert!(matches!(
            SignedEnvelope::from_value(value),
            Err(DecodeError::MissingField { .. })
        ));
    }

    #[test]
    fn rejects_two_authorizations() {
        let account = Account::from_seed(&[1; 32]);
        let mut value = txn_from(account.address()).sign(&account).to_value();
        let lsig = LogicSigAccount::new(vec![0x01, 0x20, 0x01, 0x01, 0x22], vec![]).unwrap();
        if let Value::Map(entries) = &mut value {
            entries.insert("lsig".into(), lsig.lsig().to_value());
        }
        assert!(matches!(
            SignedEnvelope::from_value(value),
            Err(DecodeError::InvalidField { .. })
        ));
    }

    #[test]
    fn authorizer_falls_back_to_sender() {
        let account = Account::from_seed(&[1; 32]);
        let envelope: SignedEnvelope = txn_from(account.address()).sign(&account).into();
        assert_eq!(envelope.authorizer(), account.address());
        let rekeyed: SignedEnvelope = txn_from(Address::new([5; 32])).sign(&account).into();
        assert_eq!(rekeyed.authorizer(), account.address());
    }
}
