//! Transaction signing with Ed25519 accounts.
//!
//! Signing is a separate step from building because the key may not be
//! around at construction time (a custodial wallet, another party). The
//! signed message is always `"TX" || canonical(txn)`, the same bytes the
//! transaction id hashes.
//!
//! [`Transaction::sign`] takes the transaction by value. A signed
//! transaction cannot be edited without going back through the builder,
//! which would produce a different transaction anyway.

use data_encoding::BASE32_NOPAD;
use tracing::debug;

use super::builder::Transaction;
use crate::config::TX_TAG;
use crate::crypto::hash::{hash_with_tag, tagged};
use crate::crypto::keys::{Account, Signature};
use crate::encoding::{Canonical, DecodeError, MapBuilder, MapReader, Value};
use crate::identity::address::Address;

impl Transaction {
    /// `"TX" || canonical(txn)`: the exact message every signer signs.
    pub fn bytes_to_sign(&self) -> Vec<u8> {
        tagged(TX_TAG, &self.to_canonical_bytes())
    }

    /// Raw 32-byte transaction id.
    pub fn raw_id(&self) -> [u8; 32] {
        hash_with_tag(TX_TAG, &self.to_canonical_bytes())
    }

    /// Transaction id as 52 base32 characters.
    pub fn id(&self) -> String {
        BASE32_NOPAD.encode(&self.raw_id())
    }

    /// Signs and wraps the transaction. When `account` is not the sender
    /// (a rekeyed sender), its address is recorded as the authorizer.
    pub fn sign(self, account: &Account) -> SignedTransaction {
        let signature = account.sign_raw(&self.bytes_to_sign());
        let signer = account.address();
        let auth_addr = if signer == self.header.sender {
            Address::ZERO
        } else {
            signer
        };
        debug!(
            txid = %self.id(),
            tx_type = %self.tx_type(),
            rekeyed = !auth_addr.is_zero(),
            "signed transaction"
        );
        SignedTransaction {
            txn: self,
            signature,
            auth_addr,
        }
    }
}

/// Free-function form of [`Transaction::sign`].
pub fn sign_transaction(txn: Transaction, account: &Account) -> SignedTransaction {
    txn.sign(account)
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// A transaction with a single Ed25519 signature, encoded as
/// `{sgnr, sig, txn}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    txn: Transaction,
    signature: Signature,
    auth_addr: Address,
}

impl SignedTransaction {
    /// Wraps a signature produced elsewhere (a custodial wallet, say).
    /// `auth_addr` is [`Address::ZERO`] when the sender signed.
    pub fn from_parts(txn: Transaction, signature: Signature, auth_addr: Address) -> Self {
        Self {
            txn,
            signature,
            auth_addr,
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.txn
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The rekeyed authorizer, or [`Address::ZERO`].
    pub fn auth_addr(&self) -> Address {
        self.auth_addr
    }

    /// The address whose key must have produced the signature.
    pub fn signer(&self) -> Address {
        if self.auth_addr.is_zero() {
            self.txn.header.sender
        } else {
            self.auth_addr
        }
    }

    pub fn id(&self) -> String {
        self.txn.id()
    }
}

impl Canonical for SignedTransaction {
    fn to_value(&self) -> Value {
        MapBuilder::new()
            .fixed("sgnr", self.auth_addr.as_bytes())
            .fixed("sig", self.signature.as_bytes())
            .value("txn", self.txn.to_value())
            .build()
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let mut r = MapReader::new(value, "stxn")?;
        let signature = r
            .optional_fixed::<64>("sig")?
            .map(Signature::from_bytes)
            .ok_or_else(|| DecodeError::MissingField { field: r.field("sig") })?;
        let auth_addr = Address::new(r.fixed("sgnr")?);
        let txn = read_txn(&mut r)?;
        r.finish()?;
        Ok(Self {
            txn,
            signature,
            auth_addr,
        })
    }
}

/// Pulls the mandatory `txn` entry out of an envelope map.
pub(crate) fn read_txn(r: &mut MapReader) -> Result<Transaction, DecodeError> {
    let value = r
        .take("txn")
        .ok_or_else(|| DecodeError::MissingField { field: r.field("txn") })?;
    Transaction::from_value(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
