//! Collaborator interfaces.
//!
//! The core never talks to a network. Submitting transactions and holding
//! keys in a custodial wallet belong to services that implement the traits
//! below: a node client and a key custodian. Both are handed a
//! [`ClientConfig`](crate::config::ClientConfig) by whoever constructs
//! them; nothing here reads global state.
//!
//! The contract that matters: an envelope signed by a custodian must encode
//! to the same bytes as one signed locally with the same key.

use async_trait::async_trait;
use thiserror::Error;

use crate::crypto::keys::Account;
use crate::encoding::{Canonical, DecodeError};
use crate::identity::address::Address;
use crate::identity::derivation::MasterDerivationKey;
use crate::multisig::MultisigTransaction;
use crate::transaction::builder::Transaction;
use crate::transaction::envelope::SignedEnvelope;
use crate::transaction::signing::SignedTransaction;
use crate::transaction::types::SuggestedParams;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The service could not be reached or answered garbage.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service understood the request and refused it.
    #[error("rejected: {0}")]
    Rejected(String),

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("unknown key {0}")]
    UnknownKey(Address),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// A node that accepts signed transactions.
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Fee rate, validity window, and genesis data for new transactions.
    async fn suggested_params(&self) -> ClientResult<SuggestedParams>;

    /// Submits the canonical bytes of one or more concatenated envelopes
    /// and returns the id of the first transaction.
    async fn send_raw_transaction(&self, bytes: &[u8]) -> ClientResult<String>;

    async fn send_envelope(&self, envelope: &SignedEnvelope) -> ClientResult<String> {
        self.send_raw_transaction(&envelope.to_canonical_bytes()).await
    }

    /// Submits an atomic group as one concatenated payload.
    async fn send_group(&self, envelopes: &[SignedEnvelope]) -> ClientResult<String> {
        let mut bytes = Vec::new();
        for envelope in envelopes {
            bytes.extend_from_slice(&envelope.to_canonical_bytes());
        }
        self.send_raw_transaction(&bytes).await
    }
}

/// A custodial wallet holding keys derived from one master derivation key.
#[async_trait]
pub trait KeyCustodian: Send + Sync {
    /// Derives the next key and returns its address.
    async fn generate_key(&self) -> ClientResult<Address>;

    async fn list_keys(&self) -> ClientResult<Vec<Address>>;

    async fn export_key(&self, address: &Address) -> ClientResult<Account>;

    /// Signs with the sender's key, or with `signer` for a rekeyed sender.
    async fn sign_transaction(
        &self,
        txn: Transaction,
        signer: Option<Address>,
    ) -> ClientResult<SignedTransaction>;

    /// Adds the signature of `signer`, which must be held here and be one
    /// of the multisig keys.
    async fn sign_multisig_transaction(
        &self,
        mtxn: MultisigTransaction,
        signer: &Address,
    ) -> ClientResult<MultisigTransaction>;

    async fn export_master_derivation_key(&self) -> ClientResult<MasterDerivationKey>;
}
