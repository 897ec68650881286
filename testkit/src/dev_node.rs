//! In-memory development node.
//!
//! Accepts signed transactions the way a real node would before consensus
//! gets involved: decode, verify every authorization, check the validity
//! window, genesis, fee, and group, then park the envelope in a pending
//! pool. Nothing is ever executed; balances do not exist here.
//!
//! ## Design
//!
//! - `parking_lot::RwLock` protects the node state. Submissions are rare
//!   compared to reads in the tests that use this.
//! - A payload of several concatenated envelopes is one atomic group: it is
//!   accepted or rejected as a whole.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use algosdk_core::client::{ClientError, ClientResult, NodeClient};
use algosdk_core::config::{ClientConfig, MIN_TXN_FEE};
use algosdk_core::encoding::{decode_concatenated, Canonical};
use algosdk_core::transaction::{
    verify_envelope, verify_group, SignedEnvelope, SuggestedParams, Transaction,
};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Network parameters of the simulated chain.
///
/// Deserializable so fixtures can describe a network in JSON. The genesis
/// hash is written in standard base64, the form nodes report it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevNodeParams {
    pub genesis_id: String,
    #[serde(with = "genesis_hash_base64")]
    pub genesis_hash: [u8; 32],
    /// Per-byte fee rate handed out in suggested params.
    pub fee_per_byte: u64,
    /// Round the node starts at.
    pub first_round: u64,
    /// How many rounds past the current one a suggested validity window
    /// reaches.
    pub validity_window: u64,
    /// Minimum fee per transaction. Groups may pool fees.
    pub min_fee: u64,
}

impl Default for DevNodeParams {
    fn default() -> Self {
        Self {
            genesis_id: "devnet-v1".into(),
            genesis_hash: [0x5a; 32],
            fee_per_byte: 0,
            first_round: 1000,
            validity_window: 1000,
            min_fee: MIN_TXN_FEE,
        }
    }
}

mod genesis_hash_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let text = String::deserialize(deserializer)?;
        let bytes = STANDARD.decode(text.as_bytes()).map_err(de::Error::custom)?;
        <[u8; 32]>::try_from(bytes.as_slice())
            .map_err(|_| de::Error::invalid_length(bytes.len(), &"32 bytes"))
    }
}

// ---------------------------------------------------------------------------
// DevNode
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct NodeState {
    round: u64,
    pending: BTreeMap<String, SignedEnvelope>,
    /// Submission order of pending ids.
    order: Vec<String>,
}

#[derive(Debug)]
pub struct DevNode {
    config: ClientConfig,
    params: DevNodeParams,
    state: RwLock<NodeState>,
}

impl DevNode {
    pub fn new(config: ClientConfig, params: DevNodeParams) -> Self {
        info!(
            address = %config.address,
            genesis_id = %params.genesis_id,
            round = params.first_round,
            "dev node started"
        );
        let state = NodeState {
            round: params.first_round,
            ..NodeState::default()
        };
        Self {
            config,
            params,
            state: RwLock::new(state),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn round(&self) -> u64 {
        self.state.read().round
    }

    /// Moves the chain forward by `rounds`.
    pub fn advance(&self, rounds: u64) -> u64 {
        let mut state = self.state.write();
        state.round = state.round.saturating_add(rounds);
        state.round
    }

    pub fn pending_count(&self) -> usize {
        self.state.read().order.len()
    }

    /// Pending envelopes in submission order.
    pub fn pending(&self) -> Vec<SignedEnvelope> {
        let state = self.state.read();
        state
            .order
            .iter()
            .filter_map(|id| state.pending.get(id).cloned())
            .collect()
    }

    pub fn pending_by_id(&self, txid: &str) -> Option<SignedEnvelope> {
        self.state.read().pending.get(txid).cloned()
    }

    fn check_transaction(&self, txn: &Transaction, round: u64) -> ClientResult<()> {
        let header = txn.header();
        if header.genesis_hash != self.params.genesis_hash {
            return Err(ClientError::Rejected("genesis hash mismatch".into()));
        }
        if !header.genesis_id.is_empty() && header.genesis_id != self.params.genesis_id {
            return Err(ClientError::Rejected(format!(
                "genesis id {} does not match {}",
                header.genesis_id, self.params.genesis_id
            )));
        }
        if round < header.first_valid || round > header.last_valid {
            return Err(ClientError::Rejected(format!(
                "round {} outside validity window [{}, {}]",
                round, header.first_valid, header.last_valid
            )));
        }
        Ok(())
    }

    fn admit(&self, envelopes: Vec<SignedEnvelope>) -> ClientResult<String> {
        let first = envelopes
            .first()
            .map(SignedEnvelope::id)
            .ok_or_else(|| ClientError::Rejected("empty payload".into()))?;

        for envelope in &envelopes {
            verify_envelope(envelope).map_err(|e| {
                warn!(txid = %envelope.id(), kind = envelope.kind(), error = %e, "rejected envelope");
                ClientError::Rejected(e.to_string())
            })?;
        }

        if envelopes.len() > 1 {
            let txns: Vec<Transaction> = envelopes.iter().map(|e| e.transaction().clone()).collect();
            verify_group(&txns).map_err(|e| ClientError::Rejected(e.to_string()))?;
        }

        let total_fee = envelopes
            .iter()
            .try_fold(0u64, |acc, e| acc.checked_add(e.transaction().fee()))
            .ok_or_else(|| ClientError::Rejected("fee overflow".into()))?;
        let required = self.params.min_fee.saturating_mul(envelopes.len() as u64);
        if total_fee < required {
            return Err(ClientError::Rejected(format!(
                "fees {} below required {}",
                total_fee, required
            )));
        }

        let mut state = self.state.write();
        for envelope in &envelopes {
            self.check_transaction(envelope.transaction(), state.round)?;
            if state.pending.contains_key(&envelope.id()) {
                return Err(ClientError::Rejected(format!(
                    "transaction {} already pending",
                    envelope.id()
                )));
            }
        }
        for envelope in envelopes {
            let id = envelope.id();
            debug!(txid = %id, kind = envelope.kind(), "admitted transaction");
            state.order.push(id.clone());
            state.pending.insert(id, envelope);
        }
        Ok(first)
    }
}

#[async_trait]
impl NodeClient for DevNode {
    async fn suggested_params(&self) -> ClientResult<SuggestedParams> {
        let round = self.round();
        Ok(SuggestedParams {
            fee: self.params.fee_per_byte,
            first_valid: round,
            last_valid: round + self.params.validity_window,
            genesis_hash: self.params.genesis_hash,
            genesis_id: self.params.genesis_id.clone(),
            flat_fee: false,
        })
    }

    async fn send_raw_transaction(&self, bytes: &[u8]) -> ClientResult<String> {
        let envelopes = decode_concatenated(bytes)?
            .into_iter()
            .map(SignedEnvelope::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        self.admit(envelopes)
    }
}
