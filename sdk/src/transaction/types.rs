//! Core type definitions for transactions.
//!
//! The per-type payloads are plain structs with public fields and a
//! `Default`, so callers can fill in exactly what they need and leave the
//! rest zero. Zero is also what the encoder leaves out, so an untouched
//! field costs nothing on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{METADATA_HASH_LENGTH, STATE_PROOF_KEY_LENGTH};
use crate::identity::address::Address;

// ---------------------------------------------------------------------------
// SuggestedParams
// ---------------------------------------------------------------------------

/// Network parameters a transaction is built against, as returned by a
/// node's `/v2/transactions/params` endpoint.
///
/// `fee` is a per-byte rate unless `flat_fee` is set, in which case it is
/// the exact fee to pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SuggestedParams {
    pub fee: u64,
    #[serde(rename = "first-round")]
    pub first_valid: u64,
    #[serde(rename = "last-round")]
    pub last_valid: u64,
    #[serde(with = "b64_hash")]
    pub genesis_hash: [u8; 32],
    #[serde(default)]
    pub genesis_id: String,
    #[serde(default)]
    pub flat_fee: bool,
}

impl SuggestedParams {
    /// Same parameters with the fee pinned to an exact amount.
    pub fn with_flat_fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self.flat_fee = true;
        self
    }
}

mod b64_hash {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let text = String::deserialize(deserializer)?;
        let raw = STANDARD.decode(text.as_bytes()).map_err(D::Error::custom)?;
        raw.as_slice()
            .try_into()
            .map_err(|_| D::Error::custom(format!("genesis hash must be 32 bytes, got {}", raw.len())))
    }
}

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// The `type` tag of an encoded transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Payment,
    KeyRegistration,
    AssetConfig,
    AssetTransfer,
    AssetFreeze,
    ApplicationCall,
}

impl TransactionType {
    /// Wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "pay",
            Self::KeyRegistration => "keyreg",
            Self::AssetConfig => "acfg",
            Self::AssetTransfer => "axfer",
            Self::AssetFreeze => "afrz",
            Self::ApplicationCall => "appl",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "pay" => Some(Self::Payment),
            "keyreg" => Some(Self::KeyRegistration),
            "acfg" => Some(Self::AssetConfig),
            "axfer" => Some(Self::AssetTransfer),
            "afrz" => Some(Self::AssetFreeze),
            "appl" => Some(Self::ApplicationCall),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payment {
    pub receiver: Address,
    pub amount: u64,
    /// When set, the sender's remaining balance goes here and the sender
    /// account is closed.
    pub close_remainder_to: Address,
}

/// Participation key registration. All keys absent means "go offline".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRegistration {
    pub vote_key: Option<[u8; 32]>,
    pub selection_key: Option<[u8; 32]>,
    pub state_proof_key: Option<[u8; STATE_PROOF_KEY_LENGTH]>,
    pub vote_first: u64,
    pub vote_last: u64,
    pub vote_key_dilution: u64,
    /// Marks the account as never participating again.
    pub non_participation: bool,
}

impl KeyRegistration {
    pub fn is_online(&self) -> bool {
        self.vote_key.is_some() || self.selection_key.is_some()
    }
}

/// Asset parameters. Only the manager, reserve, freeze and clawback
/// addresses can change after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetParams {
    pub total: u64,
    pub decimals: u32,
    pub default_frozen: bool,
    pub unit_name: String,
    pub asset_name: String,
    pub url: String,
    pub metadata_hash: Option<[u8; METADATA_HASH_LENGTH]>,
    pub manager: Address,
    pub reserve: Address,
    pub freeze: Address,
    pub clawback: Address,
}

impl AssetParams {
    /// True when every field is zero, which encodes to nothing at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Asset creation (`asset_id == 0`), reconfiguration, or destruction
/// (`params == None`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetConfig {
    pub asset_id: u64,
    pub params: Option<AssetParams>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetTransfer {
    pub asset_id: u64,
    pub amount: u64,
    pub receiver: Address,
    pub close_assets_to: Address,
    /// Clawback target. Non-zero only when the sender is the clawback account.
    pub revocation_target: Address,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetFreeze {
    pub asset_id: u64,
    pub target: Address,
    pub frozen: bool,
}

/// What an application call does after the program approves it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OnComplete {
    #[default]
    NoOp,
    OptIn,
    CloseOut,
    ClearState,
    UpdateApplication,
    DeleteApplication,
}

impl OnComplete {
    pub fn as_u64(&self) -> u64 {
        match self {
            Self::NoOp => 0,
            Self::OptIn => 1,
            Self::CloseOut => 2,
            Self::ClearState => 3,
            Self::UpdateApplication => 4,
            Self::DeleteApplication => 5,
        }
    }

    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            0 => Some(Self::NoOp),
            1 => Some(Self::OptIn),
            2 => Some(Self::CloseOut),
            3 => Some(Self::ClearState),
            4 => Some(Self::UpdateApplication),
            5 => Some(Self::DeleteApplication),
            _ => None,
        }
    }
}

/// Storage an application reserves: integer and byte-slice slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateSchema {
    pub num_uints: u64,
    pub num_byte_slices: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationCall {
    /// Zero creates a new application.
    pub app_id: u64,
    pub on_complete: OnComplete,
    pub approval_program: Vec<u8>,
    pub clear_program: Vec<u8>,
    pub global_schema: StateSchema,
    pub local_schema: StateSchema,
    pub args: Vec<Vec<u8>>,
    pub accounts: Vec<Address>,
    pub foreign_apps: Vec<u64>,
    pub foreign_assets: Vec<u64>,
    pub extra_pages: u32,
}

/// Per-type payload of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    Payment(Payment),
    KeyRegistration(KeyRegistration),
    AssetConfig(AssetConfig),
    AssetTransfer(AssetTransfer),
    AssetFreeze(AssetFreeze),
    ApplicationCall(ApplicationCall),
}

impl TransactionKind {
    pub fn tx_type(&self) -> TransactionType {
        match self {
            Self::Payment(_) => TransactionType::Payment,
            Self::KeyRegistration(_) => TransactionType::KeyRegistration,
            Self::AssetConfig(_) => TransactionType::AssetConfig,
            Self::AssetTransfer(_) => TransactionType::AssetTransfer,
            Self::AssetFreeze(_) => TransactionType::AssetFreeze,
            Self::ApplicationCall(_) => TransactionType::ApplicationCall,
        }
    }

    // -- convenience constructors ------------------------------------------

    pub fn payment(receiver: Address, amount: u64) -> Self {
        Self::Payment(Payment {
            receiver,
            amount,
            ..Default::default()
        })
    }

    /// Payment that also closes the sender's account into `close_to`.
    pub fn close_account(receiver: Address, amount: u64, close_to: Address) -> Self {
        Self::Payment(Payment {
            receiver,
            amount,
            close_remainder_to: close_to,
        })
    }

    pub fn keyreg_online(
        vote_key: [u8; 32],
        selection_key: [u8; 32],
        state_proof_key: Option<[u8; STATE_PROOF_KEY_LENGTH]>,
        vote_first: u64,
        vote_last: u64,
        vote_key_dilution: u64,
    ) -> Self {
        Self::KeyRegistration(KeyRegistration {
            vote_key: Some(vote_key),
            selection_key: Some(selection_key),
            state_proof_key,
            vote_first,
            vote_last,
            vote_key_dilution,
            non_participation: false,
        })
    }

    pub fn keyreg_offline() -> Self {
        Self::KeyRegistration(KeyRegistration::default())
    }

    pub fn keyreg_nonparticipating() -> Self {
        Self::KeyRegistration(KeyRegistration {
            non_participation: true,
            ..Default::default()
        })
    }

    pub fn asset_create(params: AssetParams) -> Self {
        Self::AssetConfig(AssetConfig {
            asset_id: 0,
            params: Some(params),
        })
    }

    /// Changes the four management addresses of an existing asset. Pass
    /// [`Address::ZERO`] to clear one for good.
    pub fn asset_reconfigure(
        asset_id: u64,
        manager: Address,
        reserve: Address,
        freeze: Address,
        clawback: Address,
    ) -> Self {
        Self::AssetConfig(AssetConfig {
            asset_id,
            params: Some(AssetParams {
                manager,
                reserve,
                freeze,
                clawback,
                ..Default::default()
            }),
        })
    }

    pub fn asset_destroy(asset_id: u64) -> Self {
        Self::AssetConfig(AssetConfig {
            asset_id,
            params: None,
        })
    }

    pub fn asset_transfer(asset_id: u64, amount: u64, receiver: Address) -> Self {
        Self::AssetTransfer(AssetTransfer {
            asset_id,
            amount,
            receiver,
            ..Default::default()
        })
    }

    /// Zero-amount transfer to oneself, which is how an account starts
    /// accepting an asset.
    pub fn asset_opt_in(asset_id: u64, account: Address) -> Self {
        Self::asset_transfer(asset_id, 0, account)
    }

    /// Clawback: moves `amount` from `target` to `receiver`.
    pub fn asset_revoke(asset_id: u64, amount: u64, target: Address, receiver: Address) -> Self {
        Self::AssetTransfer(AssetTransfer {
            asset_id,
            amount,
            receiver,
            revocation_target: target,
            ..Default::default()
        })
    }

    pub fn asset_freeze(asset_id: u64, target: Address, frozen: bool) -> Self {
        Self::AssetFreeze(AssetFreeze {
            asset_id,
            target,
            frozen,
        })
    }

    pub fn app_create(
        approval_program: Vec<u8>,
        clear_program: Vec<u8>,
        global_schema: StateSchema,
        local_schema: StateSchema,
    ) -> Self {
        Self::ApplicationCall(ApplicationCall {
            approval_program,
            clear_program,
            global_schema,
            local_schema,
            ..Default::default()
        })
    }

    pub fn app_call(app_id: u64, on_complete: OnComplete, args: Vec<Vec<u8>>) -> Self {
        Self::ApplicationCall(ApplicationCall {
            app_id,
            on_complete,
            args,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags_roundtrip() {
        for t in [
            TransactionType::Payment,
            TransactionType::KeyRegistration,
            TransactionType::AssetConfig,
            TransactionType::AssetTransfer,
            TransactionType::AssetFreeze,
            TransactionType::ApplicationCall,
        ] {
            assert_eq!(TransactionType::from_tag(t.as_str()), Some(t));
        }
        assert_eq!(TransactionType::from_tag("stpf"), None);
        assert_eq!(TransactionType::AssetFreeze.to_string(), "afrz");
    }

    #[test]
    fn on_complete_codes() {
        for code in 0..6 {
            assert_eq!(OnComplete::from_u64(code).map(|o| o.as_u64()), Some(code));
        }
        assert_eq!(OnComplete::from_u64(6), None);
    }

    #[test]
    fn suggested_params_json() {
        let json = r#"{
            "fee": 4,
            "first-round": 12466,
            "last-round": 13466,
            "genesis-hash": "JgsgCaCTqIaLeVhyL6XlRu3n7Rfk2FxMeK+wRSaQ7dI=",
            "genesis-id": "devnet-v33.0"
        }"#;
        let params: SuggestedParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.fee, 4);
        assert_eq!(params.first_valid, 12466);
        assert_eq!(params.genesis_id, "devnet-v33.0");
        assert!(!params.flat_fee);
        assert_eq!(params.genesis_hash[0], 0x26);

        let back: SuggestedParams =
            serde_json::from_str(&serde_json::to_string(&params).unwrap()).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn suggested_params_rejects_short_hash() {
        let json = r#"{"fee":1,"first-round":1,"last-round":2,"genesis-hash":"AAAA"}"#;
        assert!(serde_json::from_str::<SuggestedParams>(json).is_err());
    }

    #[test]
    fn keyreg_constructors() {
        match TransactionKind::keyreg_nonparticipating() {
            TransactionKind::KeyRegistration(k) => {
                assert!(k.non_participation);
                assert!(!k.is_online());
            }
            _ => panic!("wrong kind"),
        }
        match TransactionKind::keyreg_online([1; 32], [2; 32], None, 1, 100, 10) {
            TransactionKind::KeyRegistration(k) => assert!(k.is_online()),
            _ => panic!("wrong kind"),
        }
    }

    #[test]
    fn opt_in_is_zero_self_transfer() {
        let me = Address::new([5; 32]);
        match TransactionKind::asset_opt_in(31, me) {
            TransactionKind::AssetTransfer(t) => {
                assert_eq!(t.amount, 0);
                assert_eq!(t.receiver, me);
            }
            _ => panic!("wrong kind"),
        }
    }
}
