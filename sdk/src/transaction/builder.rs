//! Transaction construction via the builder pattern.
//!
//! The [`TransactionBuilder`] takes a sender, the network's suggested
//! parameters and a payload, accepts the optional header fields through
//! fluent setters, and only then computes the fee and validates the result.
//! Once `build()` returns, the [`Transaction`] is fixed: nothing but group
//! assignment touches it again, and signing consumes it.
//!
//! The builder does not sign. That happens in [`super::signing`], which keeps
//! construction testable without key material.

use thiserror::Error;
use tracing::debug;

use super::types::{SuggestedParams, TransactionKind, TransactionType};
use crate::config::{
    LEASE_LENGTH, MAX_APP_ACCOUNTS, MAX_APP_ARGS, MAX_APP_EXTRA_PAGES, MAX_APP_FOREIGN_APPS,
    MAX_APP_FOREIGN_ASSETS, MAX_ASSET_DECIMALS, MAX_ASSET_NAME_LENGTH, MAX_ASSET_UNIT_NAME_LENGTH,
    MAX_ASSET_URL_LENGTH, MAX_NOTE_LENGTH, MIN_TXN_FEE, SIGNATURE_LENGTH,
};
use crate::encoding::{encode, Canonical, MapBuilder, Value};
use crate::identity::address::Address;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Construction-time failures. Nothing is ever defaulted silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("invalid fee parameters: {0}")]
    InvalidFeeParameters(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidFieldValue { field: &'static str, reason: String },

    #[error("a group needs at least one transaction")]
    EmptyGroup,

    #[error("group of {size} transactions exceeds the limit of {max}")]
    GroupTooLarge { size: usize, max: usize },

    #[error("transaction {index} already belongs to a group")]
    AlreadyGrouped { index: usize },

    #[error("transaction {index} does not carry the group id of its group")]
    GroupMismatch { index: usize },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TransactionError {
    TransactionError::InvalidFieldValue {
        field,
        reason: reason.into(),
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// Fields every transaction type shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub sender: Address,
    pub fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_hash: [u8; 32],
    pub genesis_id: String,
    pub note: Vec<u8>,
    pub group: Option<[u8; 32]>,
    pub lease: Option<[u8; LEASE_LENGTH]>,
    /// Authorizing address for every later transaction of the sender.
    pub rekey_to: Address,
}

/// An unsigned transaction: a shared [`Header`] plus a per-type payload.
///
/// Encoding dispatches on the payload variant, never on which fields happen
/// to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub(crate) header: Header,
    pub(crate) kind: TransactionKind,
}

impl Transaction {
    pub(crate) fn from_parts(header: Header, kind: TransactionKind) -> Self {
        Self { header, kind }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn kind(&self) -> &TransactionKind {
        &self.kind
    }

    pub fn tx_type(&self) -> TransactionType {
        self.kind.tx_type()
    }

    pub fn sender(&self) -> Address {
        self.header.sender
    }

    pub fn fee(&self) -> u64 {
        self.header.fee
    }

    pub fn group(&self) -> Option<[u8; 32]> {
        self.header.group
    }

    pub(crate) fn set_group(&mut self, group: [u8; 32]) {
        self.header.group = Some(group);
    }

    /// Length of the signed envelope `{sig, txn}` this transaction will
    /// travel in. The signature is a placeholder of the right size.
    pub fn estimate_size(&self) -> usize {
        let envelope = MapBuilder::new()
            .bytes("sig", &[0u8; SIGNATURE_LENGTH])
            .value("txn", self.to_value())
            .build();
        encode(&envelope).len()
    }
}

/// Resolves the fee field: flat fees are copied, per-byte fees become
/// `max(size * rate, MIN_TXN_FEE)` with the rate in the fee field while
/// sizing.
fn compute_fee(txn: &mut Transaction, rate: u64, flat: bool) -> Result<(), TransactionError> {
    txn.header.fee = rate;
    if flat {
        debug!(fee = rate, "using flat fee");
        return Ok(());
    }
    let size = txn.estimate_size() as u64;
    let fee = size.checked_mul(rate).ok_or_else(|| {
        TransactionError::InvalidFeeParameters(format!(
            "fee rate {} times size {} overflows",
            rate, size
        ))
    })?;
    txn.header.fee = fee.max(MIN_TXN_FEE);
    debug!(size, rate, fee = txn.header.fee, "computed per-byte fee");
    Ok(())
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for unsigned [`Transaction`]s.
///
/// # Usage
///
/// ```
/// use algosdk_core::identity::Address;
/// use algosdk_core::transaction::{SuggestedParams, TransactionBuilder, TransactionKind};
///
/// let params = SuggestedParams {
///     fee: 0,
///     first_valid: 1000,
///     last_valid: 2000,
///     genesis_hash: [1u8; 32],
///     genesis_id: "testnet-v1.0".into(),
///     flat_fee: true,
/// };
/// let sender = Address::new([2u8; 32]);
/// let txn = TransactionBuilder::new(sender, &params, TransactionKind::payment(sender, 5))
///     .note(b"hello".to_vec())
///     .build()
///     .unwrap();
/// assert_eq!(txn.fee(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    sender: Address,
    params: SuggestedParams,
    kind: TransactionKind,
    note: Vec<u8>,
    lease: Option<[u8; LEASE_LENGTH]>,
    group: Option<[u8; 32]>,
    rekey_to: Address,
    strict_empty_address_check: bool,
}

impl TransactionBuilder {
    pub fn new(sender: Address, params: &SuggestedParams, kind: TransactionKind) -> Self {
        Self {
            sender,
            params: params.clone(),
            kind,
            note: Vec::new(),
            lease: None,
            group: None,
            rekey_to: Address::ZERO,
            strict_empty_address_check: true,
        }
    }

    pub fn note(mut self, note: Vec<u8>) -> Self {
        self.note = note;
        self
    }

    /// Lease: at most one transaction per (sender, lease) in a validity window.
    pub fn lease(mut self, lease: [u8; LEASE_LENGTH]) -> Self {
        self.lease = Some(lease).filter(|l| l.iter().any(|b| *b != 0));
        self
    }

    pub fn group(mut self, group: [u8; 32]) -> Self {
        self.group = Some(group).filter(|g| g.iter().any(|b| *b != 0));
        self
    }

    pub fn rekey_to(mut self, address: Address) -> Self {
        self.rekey_to = address;
        self
    }

    /// Pays exactly `fee`, ignoring the per-byte rate in the params.
    pub fn flat_fee(mut self, fee: u64) -> Self {
        self.params.fee = fee;
        self.params.flat_fee = true;
        self
    }

    /// Asset reconfigurations normally must name all four management
    /// addresses, because a missing one is cleared permanently. Turn this off
    /// to clear addresses on purpose.
    pub fn strict_empty_address_check(mut self, strict: bool) -> Self {
        self.strict_empty_address_check = strict;
        self
    }

    /// Validates everything, computes the fee, and freezes the transaction.
    pub fn build(self) -> Result<Transaction, TransactionError> {
        let params = &self.params;
        if params.first_valid > params.last_valid {
            return Err(invalid(
                "last_valid",
                format!(
                    "first valid round {} is after last valid round {}",
                    params.first_valid, params.last_valid
                ),
            ));
        }
        if params.genesis_hash == [0u8; 32] {
            return Err(invalid("genesis_hash", "must not be all zero"));
        }
        if self.note.len() > MAX_NOTE_LENGTH {
            return Err(invalid(
                "note",
                format!("{} bytes exceeds {}", self.note.len(), MAX_NOTE_LENGTH),
            ));
        }
        if self.sender.is_zero() {
            return Err(invalid("sender", "must not be the zero address"));
        }
        let kind = validate_kind(self.kind, self.strict_empty_address_check)?;

        let mut txn = Transaction {
            header: Header {
                sender: self.sender,
                fee: 0,
                first_valid: params.first_valid,
                last_valid: params.last_valid,
                genesis_hash: params.genesis_hash,
                genesis_id: params.genesis_id.clone(),
                note: self.note,
                group: self.group,
                lease: self.lease,
                rekey_to: self.rekey_to,
            },
            kind,
        };
        compute_fee(&mut txn, params.fee, params.flat_fee)?;
        Ok(txn)
    }
}

/// An all-zero fixed field encodes to nothing, so it is the same as absent.
fn nonzero<const N: usize>(field: Option<[u8; N]>) -> Option<[u8; N]> {
    field.filter(|bytes| bytes.iter().any(|b| *b != 0))
}

fn validate_kind(kind: TransactionKind, strict: bool) -> Result<TransactionKind, TransactionError> {
    match kind {
        TransactionKind::KeyRegistration(mut k) => {
            k.vote_key = nonzero(k.vote_key);
            k.selection_key = nonzero(k.selection_key);
            k.state_proof_key = nonzero(k.state_proof_key);
            if k.non_participation {
                if k.vote_key.is_some() || k.selection_key.is_some() || k.state_proof_key.is_some() {
                    return Err(invalid("nonpart", "non-participating registration carries no keys"));
                }
            } else if k.is_online() {
                if k.vote_key.is_none() || k.selection_key.is_none() {
                    return Err(invalid("votekey", "online registration needs vote and selection keys"));
                }
                if k.vote_first > k.vote_last {
                    return Err(invalid("votelst", "vote_first is after vote_last"));
                }
                if k.vote_key_dilution == 0 {
                    return Err(invalid("votekd", "key dilution must be non-zero"));
                }
            }
            Ok(TransactionKind::KeyRegistration(k))
        }
        TransactionKind::AssetConfig(mut cfg) => {
            if let Some(p) = cfg.params.as_mut() {
                p.metadata_hash = nonzero(p.metadata_hash);
                if p.decimals > MAX_ASSET_DECIMALS {
                    return Err(invalid("dc", format!("decimals {} exceeds {}", p.decimals, MAX_ASSET_DECIMALS)));
                }
                if p.unit_name.len() > MAX_ASSET_UNIT_NAME_LENGTH {
                    return Err(invalid("un", format!("unit name longer than {} bytes", MAX_ASSET_UNIT_NAME_LENGTH)));
                }
                if p.asset_name.len() > MAX_ASSET_NAME_LENGTH {
                    return Err(invalid("an", format!("asset name longer than {} bytes", MAX_ASSET_NAME_LENGTH)));
                }
                if p.url.len() > MAX_ASSET_URL_LENGTH {
                    return Err(invalid("au", format!("url longer than {} bytes", MAX_ASSET_URL_LENGTH)));
                }
                let reconfigure = cfg.asset_id != 0;
                if reconfigure && strict {
                    let managers = [p.manager, p.reserve, p.freeze, p.clawback];
                    if managers.iter().any(Address::is_zero) {
                        return Err(invalid(
                            "apar",
                            "reconfiguration would clear a management address; \
                             disable strict_empty_address_check to allow it",
                        ));
                    }
                }
            }
            if cfg.asset_id == 0 && cfg.params.is_none() {
                return Err(invalid("caid", "destroying needs an asset id"));
            }
            // Empty params encode to nothing; keep the value in its decoded shape.
            cfg.params = cfg.params.filter(|p| !p.is_empty());
            Ok(TransactionKind::AssetConfig(cfg))
        }
        TransactionKind::ApplicationCall(ref app) => {
            if app.args.len() > MAX_APP_ARGS {
                return Err(invalid("apaa", format!("more than {} arguments", MAX_APP_ARGS)));
            }
            if app.accounts.len() > MAX_APP_ACCOUNTS {
                return Err(invalid("apat", format!("more than {} accounts", MAX_APP_ACCOUNTS)));
            }
            if app.foreign_apps.len() > MAX_APP_FOREIGN_APPS {
                return Err(invalid("apfa", format!("more than {} foreign apps", MAX_APP_FOREIGN_APPS)));
            }
            if app.foreign_assets.len() > MAX_APP_FOREIGN_ASSETS {
                return Err(invalid("apas", format!("more than {} foreign assets", MAX_APP_FOREIGN_ASSETS)));
            }
            if app.extra_pages > MAX_APP_EXTRA_PAGES {
                return Err(invalid("apep", format!("more than {} extra pages", MAX_APP_EXTRA_PAGES)));
            }
            if app.app_id == 0 && app.approval_program.is_empty() {
                return Err(invalid("apap", "creating an application needs an approval program"));
            }
            Ok(kind)
        }
        TransactionKind::Payment(_) | TransactionKind::AssetTransfer(_) | TransactionKind::AssetFreeze(_) => {
            Ok(kind)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
