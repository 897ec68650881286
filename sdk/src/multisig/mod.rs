//! # Multisignature Protocol
//!
//! T-of-N threshold accounts over an ordered key list:
//!
//! - [`account`]: the descriptor and its address
//! - [`signature`]: the per-key signature slots and their encoding
//! - [`transaction`]: signing and merging of multisig-authorized transactions

pub mod account;
pub mod signature;
pub mod transaction;

pub use account::MultisigAccount;
pub use signature::MultisigSig;
pub use transaction::MultisigTransaction;

use thiserror::Error;

use crate::encoding::DecodeError;
use crate::identity::address::Address;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultisigError {
    #[error("unsupported multisig version {0}")]
    UnsupportedVersion(u8),

    #[error("threshold {threshold} is invalid for {keys} keys")]
    InvalidThreshold { threshold: u8, keys: usize },

    #[error("{0} keys exceed the multisig limit")]
    TooManyKeys(usize),

    #[error("{0} is not a signer of this multisig account")]
    NotASigner(Address),

    #[error("slot {index} is out of range for {keys} keys")]
    SlotOutOfRange { index: usize, keys: usize },

    #[error("cannot merge: {0}")]
    MismatchedTransactions(String),

    #[error("conflicting signatures in slot {index}")]
    ConflictingSignatures { index: usize },

    #[error("nothing to merge")]
    EmptyMerge,

    #[error("{have} signatures present, {need} required")]
    InsufficientSignatures { have: usize, need: usize },

    #[error("signature in slot {index} does not verify")]
    InvalidSignature { index: usize },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
