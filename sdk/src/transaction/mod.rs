//! # Transaction Module
//!
//! Construction, encoding, signing, grouping, and verification of
//! transactions.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        Payload variants, suggested parameters, and the type tag
//! builder.rs      TransactionBuilder: header fields, validation, fee
//! codec.rs        Canonical field tables for the transaction map
//! signing.rs      Transaction ids, Ed25519 signing, SignedTransaction
//! group.rs        Atomic group ids
//! envelope.rs     SignedEnvelope: any of sig / msig / lsig
//! verification.rs Cryptographic checks on signed envelopes
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: [`TransactionBuilder`] assembles and validates the fields
//!    and computes the fee.
//! 2. **Group** (optional): [`assign_group_id`] binds several transactions.
//! 3. **Sign**: [`Transaction::sign`], a [`crate::multisig::MultisigTransaction`],
//!    or a [`crate::logic::LogicSigTransaction`].
//! 4. **Encode**: the envelope's canonical bytes go to a node.
//!
//! ## Design Decisions
//!
//! - Payloads are a closed enum. Encoding dispatches on the variant and
//!   decoding on the `type` tag, never on which keys happen to be present.
//! - Transactions are immutable once built. The only later write is the
//!   group id, and that is refused for members already grouped.
//! - Amounts and fees are `u64` microalgos. Fee arithmetic is checked.

pub mod builder;
pub mod codec;
pub mod envelope;
pub mod group;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::{Header, Transaction, TransactionBuilder, TransactionError};
pub use envelope::SignedEnvelope;
pub use group::{assign_group_id, compute_group_id, verify_group};
pub use signing::{sign_transaction, SignedTransaction};
pub use types::{
    ApplicationCall, AssetConfig, AssetFreeze, AssetParams, AssetTransfer, KeyRegistration,
    OnComplete, Payment, StateSchema, SuggestedParams, TransactionKind, TransactionType,
};
pub use verification::{verify_envelope, VerificationError};
