//! # Cryptographic Primitives
//!
//! Two primitives, both boring on purpose:
//!
//! - **Ed25519** for every signature the SDK makes or checks.
//! - **SHA-512/256** for every digest: addresses, transaction ids, group
//!   ids, program and multisig addresses, mnemonic checksums.
//!
//! Everything here is a thin typed wrapper over `ed25519-dalek` and `sha2`.
//! What the protocol adds on top is domain separation, and that lives in the
//! callers: each one prepends its tag from [`crate::config`] before hashing
//! or signing.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{hash_with_tag, sha512_256};
pub use keys::{Account, Signature};
pub use signatures::{teal_sign, teal_sign_from_program, verify, verify_teal};
