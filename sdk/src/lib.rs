// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # algosdk-core
//!
//! The part of an Algorand client that has to be exactly right: turning
//! transactions into the one byte string the network will hash, and
//! signing those bytes with one key, several keys, or a program.
//!
//! Nothing in here does I/O. Every operation is a pure transformation over
//! values the caller owns, which makes it easy to test against golden
//! vectors and easy to run anywhere. Talking to a node or a custodial
//! wallet happens through the traits in [`client`], implemented elsewhere.
//!
//! ## Architecture
//!
//! - **encoding**: canonical MessagePack. One logical value, one encoding.
//! - **crypto**: SHA-512/256, Ed25519 accounts, teal-sign.
//! - **identity**: address text form, 25-word mnemonics, master derivation keys.
//! - **transaction**: the transaction model, fees, ids, groups, envelopes.
//! - **multisig**: threshold accounts, signing, and merging of partial copies.
//! - **logic**: program addresses, the program sanity check, logic sigs.
//! - **client**: node and key-custodian interfaces.
//! - **config**: protocol constants and collaborator configuration.
//!
//! ## Design Philosophy
//!
//! 1. Every signature is domain-separated. `TX`, `ProgData`, `Program`, and
//!    `MX` never overlap, so no signature can be replayed as another kind.
//! 2. Decoding is as strict as encoding. Anything the decoder accepts
//!    re-encodes to the same bytes.
//! 3. Secret keys are zeroized on drop and never printed.
//!
//! ## Quick start
//!
//! ```
//! use algosdk_core::crypto::Account;
//! use algosdk_core::transaction::{SuggestedParams, TransactionBuilder, TransactionKind};
//! use algosdk_core::encoding::Canonical;
//!
//! let alice = Account::generate();
//! let bob = Account::generate();
//! let params = SuggestedParams {
//!     fee: 0,
//!     first_valid: 1000,
//!     last_valid: 2000,
//!     genesis_hash: [7; 32],
//!     genesis_id: "testnet-v1.0".into(),
//!     flat_fee: false,
//! };
//! let txn = TransactionBuilder::new(
//!     alice.address(),
//!     &params,
//!     TransactionKind::payment(bob.address(), 1_000_000),
//! )
//! .build()
//! .unwrap();
//! assert_eq!(txn.fee(), 1000);
//!
//! let signed = txn.sign(&alice);
//! let wire = signed.to_canonical_bytes();
//! assert!(!wire.is_empty());
//! ```

pub mod client;
pub mod config;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod identity;
pub mod logic;
pub mod multisig;
pub mod transaction;
pub mod util;

pub use client::{ClientError, KeyCustodian, NodeClient};
pub use crypto::{Account, Signature};
pub use encoding::{Canonical, DecodeError};
pub use error::{SdkError, SdkResult};
pub use identity::{Address, MasterDerivationKey};
pub use logic::{LogicSig, LogicSigAccount, LogicSigTransaction};
pub use multisig::{MultisigAccount, MultisigSig, MultisigTransaction};
pub use transaction::{
    SignedEnvelope, SignedTransaction, SuggestedParams, Transaction, TransactionBuilder,
    TransactionKind,
};
