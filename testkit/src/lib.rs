// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # algosdk-testkit
//!
//! In-memory stand-ins for the services `algosdk-core` talks to:
//!
//! - [`DevNode`]: a [`NodeClient`](algosdk_core::NodeClient) that verifies
//!   and pools submitted envelopes without running consensus.
//! - [`InMemoryKeystore`]: a [`KeyCustodian`](algosdk_core::KeyCustodian)
//!   deriving its keys from one master derivation key.
//! - [`init_logging`]: the `tracing` subscriber bootstrap shared by tests.
//!
//! Nothing in here opens a socket.

pub mod dev_node;
pub mod logging;
pub mod wallet;

pub use dev_node::{DevNode, DevNodeParams};
pub use logging::{init_logging, init_test_logging, LogFormat};
pub use wallet::InMemoryKeystore;
