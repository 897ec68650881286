//! # Identity Module
//!
//! Everything that turns key material into something a human can read,
//! copy, or write on paper:
//!
//! 1. **Address**: a public key (or a program/multisig hash) as 58
//!    checksummed base32 characters.
//! 2. **Mnemonic**: a 32-byte secret as 25 words, with a checksum word that
//!    depends on what kind of secret it is.
//! 3. **Derivation**: a master key from which a custodial wallet derives
//!    any number of accounts.
//!
//! The key pair itself lives in [`crate::crypto::keys`]; it is re-exported
//! here so callers can pull identity types from one place.

pub mod address;
pub mod derivation;
pub mod mnemonic;

pub use crate::crypto::keys::Account;
pub use address::{Address, AddressError};
pub use derivation::MasterDerivationKey;
pub use mnemonic::{
    master_key_from_mnemonic, master_key_to_mnemonic, secret_key_from_mnemonic,
    secret_key_to_mnemonic, MnemonicError,
};
