//! # Account Keys
//!
//! An [`Account`] is an Ed25519 key pair and nothing more. Its public key is
//! its address, its 32-byte seed is the secret that a 25-word mnemonic
//! encodes, and every signature the SDK produces comes out of
//! [`Account::sign_raw`] after the caller has prepended the right domain tag.
//!
//! ## Security considerations
//!
//! - The seed lives inside `ed25519_dalek::SigningKey`, which zeroizes itself
//!   on drop. Copies handed out by [`Account::seed`] come wrapped in
//!   `Zeroizing` for the same reason.
//! - `Account` does not implement serde. Exporting a secret is always an
//!   explicit call to `seed()` or `to_mnemonic()`.
//! - `Debug` prints the address only. Key bytes are never logged.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::config::{BYTES_TAG, PUBLIC_KEY_LENGTH, SEED_LENGTH, SIGNATURE_LENGTH};
use crate::crypto::hash::tagged;
use crate::identity::address::Address;
use crate::identity::mnemonic::{self, MnemonicError};

/// An Ed25519 key pair that can sign for one address.
///
/// # Examples
///
/// ```
/// use algosdk_core::crypto::Account;
///
/// let account = Account::generate();
/// let restored = Account::from_mnemonic(&account.to_mnemonic()).unwrap();
/// assert_eq!(account.address(), restored.address());
/// ```
pub struct Account {
    signing_key: SigningKey,
}

/// A detached Ed25519 signature. Always 64 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Account {
    /// Fresh key pair from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic key pair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SEED_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Restores an account from its 25-word mnemonic.
    pub fn from_mnemonic(phrase: &str) -> Result<Self, MnemonicError> {
        let seed = Zeroizing::new(mnemonic::secret_key_from_mnemonic(phrase)?);
        Ok(Self::from_seed(&seed))
    }

    /// The 25-word backup phrase of this account's seed.
    pub fn to_mnemonic(&self) -> String {
        mnemonic::secret_key_to_mnemonic(&self.seed())
    }

    /// Copy of the secret seed. Wiped when the wrapper drops.
    pub fn seed(&self) -> Zeroizing<[u8; SEED_LENGTH]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }

    pub fn public_key(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.signing_key.verifying_key().to_bytes()
    }

    pub fn address(&self) -> Address {
        Address::new(self.public_key())
    }

    /// Signs `message` exactly as given. Callers are responsible for the
    /// domain tag; prefer the typed signing entry points.
    pub fn sign_raw(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes())
    }

    /// Signs arbitrary bytes under the `MX` tag, so the result can never be
    /// mistaken for a transaction or program signature.
    pub fn sign_bytes(&self, data: &[u8]) -> Signature {
        self.sign_raw(&tagged(BYTES_TAG, data))
    }
}

impl Clone for Account {
    fn clone(&self) -> Self {
        Self::from_seed(&self.seed())
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account({})", self.address())
    }
}

impl PartialEq for Account {
    /// Compares public keys; secret bytes are never compared directly.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for Account {}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

impl Signature {
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Accepts exactly 64 bytes.
    pub fn try_from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; SIGNATURE_LENGTH] = slice.try_into().ok()?;
        Some(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 8 bytes are plenty to tell signatures apart in logs.
        write!(f, "Signature({}..)", hex::encode(&self.0[..8]))
    }
}
