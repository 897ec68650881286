//! Master derivation keys.
//!
//! A custodial wallet keeps one 32-byte master key and derives as many
//! accounts from it as it likes:
//!
//! ```text
//! seed(i) = sha512_256( mdk || i as big-endian u64 )
//! ```
//!
//! Backing up the master key (as its `MDK`-tagged mnemonic) backs up every
//! account derived from it.

use std::fmt;

use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::config::MASTER_DERIVATION_KEY_LENGTH;
use crate::crypto::hash::hash_parts;
use crate::crypto::keys::Account;
use crate::identity::mnemonic::{self, MnemonicError};

#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterDerivationKey([u8; MASTER_DERIVATION_KEY_LENGTH]);

impl MasterDerivationKey {
    /// Fresh key from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; MASTER_DERIVATION_KEY_LENGTH];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        let key = Self(bytes);
        bytes.zeroize();
        key
    }

    pub fn from_bytes(bytes: [u8; MASTER_DERIVATION_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_mnemonic(phrase: &str) -> Result<Self, MnemonicError> {
        mnemonic::master_key_from_mnemonic(phrase).map(Self)
    }

    pub fn to_mnemonic(&self) -> String {
        mnemonic::master_key_to_mnemonic(&self.0)
    }

    /// Copy of the raw key. Wiped when the wrapper drops.
    pub fn to_bytes(&self) -> Zeroizing<[u8; MASTER_DERIVATION_KEY_LENGTH]> {
        Zeroizing::new(self.0)
    }

    /// The account at position `index`. Same key and index, same account.
    pub fn derive_account(&self, index: u64) -> Account {
        let seed = Zeroizing::new(hash_parts(&[&self.0, &index.to_be_bytes()]));
        Account::from_seed(&seed)
    }
}

impl fmt::Debug for MasterDerivationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterDerivationKey(..)")
    }
}
