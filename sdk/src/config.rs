//! # Protocol Constants & Collaborator Configuration
//!
//! Every magic number the SDK core depends on lives here. The values mirror
//! the consensus parameters of the network, so changing one of them does not
//! make the network agree with you; it just makes your transactions invalid.
//!
//! Runtime configuration for the external collaborators (node client,
//! custodial wallet) is the [`ClientConfig`] value at the bottom of this file.
//! It is always passed explicitly into a collaborator's constructor. The core
//! never reads process-wide settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Key & Signature Sizes
// ---------------------------------------------------------------------------

/// Ed25519 secret seed length in bytes.
pub const SEED_LENGTH: usize = 32;

/// Ed25519 public key length. An address is exactly one of these.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Length of every SHA-512/256 digest the protocol uses.
pub const HASH_LENGTH: usize = 32;

/// Bytes of the public-key hash appended to an address as its checksum.
pub const ADDRESS_CHECKSUM_LENGTH: usize = 4;

/// Length of a textual address: base32 of 36 bytes, no padding.
pub const ADDRESS_LENGTH: usize = 58;

/// Length of a textual transaction id: base32 of 32 bytes, no padding.
pub const TXID_LENGTH: usize = 52;

/// Master derivation key length in bytes.
pub const MASTER_DERIVATION_KEY_LENGTH: usize = 32;

/// State-proof public key length carried by key registrations.
pub const STATE_PROOF_KEY_LENGTH: usize = 64;

/// Lease length in bytes.
pub const LEASE_LENGTH: usize = 32;

/// Asset metadata hash length in bytes.
pub const METADATA_HASH_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Mnemonics
// ---------------------------------------------------------------------------

/// Words in a mnemonic: 24 data words plus one checksum word.
pub const MNEMONIC_WORD_COUNT: usize = 25;

/// Bits carried by one mnemonic word (2048-word list).
pub const BITS_PER_WORD: usize = 11;

// ---------------------------------------------------------------------------
// Domain Separation Tags
// ---------------------------------------------------------------------------

/// Prefix of transaction signing bytes and transaction ids.
pub const TX_TAG: &[u8] = b"TX";

/// Prefix of the transaction group id preimage.
pub const TX_GROUP_TAG: &[u8] = b"TG";

/// Prefix of data signed on behalf of a program address.
pub const PROG_DATA_TAG: &[u8] = b"ProgData";

/// Prefix of program bytes when hashing a program address or delegating it.
pub const PROGRAM_TAG: &[u8] = b"Program";

/// Prefix of the multisig address preimage.
pub const MULTISIG_ADDR_TAG: &[u8] = b"MultisigAddr";

/// Prefix of arbitrary bytes signed with [`crate::crypto::Account::sign_bytes`].
pub const BYTES_TAG: &[u8] = b"MX";

/// Checksum tag of secret-key mnemonics. Empty keeps the established
/// 25-word format readable by every other wallet.
pub const SECRET_KEY_MNEMONIC_TAG: &[u8] = b"";

/// Checksum tag of master-derivation-key mnemonics.
pub const MASTER_KEY_MNEMONIC_TAG: &[u8] = b"MDK";

// ---------------------------------------------------------------------------
// Fees
// ---------------------------------------------------------------------------

/// Minimum fee per transaction, in microalgos.
pub const MIN_TXN_FEE: u64 = 1_000;

/// Microalgos per Algo.
pub const MICROALGOS_PER_ALGO: u64 = 1_000_000;

// ---------------------------------------------------------------------------
// Transaction Limits
// ---------------------------------------------------------------------------

/// Maximum note length in bytes.
pub const MAX_NOTE_LENGTH: usize = 1_024;

/// Maximum number of transactions in one atomic group.
pub const MAX_GROUP_SIZE: usize = 16;

/// Maximum asset decimals.
pub const MAX_ASSET_DECIMALS: u32 = 19;

/// Maximum asset unit name length in bytes.
pub const MAX_ASSET_UNIT_NAME_LENGTH: usize = 8;

/// Maximum asset name length in bytes.
pub const MAX_ASSET_NAME_LENGTH: usize = 32;

/// Maximum asset URL length in bytes.
pub const MAX_ASSET_URL_LENGTH: usize = 96;

/// Maximum application call arguments.
pub const MAX_APP_ARGS: usize = 16;

/// Maximum foreign accounts referenced by an application call.
pub const MAX_APP_ACCOUNTS: usize = 4;

/// Maximum foreign applications referenced by an application call.
pub const MAX_APP_FOREIGN_APPS: usize = 8;

/// Maximum foreign assets referenced by an application call.
pub const MAX_APP_FOREIGN_ASSETS: usize = 8;

/// Maximum extra program pages for an application.
pub const MAX_APP_EXTRA_PAGES: u32 = 3;

// ---------------------------------------------------------------------------
// Multisig & Programs
// ---------------------------------------------------------------------------

/// The only multisig version the network accepts.
pub const MULTISIG_VERSION: u8 = 1;

/// Upper bound on multisig participants (threshold and count are single bytes).
pub const MAX_MULTISIG_KEYS: usize = 255;

/// Highest program version the sanity check accepts.
pub const MAX_PROGRAM_VERSION: u64 = 11;

// ---------------------------------------------------------------------------
// Canonical Encoding
// ---------------------------------------------------------------------------

/// Maximum container nesting the decoder follows before giving up.
pub const MAX_DECODE_DEPTH: usize = 32;

// ---------------------------------------------------------------------------
// Collaborator Configuration
// ---------------------------------------------------------------------------

/// Default request timeout for collaborator clients.
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for an external collaborator (node or custodial wallet).
///
/// Built by the application and handed to the collaborator's constructor. The
/// core never stores one of these globally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the service, e.g. `http://localhost:4001`.
    pub address: String,
    /// API token sent with every request.
    pub token: String,
    /// Per-request timeout.
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
}

impl ClientConfig {
    /// Configuration with the default timeout.
    pub fn new(address: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            token: token.into(),
            timeout: DEFAULT_CLIENT_TIMEOUT,
        }
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn default_timeout() -> Duration {
    DEFAULT_CLIENT_TIMEOUT
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
