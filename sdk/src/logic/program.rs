//! Program addresses and the program-bytes sanity check.
//!
//! A compiled program gets an address of its own:
//!
//! ```text
//! program_address = sha512_256("Program" || program)
//! ```
//!
//! Hashing will happily produce an address for any byte string, so before
//! deriving one we look at the bytes and complain if they look like
//! something other than compiled bytecode: an address string, base64 text,
//! an encoded transaction. The check is advisory. Every warning carries the
//! address that would have been derived, so a caller who knows better can
//! take it anyway.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;
use tracing::debug;

use crate::config::{MAX_PROGRAM_VERSION, PROGRAM_TAG};
use crate::crypto::hash::hash_with_tag;
use crate::encoding::{decode, Value};
use crate::identity::address::Address;

pub const EMPTY_PROGRAM: &str = "empty program";
pub const LOOKS_LIKE_ADDRESS: &str = "requesting program bytes, get Algorand address";
pub const LOOKS_LIKE_BASE64: &str = "program should not be b64 encoded";
pub const ALL_PRINTABLE: &str =
    "program bytes are all ASCII printable characters, not looking like Teal byte code";
pub const LOOKS_LIKE_TRANSACTION: &str = "program bytes look like an encoded transaction";
pub const UNSUPPORTED_VERSION: &str = "unsupported program version";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// The bytes do not look like a program. `address` is what hashing them
    /// would give anyway.
    #[error("program sanity check failed: {issue}")]
    SanityWarning { issue: &'static str, address: Address },

    #[error("program is not valid base64: {0}")]
    InvalidBase64(String),
}

impl ProgramError {
    pub fn issue(&self) -> Option<&'static str> {
        match self {
            ProgramError::SanityWarning { issue, .. } => Some(issue),
            ProgramError::InvalidBase64(_) => None,
        }
    }

    /// Accepts the risk and returns the address anyway.
    pub fn into_address(self) -> Option<Address> {
        match self {
            ProgramError::SanityWarning { address, .. } => Some(address),
            ProgramError::InvalidBase64(_) => None,
        }
    }
}

/// Returns the first rule `program` trips, if any.
///
/// Rules, in order:
///
/// 1. the program is empty;
/// 2. every byte is printable ASCII (or a newline), in which case it is
///    reported as an address, as base64, or as plain text;
/// 3. the bytes decode as a canonical map with a `txn` or `type` key;
/// 4. the leading varint version is zero or above [`MAX_PROGRAM_VERSION`].
pub fn sanity_check(program: &[u8]) -> Option<&'static str> {
    if program.is_empty() {
        return Some(EMPTY_PROGRAM);
    }

    if program.iter().all(|&b| b == b'\n' || (b' '..=b'~').contains(&b)) {
        // All printable, so this is valid UTF-8.
        let text = String::from_utf8_lossy(program);
        if Address::is_valid(&text) {
            return Some(LOOKS_LIKE_ADDRESS);
        }
        if STANDARD.decode(program).is_ok() {
            return Some(LOOKS_LIKE_BASE64);
        }
        return Some(ALL_PRINTABLE);
    }

    if let Ok(Value::Map(entries)) = decode(program) {
        if entries.contains_key("txn") || entries.contains_key("type") {
            return Some(LOOKS_LIKE_TRANSACTION);
        }
    }

    match read_uvarint(program) {
        Some(version) if (1..=MAX_PROGRAM_VERSION).contains(&version) => None,
        _ => Some(UNSUPPORTED_VERSION),
    }
}

/// Program address after the sanity check.
pub fn program_address(program: &[u8]) -> Result<Address, ProgramError> {
    let address = program_address_unchecked(program);
    match sanity_check(program) {
        None => Ok(address),
        Some(issue) => {
            debug!(issue, %address, "program failed sanity check");
            Err(ProgramError::SanityWarning { issue, address })
        }
    }
}

/// `sha512_256("Program" || program)` with no questions asked.
pub fn program_address_unchecked(program: &[u8]) -> Address {
    Address::new(hash_with_tag(PROGRAM_TAG, program))
}

/// Program address from standard base64 text.
pub fn program_address_from_base64(encoded: &str) -> Result<Address, ProgramError> {
    let program = STANDARD
        .decode(encoded.trim())
        .map_err(|e| ProgramError::InvalidBase64(e.to_string()))?;
    program_address(&program)
}

/// LEB128 unsigned varint at the start of `bytes`.
fn read_uvarint(bytes: &[u8]) -> Option<u64> {
    let mut value: u64 = 0;
    for (i, &b) in bytes.iter().enumerate().take(10) {
        value |= u64::from(b & 0x7f) << (7 * i);
        if b & 0x80 == 0 {
            return Some(value);
        }
    }
    None
}
