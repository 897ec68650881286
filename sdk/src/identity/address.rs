//! # Address Codec
//!
//! An address is a 32-byte Ed25519 public key. Its text form is
//!
//! ```text
//! base32_nopad( public_key || sha512_256(public_key)[28..32] )
//! ```
//!
//! which always comes out as 58 upper-case characters. The four checksum
//! bytes catch typos when an address is pasted by hand; decoding recomputes
//! them and refuses anything that does not match.
//!
//! Multisig accounts and programs have addresses too. Those 32 bytes are a
//! hash rather than a curve point, but the codec does not care.

use std::fmt;
use std::str::FromStr;

use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::{ADDRESS_CHECKSUM_LENGTH, ADDRESS_LENGTH, PUBLIC_KEY_LENGTH};
use crate::crypto::hash::address_checksum;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Wrong length, a character outside the base32 alphabet, or non-zero
    /// padding bits.
    #[error("malformed address: {0}")]
    MalformedAddress(String),

    #[error("address checksum mismatch")]
    ChecksumMismatch,
}

/// A 32-byte account address. [`Address::ZERO`] stands for "absent".
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; PUBLIC_KEY_LENGTH]);

impl Address {
    /// The all-zero sentinel. Never encoded into a transaction field.
    pub const ZERO: Address = Address([0u8; PUBLIC_KEY_LENGTH]);

    pub const fn new(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; PUBLIC_KEY_LENGTH]
    }

    /// Text form: public key plus checksum, base32 without padding.
    pub fn encode(&self) -> String {
        let mut raw = [0u8; PUBLIC_KEY_LENGTH + ADDRESS_CHECKSUM_LENGTH];
        raw[..PUBLIC_KEY_LENGTH].copy_from_slice(&self.0);
        raw[PUBLIC_KEY_LENGTH..].copy_from_slice(&address_checksum(&self.0));
        BASE32_NOPAD.encode(&raw)
    }

    /// Parses the text form and verifies the checksum.
    pub fn decode(text: &str) -> Result<Self, AddressError> {
        if text.len() != ADDRESS_LENGTH {
            return Err(AddressError::MalformedAddress(format!(
                "expected {} characters, got {}",
                ADDRESS_LENGTH,
                text.len()
            )));
        }
        let raw = BASE32_NOPAD
            .decode(text.as_bytes())
            .map_err(|e| AddressError::MalformedAddress(e.to_string()))?;
        if raw.len() != PUBLIC_KEY_LENGTH + ADDRESS_CHECKSUM_LENGTH {
            return Err(AddressError::MalformedAddress(format!(
                "decoded to {} bytes",
                raw.len()
            )));
        }
        let (key, checksum) = raw.split_at(PUBLIC_KEY_LENGTH);
        if address_checksum(key) != checksum {
            return Err(AddressError::ChecksumMismatch);
        }
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        bytes.copy_from_slice(key);
        Ok(Self(bytes))
    }

    /// True when `text` decodes as an address.
    pub fn is_valid(text: &str) -> bool {
        Self::decode(text).is_ok()
    }
}

impl From<[u8; PUBLIC_KEY_LENGTH]> for Address {
    fn from(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encode())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::decode(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_ADDRESS: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ";

    #[test]
    fn zero_address_text() {
        assert_eq!(Address::ZERO.encode(), ZERO_ADDRESS);
        assert_eq!(Address::decode(ZERO_ADDRESS).unwrap(), Address::ZERO);
        assert!(Address::ZERO.is_zero());
    }

    #[test]
    fn roundtrip() {
        let address = Address::new([1u8; 32]);
        let text = address.to_string();
        assert_eq!(text, "AEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEA5RCDXMI");
        assert_eq!(text.len(), ADDRESS_LENGTH);
        assert_eq!(text.parse::<Address>().unwrap(), address);
    }

    #[test]
    fn corrupted_checksum_fails() {
        // Flip a data bit of the last character (Q -> A).
        let mut corrupted = ZERO_ADDRESS.to_string();
        corrupted.pop();
        corrupted.push('A');
        assert_eq!(Address::decode(&corrupted), Err(AddressError::ChecksumMismatch));
    }

    #[test]
    fn corrupted_key_fails() {
        let corrupted = ZERO_ADDRESS.replacen('A', "B", 1);
        assert_eq!(Address::decode(&corrupted), Err(AddressError::ChecksumMismatch));
    }

    #[test]
    fn padding_bits_must_be_zero() {
        // Q -> R only touches the two unused trailing bits.
        let mut corrupted = ZERO_ADDRESS.to_string();
        corrupted.pop();
        corrupted.push('R');
        assert!(matches!(
            Address::decode(&corrupted),
            Err(AddressError::MalformedAddress(_))
        ));
    }

    #[test]
    fn wrong_length_and_alphabet() {
        assert!(matches!(Address::decode("ABC"), Err(AddressError::MalformedAddress(_))));
        let lower = ZERO_ADDRESS.to_lowercase();
        assert!(matches!(Address::decode(&lower), Err(AddressError::MalformedAddress(_))));
        let bad = ZERO_ADDRESS.replacen('A', "1", 1);
        assert!(matches!(Address::decode(&bad), Err(AddressError::MalformedAddress(_))));
    }

    #[test]
    fn serde_uses_text_form() {
        let address = Address::new([1u8; 32]);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", address));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
        assert!(serde_json::from_str::<Address>("\"nope\"").is_err());
    }
}
