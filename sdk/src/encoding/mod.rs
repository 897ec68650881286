//! # Canonical Encoding
//!
//! Everything that gets hashed or signed goes through this module first. The
//! format is a strict subset of MessagePack in which every logical value has
//! exactly one byte representation:
//!
//! - integers and length prefixes use the shortest form that fits
//! - map keys are strings, sorted by their raw bytes, never repeated
//! - map entries holding a zero value are left out entirely
//!
//! Zero values inside arrays are kept, because an array's positions are part
//! of its meaning. The decoder enforces all of the above, so a byte string
//! that decodes is always the canonical encoding of what it decoded to.
//!
//! Typed records implement [`Canonical`] to move between Rust structs and the
//! [`Value`] tree.

pub mod msgpack;
pub mod value;

pub use msgpack::{decode, decode_concatenated, encode, encode_into};
pub use value::{MapBuilder, MapReader, Value};

use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

/// Why a byte string is not an acceptable canonical document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("input truncated at offset {offset}")]
    Truncated { offset: usize },

    #[error("{count} trailing bytes after the encoded value")]
    TrailingBytes { count: usize },

    #[error("unsupported format marker 0x{marker:02x} at offset {offset}")]
    UnsupportedMarker { marker: u8, offset: usize },

    #[error("non-canonical encoding at offset {offset}: {reason}")]
    NonCanonical { offset: usize, reason: &'static str },

    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("map key at offset {offset} is not a string")]
    NonStringKey { offset: usize },

    #[error("map key {key:?} is out of order or repeated")]
    KeyOrder { key: String },

    #[error("map entry {key:?} holds a zero value and should have been omitted")]
    ExplicitZero { key: String },

    #[error("nesting deeper than {max} levels")]
    DepthExceeded { max: usize },

    #[error("field {field}: expected {expected}, found {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field {field}: expected {expected} bytes, found {found}")]
    WrongLength {
        field: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown field {field:?} in {context}")]
    UnknownField { context: &'static str, field: String },

    #[error("missing required field {field}")]
    MissingField { field: String },

    #[error("unknown transaction type {0:?}")]
    UnknownTransactionType(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("invalid base64: {0}")]
    InvalidBase64(String),
}

/// A record with a canonical byte form.
pub trait Canonical: Sized {
    /// Converts the record into a value tree.
    fn to_value(&self) -> Value;

    /// Rebuilds the record from a value tree, rejecting unknown fields.
    fn from_value(value: Value) -> Result<Self, DecodeError>;

    fn to_canonical_bytes(&self) -> Vec<u8> {
        encode(&self.to_value())
    }

    fn from_canonical_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_value(decode(bytes)?)
    }

    fn to_base64(&self) -> String {
        to_base64(&self.to_canonical_bytes())
    }

    fn from_base64(text: &str) -> Result<Self, DecodeError> {
        Self::from_canonical_bytes(&from_base64(text)?)
    }
}

/// Standard padded base64, the form the network's REST API uses.
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn from_base64(text: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))
}
