//! # Hashing Utilities
//!
//! The protocol uses exactly one hash function: SHA-512/256. That is SHA-512
//! with its own initial values, truncated to 32 bytes. It runs at SHA-512
//! speed on 64-bit hardware and is immune to length extension, which plain
//! SHA-256 is not.
//!
//! Almost every digest is taken over `tag || payload`, where the tag is one
//! of the short ASCII prefixes in [`crate::config`]. Two different kinds of
//! object therefore never hash (or sign) to the same preimage even when
//! their payload bytes happen to coincide.

use sha2::{Digest, Sha512_256};

use crate::config::{ADDRESS_CHECKSUM_LENGTH, HASH_LENGTH};

/// SHA-512/256 of `data`.
///
/// # Example
///
/// ```
/// use algosdk_core::crypto::sha512_256;
///
/// let digest = sha512_256(b"abc");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn sha512_256(data: &[u8]) -> [u8; HASH_LENGTH] {
    hash_parts(&[data])
}

/// SHA-512/256 of `tag || data`, fed to the hasher without concatenating.
pub fn hash_with_tag(tag: &[u8], data: &[u8]) -> [u8; HASH_LENGTH] {
    hash_parts(&[tag, data])
}

/// SHA-512/256 over several slices as if they were one.
pub fn hash_parts(parts: &[&[u8]]) -> [u8; HASH_LENGTH] {
    let mut hasher = Sha512_256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Address checksum: the last four bytes of the public key's digest.
pub fn address_checksum(public_key: &[u8]) -> [u8; ADDRESS_CHECKSUM_LENGTH] {
    let digest = sha512_256(public_key);
    let mut checksum = [0u8; ADDRESS_CHECKSUM_LENGTH];
    checksum.copy_from_slice(&digest[HASH_LENGTH - ADDRESS_CHECKSUM_LENGTH..]);
    checksum
}

/// `tag || data` as one buffer, for the places that need the bytes rather
/// than their digest (signing inputs, mostly).
pub fn tagged(tag: &[u8], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(tag.len() + data.len());
    out.extend_from_slice(tag);
    out.extend_from_slice(data);
    out
}
