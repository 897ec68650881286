//! # 25-Word Mnemonics
//!
//! A 32-byte key is written down as 25 words from the 2048-word BIP-39
//! English list:
//!
//! ```text
//! key (256 bits) -> 24 words of 11 bits, least-significant bits first
//! checksum word  =  first 11 bits of sha512_256(tag || key)[0..2]
//! ```
//!
//! This is *not* BIP-39. The word list is shared, but there is no PBKDF2
//! stretching and the checksum is computed differently, so a phrase from
//! one scheme means nothing to the other. We only borrow the list from the
//! `bip39` crate.
//!
//! Two kinds of secret use this encoding. Account seeds use the empty tag,
//! which is the format every existing wallet reads. Master derivation keys
//! use the tag `MDK`, so a master-key phrase fails the checksum when fed to
//! the seed decoder and the other way round.

use bip39::Language;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::{
    BITS_PER_WORD, MASTER_KEY_MNEMONIC_TAG, MNEMONIC_WORD_COUNT, SECRET_KEY_MNEMONIC_TAG,
    SEED_LENGTH,
};
use crate::crypto::hash::hash_with_tag;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MnemonicError {
    #[error("expected {expected} words, got {found}")]
    InvalidWordCount { expected: usize, found: usize },

    #[error("word {0:?} is not in the word list")]
    InvalidWord(String),

    #[error("checksum word does not match")]
    InvalidChecksum,

    /// The 24 data words carry bits beyond the 32-byte key.
    #[error("mnemonic does not decode to a 32-byte key")]
    InvalidKeyLength,
}

const WORD_MASK: u32 = (1 << BITS_PER_WORD) - 1;

fn word_list() -> &'static [&'static str; 2048] {
    Language::English.word_list()
}

/// Regroups bytes into 11-bit little-endian indices. A partial final group
/// is emitted as is.
fn to_11_bit(bytes: &[u8]) -> Vec<u16> {
    let mut out = Vec::with_capacity((bytes.len() * 8 + BITS_PER_WORD - 1) / BITS_PER_WORD);
    let mut buffer: u32 = 0;
    let mut bits = 0usize;
    for byte in bytes {
        buffer |= (*byte as u32) << bits;
        bits += 8;
        if bits >= BITS_PER_WORD {
            out.push((buffer & WORD_MASK) as u16);
            buffer >>= BITS_PER_WORD;
            bits -= BITS_PER_WORD;
        }
    }
    if bits > 0 {
        out.push((buffer & WORD_MASK) as u16);
    }
    out
}

/// Inverse of [`to_11_bit`]: packs 11-bit indices back into bytes.
fn from_11_bit(indices: &[u16]) -> Zeroizing<Vec<u8>> {
    let mut out = Zeroizing::new(Vec::with_capacity(indices.len() * BITS_PER_WORD / 8 + 1));
    let mut buffer: u32 = 0;
    let mut bits = 0usize;
    for index in indices {
        buffer |= (*index as u32) << bits;
        bits += BITS_PER_WORD;
        while bits >= 8 {
            out.push((buffer & 0xff) as u8);
            buffer >>= 8;
            bits -= 8;
        }
    }
    if bits > 0 {
        out.push((buffer & 0xff) as u8);
    }
    out
}

fn checksum_index(tag: &[u8], key: &[u8]) -> u16 {
    let digest = hash_with_tag(tag, key);
    to_11_bit(&digest[..2])[0]
}

fn encode(key: &[u8; SEED_LENGTH], tag: &[u8]) -> String {
    let words = word_list();
    let mut indices = to_11_bit(key);
    indices.push(checksum_index(tag, key));
    indices
        .iter()
        .map(|i| words[*i as usize])
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode(phrase: &str, tag: &[u8]) -> Result<[u8; SEED_LENGTH], MnemonicError> {
    let normalized = phrase.trim().to_lowercase();
    let words: Vec<&str> = normalized.split_whitespace().collect();
    if words.len() != MNEMONIC_WORD_COUNT {
        return Err(MnemonicError::InvalidWordCount {
            expected: MNEMONIC_WORD_COUNT,
            found: words.len(),
        });
    }

    let mut indices = Vec::with_capacity(MNEMONIC_WORD_COUNT);
    for word in &words {
        let index = Language::English
            .find_word(word)
            .ok_or_else(|| MnemonicError::InvalidWord((*word).to_string()))?;
        indices.push(index);
    }

    let (checksum, data) = match indices.split_last() {
        Some(split) => split,
        None => return Err(MnemonicError::InvalidWordCount { expected: MNEMONIC_WORD_COUNT, found: 0 }),
    };
    let bytes = from_11_bit(data);
    // 24 words hold 264 bits; the byte past the key must be empty.
    if bytes.len() != SEED_LENGTH + 1 || bytes[SEED_LENGTH] != 0 {
        return Err(MnemonicError::InvalidKeyLength);
    }
    let mut key = [0u8; SEED_LENGTH];
    key.copy_from_slice(&bytes[..SEED_LENGTH]);

    if checksum_index(tag, &key) != *checksum {
        return Err(MnemonicError::InvalidChecksum);
    }
    Ok(key)
}

/// Mnemonic of an account seed.
pub fn secret_key_to_mnemonic(seed: &[u8; SEED_LENGTH]) -> String {
    encode(seed, SECRET_KEY_MNEMONIC_TAG)
}

/// Account seed from its mnemonic.
pub fn secret_key_from_mnemonic(phrase: &str) -> Result<[u8; SEED_LENGTH], MnemonicError> {
    decode(phrase, SECRET_KEY_MNEMONIC_TAG)
}

/// Mnemonic of a master derivation key.
pub fn master_key_to_mnemonic(mdk: &[u8; SEED_LENGTH]) -> String {
    encode(mdk, MASTER_KEY_MNEMONIC_TAG)
}

/// Master derivation key from its mnemonic.
pub fn master_key_from_mnemonic(phrase: &str) -> Result<[u8; SEED_LENGTH], MnemonicError> {
    decode(phrase, MASTER_KEY_MNEMONIC_TAG)
}
