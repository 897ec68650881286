//! # Digital Signatures
//!
//! Verification helpers and the teal-sign surface.
//!
//! Signing itself happens on [`Account`]; this module holds the free
//! functions that check signatures, plus `teal_sign`, which signs data on
//! behalf of a program address. A program can verify such a signature
//! on-chain with `ed25519verify`, which prepends `ProgData || program
//! address` to whatever it is given. The `ProgData` tag keeps these
//! signatures from ever being replayed as transaction signatures (tag `TX`)
//! and vice versa.
//!
//! `verify` returns a plain boolean. Callers that need to know *why* a
//! signed envelope is bad go through the typed verification in
//! [`crate::transaction::verification`] instead.

use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey};

use super::keys::{Account, Signature};
use crate::config::{PROG_DATA_TAG, PUBLIC_KEY_LENGTH};
use crate::identity::address::Address;
use crate::logic::program::{self, ProgramError};

/// Checks an Ed25519 signature over `message` exactly as given.
///
/// Returns `false` for a bad signature and for public key bytes that are
/// not a curve point alike.
///
/// # Example
///
/// ```
/// use algosdk_core::crypto::{verify, Account};
///
/// let account = Account::generate();
/// let sig = account.sign_raw(b"payload");
/// assert!(verify(&account.public_key(), b"payload", &sig));
/// ```
pub fn verify(public_key: &[u8; PUBLIC_KEY_LENGTH], message: &[u8], signature: &Signature) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let sig = DalekSignature::from_bytes(signature.as_bytes());
    verifying_key.verify(message, &sig).is_ok()
}

fn teal_message(program_address: &Address, data: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(PROG_DATA_TAG.len() + PUBLIC_KEY_LENGTH + data.len());
    message.extend_from_slice(PROG_DATA_TAG);
    message.extend_from_slice(program_address.as_bytes());
    message.extend_from_slice(data);
    message
}

/// Signs `ProgData || program_address || data`.
pub fn teal_sign(account: &Account, data: &[u8], program_address: &Address) -> Signature {
    account.sign_raw(&teal_message(program_address, data))
}

/// Same as [`teal_sign`], deriving the program address from its bytes.
///
/// The program goes through the sanity check first; a suspicious program is
/// reported rather than signed for.
pub fn teal_sign_from_program(
    account: &Account,
    data: &[u8],
    program_bytes: &[u8],
) -> Result<Signature, ProgramError> {
    let address = program::program_address(program_bytes)?;
    Ok(teal_sign(account, data, &address))
}

/// Verifies a teal-sign signature made by `signer` for `program_address`.
pub fn verify_teal(
    signer: &Address,
    data: &[u8],
    program_address: &Address,
    signature: &Signature,
) -> bool {
    verify(signer.as_bytes(), &teal_message(program_address, data), signature)
}
