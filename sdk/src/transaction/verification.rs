//! Signature verification for signed envelopes.
//!
//! These are the checks a node runs before accepting a signed transaction,
//! done locally so a client can catch a bad envelope before submitting it.
//! They are cryptographic only: validity rounds, balances, and fees are the
//! network's business.

use thiserror::Error;
use tracing::trace;

use super::envelope::SignedEnvelope;
use super::signing::SignedTransaction;
use crate::crypto::signatures::verify;
use crate::identity::address::Address;
use crate::logic::{LogicSigError, LogicSigTransaction};
use crate::multisig::{MultisigError, MultisigTransaction};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// The Ed25519 signature does not verify under the authorizer's key.
    #[error("signature does not verify against {signer}")]
    InvalidSignature { signer: Address },

    /// The multisig account hashes to a different address than the one
    /// that must authorize.
    #[error("multisig account {found} cannot authorize for {expected}")]
    MultisigAddressMismatch { expected: Address, found: Address },

    #[error(transparent)]
    Multisig(#[from] MultisigError),

    #[error(transparent)]
    LogicSig(#[from] LogicSigError),
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verifies a single-signature envelope against `sgnr`, or the sender when
/// `sgnr` is absent.
pub fn verify_signed_transaction(stxn: &SignedTransaction) -> Result<(), VerificationError> {
    let signer = stxn.signer();
    if verify(signer.as_bytes(), &stxn.transaction().bytes_to_sign(), stxn.signature()) {
        Ok(())
    } else {
        Err(VerificationError::InvalidSignature { signer })
    }
}

/// Verifies a multisig envelope.
///
/// The checks, in order:
///
/// 1. **Address**: the multisig account must hash to `sgnr`, or to the
///    sender when `sgnr` is absent.
/// 2. **Threshold**: at least `threshold` slots filled.
/// 3. **Signatures**: every filled slot verifies under its key.
pub fn verify_multisig_transaction(mtxn: &MultisigTransaction) -> Result<(), VerificationError> {
    let expected = if mtxn.auth_addr().is_zero() {
        mtxn.transaction().sender()
    } else {
        mtxn.auth_addr()
    };
    let found = mtxn.account().address();
    if found != expected {
        return Err(VerificationError::MultisigAddressMismatch { expected, found });
    }
    mtxn.multisig()
        .verify(&mtxn.transaction().bytes_to_sign())?;
    Ok(())
}

/// Verifies a logic-sig envelope: escrow address or delegation signature.
/// The program itself is not evaluated.
pub fn verify_logic_sig_transaction(ltxn: &LogicSigTransaction) -> Result<(), VerificationError> {
    ltxn.verify()?;
    Ok(())
}

/// Dispatches on the envelope form.
pub fn verify_envelope(envelope: &SignedEnvelope) -> Result<(), VerificationError> {
    let result = match envelope {
        SignedEnvelope::Single(s) => verify_signed_transaction(s),
        SignedEnvelope::Multisig(m) => verify_multisig_transaction(m),
        SignedEnvelope::Logic(l) => verify_logic_sig_transaction(l),
    };
    trace!(
        txid = %envelope.id(),
        kind = envelope.kind(),
        ok = result.is_ok(),
        "verified envelope"
    );
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
