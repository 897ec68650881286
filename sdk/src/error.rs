//! Crate-wide error type.
//!
//! Each module has its own error enum. [`SdkError`] wraps all of them for
//! callers that chain operations across modules and only want one `?`.

use thiserror::Error;

use crate::client::ClientError;
use crate::encoding::DecodeError;
use crate::identity::address::AddressError;
use crate::identity::mnemonic::MnemonicError;
use crate::logic::{LogicSigError, ProgramError};
use crate::multisig::MultisigError;
use crate::transaction::builder::TransactionError;
use crate::transaction::verification::VerificationError;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Multisig(#[from] MultisigError),

    #[error(transparent)]
    Program(#[from] ProgramError),

    #[error(transparent)]
    LogicSig(#[from] LogicSigError),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

pub type SdkResult<T> = Result<T, SdkError>;
