//! # Logic Signatures
//!
//! Programs as authorizers: program addresses, the sanity check that keeps
//! arbitrary bytes from being mistaken for a program, and the logic-sig
//! envelope in its escrow and delegated forms.

pub mod logicsig;
pub mod program;

pub use logicsig::{LogicSig, LogicSigAccount, LogicSigTransaction};
pub use program::{program_address, program_address_unchecked, sanity_check, ProgramError};

use thiserror::Error;

use crate::encoding::DecodeError;
use crate::identity::address::Address;
use crate::multisig::MultisigError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogicSigError {
    #[error(transparent)]
    Program(#[from] ProgramError),

    #[error(transparent)]
    Multisig(#[from] MultisigError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("logic sig is already delegated")]
    AlreadyDelegated,

    #[error("logic sig has no multisig delegation to append to")]
    NotMultisigDelegated,

    #[error("logic sig carries both a signature and a multisig")]
    BothDelegations,

    #[error("delegation signature does not verify")]
    InvalidDelegation,

    #[error("logic sig authorizes for {expected}, not {found}")]
    AddressMismatch { expected: Address, found: Address },
}
