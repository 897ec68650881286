//! The signature arena of a multisig authorization.
//!
//! One slot per public key, indexed by the key's position in the account.
//! A slot is either empty or holds exactly one signature. Encoded as
//!
//! ```text
//! { subsig: [ {pk, s?}, ... ], thr, v }
//! ```
//!
//! where unsigned slots carry only their `pk`.

use tracing::trace;

use crate::crypto::keys::{Account, Signature};
use crate::crypto::signatures::verify;
use crate::encoding::value::fixed_from_slice;
use crate::encoding::{Canonical, DecodeError, MapBuilder, MapReader, Value};
use crate::identity::address::Address;

use super::{MultisigAccount, MultisigError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigSig {
    account: MultisigAccount,
    slots: Box<[Option<Signature>]>,
}

impl MultisigSig {
    /// All slots empty.
    pub fn new(account: MultisigAccount) -> Self {
        let slots = vec![None; account.public_keys().len()].into_boxed_slice();
        Self { account, slots }
    }

    pub fn account(&self) -> &MultisigAccount {
        &self.account
    }

    pub fn slots(&self) -> &[Option<Signature>] {
        &self.slots
    }

    /// Number of filled slots.
    pub fn signature_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn meets_threshold(&self) -> bool {
        self.signature_count() >= self.account.threshold() as usize
    }

    /// Signs `message` and stores the result in the signer's slot.
    ///
    /// Signing again with the same key rewrites the same signature, since
    /// Ed25519 is deterministic.
    pub fn sign_message(&mut self, account: &Account, message: &[u8]) -> Result<usize, MultisigError> {
        let signer = account.address();
        let index = self
            .account
            .index_of(&signer)
            .ok_or(MultisigError::NotASigner(signer))?;
        self.slots[index] = Some(account.sign_raw(message));
        trace!(index, "filled multisig slot");
        Ok(index)
    }

    /// Places a signature produced elsewhere into `index`.
    pub fn set_slot(&mut self, index: usize, signature: Signature) -> Result<(), MultisigError> {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = Some(signature);
                Ok(())
            }
            None => Err(MultisigError::SlotOutOfRange {
                index,
                keys: self.slots.len(),
            }),
        }
    }

    /// Index-wise union with `other`, which must describe the same account.
    /// Equal signatures in a slot are fine; different ones are an error and
    /// leave `self` untouched.
    pub fn merge_from(&mut self, other: &MultisigSig) -> Result<(), MultisigError> {
        if self.account != other.account {
            return Err(MultisigError::MismatchedTransactions(
                "multisig descriptors differ".into(),
            ));
        }
        for (index, (mine, theirs)) in self.slots.iter().zip(other.slots.iter()).enumerate() {
            if let (Some(a), Some(b)) = (mine, theirs) {
                if a != b {
                    return Err(MultisigError::ConflictingSignatures { index });
                }
            }
        }
        for (mine, theirs) in self.slots.iter_mut().zip(other.slots.iter()) {
            if mine.is_none() {
                *mine = *theirs;
            }
        }
        Ok(())
    }

    /// Checks every filled slot against its key and the threshold.
    pub fn verify(&self, message: &[u8]) -> Result<(), MultisigError> {
        let need = self.account.threshold() as usize;
        let have = self.signature_count();
        if have < need {
            return Err(MultisigError::InsufficientSignatures { have, need });
        }
        for (index, (key, slot)) in self
            .account
            .public_keys()
            .iter()
            .zip(self.slots.iter())
            .enumerate()
        {
            if let Some(sig) = slot {
                if !verify(key.as_bytes(), message, sig) {
                    return Err(MultisigError::InvalidSignature { index });
                }
            }
        }
        Ok(())
    }
}

impl Canonical for MultisigSig {
    fn to_value(&self) -> Value {
        let subsigs = self
            .account
            .public_keys()
            .iter()
            .zip(self.slots.iter())
            .map(|(pk, slot)| {
                MapBuilder::new()
                    .bytes("pk", pk.as_bytes())
                    .optional_fixed("s", slot.as_ref().map(|s| s.as_bytes().as_slice()))
                    .build()
            })
            .collect();
        MapBuilder::new()
            .array("subsig", subsigs)
            .uint("thr", self.account.threshold() as u64)
            .uint("v", self.account.version() as u64)
            .build()
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let mut r = MapReader::new(value, "msig")?;
        let version = small(&mut r, "v")?;
        let threshold = small(&mut r, "thr")?;
        let mut keys = Vec::new();
        let mut slots = Vec::new();
        for entry in r.array("subsig")? {
            let mut sub = MapReader::new(entry, "subsig")?;
            let pk = sub.bytes("pk")?;
            keys.push(Address::new(fixed_from_slice::<32>(&pk, sub.field("pk"))?));
            slots.push(sub.optional_fixed::<64>("s")?.map(Signature::from_bytes));
            sub.finish()?;
        }
        r.finish()?;
        let account =
            MultisigAccount::new(version, threshold, keys).map_err(|e| DecodeError::InvalidField {
                field: "msig".into(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            account,
            slots: slots.into_boxed_slice(),
        })
    }
}

fn small(r: &mut MapReader, key: &str) -> Result<u8, DecodeError> {
    let n = r.uint(key)?;
    u8::try_from(n).map_err(|_| DecodeError::InvalidField {
        field: r.field(key),
        reason: format!("{} does not fit in one byte", n),
    })
}
