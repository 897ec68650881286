//! Threshold account descriptors.

use crate::config::{MAX_MULTISIG_KEYS, MULTISIG_ADDR_TAG, MULTISIG_VERSION};
use crate::crypto::hash::hash_parts;
use crate::identity::address::Address;

use super::MultisigError;

/// A T-of-N account over an ordered list of public keys.
///
/// The order is part of the account: it fixes the address and the slot
/// each signer's signature goes into. Keys are never re-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MultisigAccount {
    version: u8,
    threshold: u8,
    public_keys: Vec<Address>,
}

impl MultisigAccount {
    /// Validates `1 <= threshold <= N <= 255` and the version.
    pub fn new(version: u8, threshold: u8, public_keys: Vec<Address>) -> Result<Self, MultisigError> {
        if version != MULTISIG_VERSION {
            return Err(MultisigError::UnsupportedVersion(version));
        }
        if public_keys.len() > MAX_MULTISIG_KEYS {
            return Err(MultisigError::TooManyKeys(public_keys.len()));
        }
        if threshold == 0 || threshold as usize > public_keys.len() {
            return Err(MultisigError::InvalidThreshold {
                threshold,
                keys: public_keys.len(),
            });
        }
        Ok(Self {
            version,
            threshold,
            public_keys,
        })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn public_keys(&self) -> &[Address] {
        &self.public_keys
    }

    /// `sha512_256("MultisigAddr" || version || threshold || pk_1 || ... || pk_N)`.
    ///
    /// Depends only on the descriptor, never on which slots are signed.
    pub fn address(&self) -> Address {
        let mut parts: Vec<&[u8]> = Vec::with_capacity(self.public_keys.len() + 2);
        let prefix = [self.version, self.threshold];
        parts.push(MULTISIG_ADDR_TAG);
        parts.push(&prefix);
        for key in &self.public_keys {
            parts.push(key.as_bytes());
        }
        Address::new(hash_parts(&parts))
    }

    /// Slot of the first occurrence of `key`.
    pub fn index_of(&self, key: &Address) -> Option<usize> {
        self.public_keys.iter().position(|k| k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> Vec<Address> {
        [
            "DN7MBMCL5JQ3PFUQS7TMX5AH4EEKOBJVDUF4TCV6WERATKFLQF4MQUPZTA",
            "BFRTECKTOOE7A5LHCF3TTEOH2A7BW46IYT2SX5VP6ANKEXHZYJY77SJTVM",
            "47YPQTIGQEO7T4Y4RWDYWEKV6RTR2UNBQXBABEEGM72ESWDQNCQ52OPASU",
        ]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect()
    }

    #[test]
    fn known_two_of_three_address() {
        let msig = MultisigAccount::new(1, 2, keys()).unwrap();
        assert_eq!(
            msig.address().to_string(),
            "RWJLJCMQAFZ2ATP2INM2GZTKNL6OULCCUBO5TQPXH3V2KR4AG7U5UA5JNM"
        );
    }

    #[test]
    fn known_one_of_two_address() {
        let msig = MultisigAccount::new(1, 1, keys()[..2].to_vec()).unwrap();
        assert_eq!(
            msig.address().to_string(),
            "VBKY4EEPOQ225RLEAQQGLMV7LUCW6AFAGH4XVIRYA4HRJLF4XZG57QWCKM"
        );
    }

    #[test]
    fn key_order_changes_address() {
        let mut reversed = keys();
        reversed.reverse();
        let a = MultisigAccount::new(1, 2, keys()).unwrap();
        let b = MultisigAccount::new(1, 2, reversed).unwrap();
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn threshold_changes_address() {
        let a = MultisigAccount::new(1, 1, keys()).unwrap();
        let b = MultisigAccount::new(1, 2, keys()).unwrap();
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn validation() {
        assert_eq!(
            MultisigAccount::new(2, 1, keys()),
            Err(MultisigError::UnsupportedVersion(2))
        );
        assert_eq!(
            MultisigAccount::new(1, 0, keys()),
            Err(MultisigError::InvalidThreshold { threshold: 0, keys: 3 })
        );
        assert_eq!(
            MultisigAccount::new(1, 4, keys()),
            Err(MultisigError::InvalidThreshold { threshold: 4, keys: 3 })
        );
        assert!(matches!(
            MultisigAccount::new(1, 1, vec![]),
            Err(MultisigError::InvalidThreshold { .. })
        ));
        assert_eq!(
            MultisigAccount::new(1, 1, vec![Address::new([1; 32]); 256]),
            Err(MultisigError::TooManyKeys(256))
        );
    }

    #[test]
    fn index_of_first_occurrence() {
        let k = keys();
        let msig = MultisigAccount::new(1, 2, vec![k[1], k[0], k[1]]).unwrap();
        assert_eq!(msig.index_of(&k[1]), Some(0));
        assert_eq!(msig.index_of(&k[0]), Some(1));
        assert_eq!(msig.index_of(&k[2]), None);
    }
}
