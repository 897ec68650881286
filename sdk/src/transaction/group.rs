//! Atomic transaction groups.
//!
//! Up to sixteen transactions can be bound together so that either all of
//! them are confirmed or none is. The binding is a group id written into
//! each member's `grp` field:
//!
//! ```text
//! group_id = sha512_256( "TG" || canonical({ txlist: [raw_id(t1), ..., raw_id(tn)] }) )
//! ```
//!
//! Ids are computed over the members *before* the group is assigned, so the
//! order of the list is part of the group's identity.

use tracing::debug;

use super::builder::{Transaction, TransactionError};
use crate::config::{MAX_GROUP_SIZE, TX_GROUP_TAG};
use crate::crypto::hash::hash_with_tag;
use crate::encoding::{encode, MapBuilder, Value};

/// Group id of `txns`, in order.
pub fn compute_group_id(txns: &[Transaction]) -> Result<[u8; 32], TransactionError> {
    if txns.is_empty() {
        return Err(TransactionError::EmptyGroup);
    }
    if txns.len() > MAX_GROUP_SIZE {
        return Err(TransactionError::GroupTooLarge {
            size: txns.len(),
            max: MAX_GROUP_SIZE,
        });
    }
    let ids = txns
        .iter()
        .map(|t| Value::Bytes(t.raw_id().to_vec()))
        .collect();
    let preimage = MapBuilder::new().array("txlist", ids).build();
    Ok(hash_with_tag(TX_GROUP_TAG, &encode(&preimage)))
}

/// Computes the group id and writes it into every member.
///
/// Fails without touching anything if a member already has a group.
pub fn assign_group_id(txns: &mut [Transaction]) -> Result<[u8; 32], TransactionError> {
    if let Some(index) = txns.iter().position(|t| t.group().is_some()) {
        return Err(TransactionError::AlreadyGrouped { index });
    }
    let gid = compute_group_id(txns)?;
    for txn in txns.iter_mut() {
        txn.set_group(gid);
    }
    debug!(size = txns.len(), group = %hex::encode(gid), "assigned group id");
    Ok(gid)
}

/// Checks that every member carries the id computed over the whole list.
///
/// This is what a node does with a submitted group: strip the ids, hash
/// the members in order, and compare.
pub fn verify_group(txns: &[Transaction]) -> Result<[u8; 32], TransactionError> {
    let stripped: Vec<Transaction> = txns
        .iter()
        .map(|t| {
            let mut t = t.clone();
            t.header.group = None;
            t
        })
        .collect();
    let gid = compute_group_id(&stripped)?;
    if let Some(index) = txns.iter().position(|t| t.group() != Some(gid)) {
        return Err(TransactionError::GroupMismatch { index });
    }
    Ok(gid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::address::Address;
    use crate::transaction::builder::TransactionBuilder;
    use crate::transaction::types::{SuggestedParams, TransactionKind};

    fn txn(amount: u64) -> Transaction {
        let params = SuggestedParams {
            fee: 1000,
            first_valid: 1,
            last_valid: 100,
            genesis_hash: [3; 32],
            genesis_id: String::new(),
            flat_fee: true,
        };
        TransactionBuilder::new(
            Address::new([1; 32]),
            &params,
            TransactionKind::payment(Address::new([2; 32]), amount),
        )
        .build()
        .unwrap()
    }

    #[test]
    fn group_assignment_sets_every_member() {
        let mut txns = vec![txn(1), txn(2), txn(3)];
        let gid = assign_group_id(&mut txns).unwrap();
        assert!(txns.iter().all(|t| t.group() == Some(gid)));
    }

    #[test]
    fn order_matters() {
        let a = compute_group_id(&[txn(1), txn(2)]).unwrap();
        let b = compute_group_id(&[txn(2), txn(1)]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn group_id_preimage() {
        let members = [txn(1), txn(2)];
        let mut preimage = vec![0x81, 0xa6];
        preimage.extend_from_slice(b"txlist");
        preimage.push(0x92);
        for t in &members {
            preimage.extend_from_slice(&[0xc4, 0x20]);
            preimage.extend_from_slice(&t.raw_id());
        }
        assert_eq!(
            compute_group_id(&members).unwrap(),
            hash_with_tag(b"TG", &preimage)
        );
    }

    #[test]
    fn limits() {
        assert_eq!(compute_group_id(&[]), Err(TransactionError::EmptyGroup));
        let many: Vec<Transaction> = (0..17).map(txn).collect();
        assert!(matches!(
            compute_group_id(&many),
            Err(TransactionError::GroupTooLarge { size: 17, .. })
        ));
    }

    #[test]
    fn regrouping_rejected() {
        let mut txns = vec![txn(1), txn(2)];
        assign_group_id(&mut txns).unwrap();
        let before = txns.clone();
        assert_eq!(
            assign_group_id(&mut txns),
            Err(TransactionError::AlreadyGrouped { index: 0 })
        );
        assert_eq!(txns, before);
    }

    #[test]
    fn grouping_changes_member_ids() {
        let mut txns = vec![txn(1), txn(2)];
        let before = txns[0].id();
        assign_group_id(&mut txns).unwrap();
        assert_ne!(txns[0].id(), before);
    }

    #[test]
    fn verify_group_detects_tampering() {
        let mut txns = vec![txn(1), txn(2), txn(3)];
        let gid = assign_group_id(&mut txns).unwrap();
        assert_eq!(verify_group(&txns), Ok(gid));
        assert_eq!(
            verify_group(&txns[..2]),
            Err(TransactionError::GroupMismatch { index: 0 })
        );
        txns.swap(0, 1);
        assert!(verify_group(&txns).is_err());
    }
}
