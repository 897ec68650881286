//! Golden-vector tests.
//!
//! Every envelope here is compared byte for byte against fixtures produced
//! by an independent implementation of the same canonical format. If one of
//! these breaks, signatures made by this crate are no longer interchangeable
//! with anyone else's, even if every round-trip test still passes.

use algosdk_core::crypto::{teal_sign, teal_sign_from_program, verify_teal, Account};
use algosdk_core::encoding::{from_base64, to_base64, Canonical};
use algosdk_core::identity::Address;
use algosdk_core::logic::{program_address, LogicSigAccount, LogicSigTransaction};
use algosdk_core::multisig::{MultisigAccount, MultisigTransaction};
use algosdk_core::transaction::{
    verify_envelope, SignedEnvelope, SignedTransaction, SuggestedParams, Transaction,
    TransactionBuilder, TransactionKind,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const MNEMONIC: &str = "advice pudding treat near rule blouse same whisper inner electric quit surface sunny dismiss leader blood seat clown cost exist hospital century reform able sponsor";

const RECEIVER: &str = "PNWOET7LLOWMBMLE4KOCELCX6X3D3Q4H2Q4QJASYIEOF7YIPPQBG3YQ5YI";

const MULTISIG_KEYS: [&str; 3] = [
    "DN7MBMCL5JQ3PFUQS7TMX5AH4EEKOBJVDUF4TCV6WERATKFLQF4MQUPZTA",
    "BFRTECKTOOE7A5LHCF3TTEOH2A7BW46IYT2SX5VP6ANKEXHZYJY77SJTVM",
    "47YPQTIGQEO7T4Y4RWDYWEKV6RTR2UNBQXBABEEGM72ESWDQNCQ52OPASU",
];

const SIGNED_PAYMENT: &str = "gqNzaWfEQAOWtHj4PTJc3w96iucTJSTGlwi8MWROSWBREK6bEVNo/u+9ifkr3JSR9QS0bwstoSKt51+jbgmVokLPpuw5xQujdHhuiaNhbXTNA+iiZnbNMLKjZ2VurGRldm5ldC12MzMuMKJnaMQgJgsgCaCTqIaLeVhyL6XlRu3n7Rfk2FxMeK+wRSaQ7dKibHbNNJqkbm90ZcQI6gAVR0Nsv5ajcmN2xCB7bOJP61uswLFk4pwiLFf19j3Dh9Q5BIJYQRxf4Q98AqNzbmTEIOfw+E0GgR358xyNh4sRVfRnHVGhhcIAkIZn9ElYcGihpHR5cGWjcGF5";

const SIGNED_PAYMENT_ID: &str = "BGCTN6VWIVJCADVTQ2SX3AF3EKFR6RMTC6IQWIBPXUEEXSS2EA5Q";

const PARTIAL_MULTISIG: &str = "gqRtc2lng6ZzdWJzaWeTgaJwa8QgG37AsEvqYbeWkJfmy/QH4QinBTUdC8mKvrEiCairgXiBonBrxCAJYzIJU3OJ8HVnEXc5kcfQPhtzyMT1K/av8BqiXPnCcYKicGvEIOfw+E0GgR358xyNh4sRVfRnHVGhhcIAkIZn9ElYcGihoXPEQHOoEilv97VrCsJ1PSdjq41GUmNDuqa1bBJfM+U8d6eieUqK4DKP3lIU0yzSOTy/Bob1VDAmkaoIRR8uuBsEBgOjdGhyAqF2AaN0eG6Jo2FtdM0D6KJmds0wsqNnZW6sZGV2bmV0LXYzMy4womdoxCAmCyAJoJOohot5WHIvpeVG7eftF+TYXEx4r7BFJpDt0qJsds00mqRub3RlxAjqABVHQ2y/lqNyY3bEIHts4k/rW6zAsWTinCIsV/X2PcOH1DkEglhBHF/hD3wCo3NuZMQgjZK0iZABc6BN+kNZo2ZqavzqLEKgXdnB9z7rpUeAN+mkdHlwZaNwYXk=";

const PARTIAL_MULTISIG_ID: &str = "HFA5VTDUE2EDVY2QSDXZ6MLY43OWPCRXVBBRJ4G3OIJJRGIHWBFQ";

const DELEGATED_LOGIC_SIG: &str = "gqRsc2lngqFsxAUBIAEBIqNzaWfEQE6HXaI5K0lcq50o/y3bWOYsyw9TLi/oorZB4xaNdn1Z14351u2f6JTON478fl+JhIP4HNRRAIh/I8EWXBPpJQ2jdHhuiaNhbXTNA+iiZnbNMLKjZ2VurGRldm5ldC12MzMuMKJnaMQgJgsgCaCTqIaLeVhyL6XlRu3n7Rfk2FxMeK+wRSaQ7dKibHbNNJqkbm90ZcQI6gAVR0Nsv5ajcmN2xCB7bOJP61uswLFk4pwiLFf19j3Dh9Q5BIJYQRxf4Q98AqNzbmTEIOfw+E0GgR358xyNh4sRVfRnHVGhhcIAkIZn9ElYcGihpHR5cGWjcGF5";

/// `#pragma version 1; int 1`.
const PROGRAM: [u8; 5] = [0x01, 0x20, 0x01, 0x01, 0x22];

const PROGRAM_ADDRESS: &str = "6Z3C3LDVWGMX23BMSYMANACQOSINPFIRF77H7N3AWJZYV6OH6GWTJKVMXY";

const TEAL_SIGNATURE: &str =
    "lZN4j8tCQ7Ctzln9AzArIh1Pel5NNeaer4xC+piOGOIcAhGSHbbTL5uTgmZgZfcodTz9GoOhxv6D0l0+bgdtCg==";

const BYTES_SIGNATURE: &str =
    "yABUuPv1BM7X+Bnvfixnb5FQXQsx+qtU76iN7isiGtoyiNUFofXZoyIB1KEkt33dqzYIRclAZnYLMmWoJ1d+Dw==";

fn account() -> Account {
    Account::from_mnemonic(MNEMONIC).unwrap()
}

/// Zero-fee payment of 1000 microalgos with a note, on devnet.
fn payment_from(sender: Address) -> Transaction {
    let gh = from_base64("JgsgCaCTqIaLeVhyL6XlRu3n7Rfk2FxMeK+wRSaQ7dI=").unwrap();
    let params = SuggestedParams {
        fee: 0,
        first_valid: 12466,
        last_valid: 13466,
        genesis_hash: gh.as_slice().try_into().unwrap(),
        genesis_id: "devnet-v33.0".into(),
        flat_fee: false,
    }
    .with_flat_fee(0);
    TransactionBuilder::new(
        sender,
        &params,
        TransactionKind::payment(RECEIVER.parse().unwrap(), 1000),
    )
    .note(from_base64("6gAVR0Nsv5Y=").unwrap())
    .build()
    .unwrap()
}

fn multisig() -> MultisigAccount {
    MultisigAccount::new(
        1,
        2,
        MULTISIG_KEYS.iter().map(|k| k.parse().unwrap()).collect(),
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Single signature
// ---------------------------------------------------------------------------

#[test]
fn signed_payment_matches_golden() {
    let alice = account();
    let txn = payment_from(alice.address());
    assert_eq!(txn.fee(), 0);
    let stxn = txn.sign(&alice);
    assert_eq!(to_base64(&stxn.to_canonical_bytes()), SIGNED_PAYMENT);
    assert_eq!(stxn.id(), SIGNED_PAYMENT_ID);
}

#[test]
fn signed_payment_decodes_to_same_value() {
    let alice = account();
    let expected = payment_from(alice.address()).sign(&alice);
    let decoded = SignedTransaction::from_base64(SIGNED_PAYMENT).unwrap();
    assert_eq!(decoded, expected);
    assert!(verify_envelope(&decoded.into()).is_ok());
}

#[test]
fn sign_bytes_matches_golden() {
    let sig = account().sign_bytes(b"hello");
    assert_eq!(to_base64(sig.as_bytes()), BYTES_SIGNATURE);
}

// ---------------------------------------------------------------------------
// Multisig
// ---------------------------------------------------------------------------

#[test]
fn multisig_address_matches_golden() {
    assert_eq!(
        multisig().address().to_string(),
        "RWJLJCMQAFZ2ATP2INM2GZTKNL6OULCCUBO5TQPXH3V2KR4AG7U5UA5JNM"
    );
}

#[test]
fn partial_multisig_matches_golden() {
    let msig = multisig();
    let mut mtxn = MultisigTransaction::new(payment_from(msig.address()), msig);
    mtxn.sign(&account()).unwrap();
    assert!(mtxn.auth_addr().is_zero());
    assert!(!mtxn.is_ready());
    assert_eq!(to_base64(&mtxn.to_canonical_bytes()), PARTIAL_MULTISIG);
    assert_eq!(mtxn.id(), PARTIAL_MULTISIG_ID);
}

#[test]
fn partial_multisig_reencodes_identically() {
    let bytes = from_base64(PARTIAL_MULTISIG).unwrap();
    let decoded = MultisigTransaction::from_canonical_bytes(&bytes).unwrap();
    assert_eq!(decoded.signature_count(), 1);
    assert!(decoded.multisig().slots()[2].is_some());
    assert_eq!(decoded.to_canonical_bytes(), bytes);
}

// ---------------------------------------------------------------------------
// Logic signatures and teal-sign
// ---------------------------------------------------------------------------

#[test]
fn program_address_matches_golden() {
    assert_eq!(program_address(&PROGRAM).unwrap().to_string(), PROGRAM_ADDRESS);
}

#[test]
fn delegated_logic_sig_matches_golden() {
    let alice = account();
    let mut lsig = LogicSigAccount::new(PROGRAM.to_vec(), vec![]).unwrap();
    lsig.sign(&alice).unwrap();
    let ltxn = LogicSigTransaction::new(payment_from(alice.address()), &lsig);
    assert_eq!(to_base64(&ltxn.to_canonical_bytes()), DELEGATED_LOGIC_SIG);

    let decoded = SignedEnvelope::from_base64(DELEGATED_LOGIC_SIG).unwrap();
    assert_eq!(decoded, SignedEnvelope::Logic(ltxn));
    assert!(verify_envelope(&decoded).is_ok());
}

#[test]
fn teal_sign_matches_golden() {
    let alice = account();
    let data = from_base64("AQIDBA==").unwrap();
    let program_addr: Address = PROGRAM_ADDRESS.parse().unwrap();

    let sig = teal_sign(&alice, &data, &program_addr);
    assert_eq!(to_base64(sig.as_bytes()), TEAL_SIGNATURE);
    assert_eq!(teal_sign_from_program(&alice, &data, &PROGRAM).unwrap(), sig);
    assert!(verify_teal(&alice.address(), &data, &program_addr, &sig));
}

#[test]
fn teal_sign_differs_from_transaction_signature() {
    let alice = account();
    let data = from_base64("AQIDBA==").unwrap();
    let program_addr: Address = PROGRAM_ADDRESS.parse().unwrap();
    let teal = teal_sign(&alice, &data, &program_addr);
    let mut as_txn = b"TX".to_vec();
    as_txn.extend_from_slice(&data);
    assert_ne!(teal, alice.sign_raw(&as_txn));
    assert_ne!(teal, alice.sign_bytes(&data));
}

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

#[test]
fn corrupted_address_never_decodes_to_wrong_key() {
    let good = MULTISIG_KEYS[2];
    for i in 0..good.len() {
        let mut chars: Vec<char> = good.chars().collect();
        chars[i] = if chars[i] == 'A' { 'B' } else { 'A' };
        let bad: String = chars.into_iter().collect();
        assert!(bad.parse::<Address>().is_err(), "accepted corruption at {}", i);
    }
}
