// Signing & verification benchmarks.
//
// Covers account generation, raw Ed25519 signing and verification,
// transaction signing, and multisig signing and merging at various sizes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use algosdk_core::crypto::{verify, Account};
use algosdk_core::identity::Address;
use algosdk_core::multisig::{MultisigAccount, MultisigTransaction};
use algosdk_core::transaction::{SuggestedParams, Transaction, TransactionBuilder, TransactionKind};

fn params() -> SuggestedParams {
    SuggestedParams {
        fee: 1000,
        first_valid: 1_000_000,
        last_valid: 1_001_000,
        genesis_hash: [0x42; 32],
        genesis_id: "mainnet-v1.0".into(),
        flat_fee: true,
    }
}

fn payment(sender: Address) -> Transaction {
    TransactionBuilder::new(sender, &params(), TransactionKind::payment(Address::new([7; 32]), 1_000_000))
        .note(b"bench".to_vec())
        .build()
        .unwrap()
}

fn bench_account_generation(c: &mut Criterion) {
    c.bench_function("ed25519/account_generate", |b| {
        b.iter(Account::generate);
    });
}

fn bench_sign_message(c: &mut Criterion) {
    let account = Account::generate();
    let message = b"pay 1000000 microalgos; round 1000000";

    c.bench_function("ed25519/sign_message", |b| {
        b.iter(|| account.sign_raw(message));
    });
}

fn bench_verify_signature(c: &mut Criterion) {
    let account = Account::generate();
    let message = b"pay 1000000 microalgos; round 1000000";
    let signature = account.sign_raw(message);
    let public_key = account.public_key();

    c.bench_function("ed25519/verify_signature", |b| {
        b.iter(|| verify(&public_key, message, &signature));
    });
}

fn bench_sign_transaction(c: &mut Criterion) {
    let account = Account::generate();
    let txn = payment(account.address());

    c.bench_function("txn/sign", |b| {
        b.iter(|| txn.clone().sign(&account));
    });
}

fn bench_multisig_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("multisig/sign_and_merge");

    for size in [2u8, 5, 10, 20] {
        let signers: Vec<Account> = (0..size).map(|_| Account::generate()).collect();
        let account =
            MultisigAccount::new(1, size, signers.iter().map(Account::address).collect()).unwrap();
        let txn = payment(account.address());

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &signers, |b, signers| {
            b.iter(|| {
                let copies: Vec<MultisigTransaction> = signers
                    .iter()
                    .map(|s| {
                        let mut m = MultisigTransaction::new(txn.clone(), account.clone());
                        m.sign(s).unwrap();
                        m
                    })
                    .collect();
                MultisigTransaction::merge(&copies).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_account_generation,
    bench_sign_message,
    bench_verify_signature,
    bench_sign_transaction,
    bench_multisig_merge,
);
criterion_main!(benches);
