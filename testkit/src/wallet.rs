//! In-memory custodial wallet.
//!
//! Holds one master derivation key and hands out accounts derived from it
//! at increasing indices. Signing goes through the same core routines a
//! local signer uses, so envelopes from here are byte-identical to locally
//! signed ones.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, info};

use algosdk_core::client::{ClientError, ClientResult, KeyCustodian};
use algosdk_core::config::ClientConfig;
use algosdk_core::crypto::Account;
use algosdk_core::identity::{Address, MasterDerivationKey};
use algosdk_core::multisig::MultisigTransaction;
use algosdk_core::transaction::{SignedTransaction, Transaction};

#[derive(Debug, Default)]
struct Keys {
    next_index: u64,
    by_address: BTreeMap<Address, u64>,
}

#[derive(Debug)]
pub struct InMemoryKeystore {
    config: ClientConfig,
    mdk: MasterDerivationKey,
    keys: Mutex<Keys>,
}

impl InMemoryKeystore {
    pub fn new(config: ClientConfig, mdk: MasterDerivationKey) -> Self {
        info!(address = %config.address, "keystore opened");
        Self {
            config,
            mdk,
            keys: Mutex::new(Keys::default()),
        }
    }

    /// Keystore over a freshly generated master key.
    pub fn generate(config: ClientConfig) -> Self {
        Self::new(config, MasterDerivationKey::generate())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn account_for(&self, address: &Address) -> ClientResult<Account> {
        let index = self
            .keys
            .lock()
            .by_address
            .get(address)
            .copied()
            .ok_or(ClientError::UnknownKey(*address))?;
        Ok(self.mdk.derive_account(index))
    }
}

#[async_trait]
impl KeyCustodian for InMemoryKeystore {
    async fn generate_key(&self) -> ClientResult<Address> {
        let mut keys = self.keys.lock();
        let index = keys.next_index;
        let address = self.mdk.derive_account(index).address();
        keys.next_index += 1;
        keys.by_address.insert(address, index);
        debug!(%address, index, "derived key");
        Ok(address)
    }

    async fn list_keys(&self) -> ClientResult<Vec<Address>> {
        Ok(self.keys.lock().by_address.keys().copied().collect())
    }

    async fn export_key(&self, address: &Address) -> ClientResult<Account> {
        self.account_for(address)
    }

    async fn sign_transaction(
        &self,
        txn: Transaction,
        signer: Option<Address>,
    ) -> ClientResult<SignedTransaction> {
        let signer = signer.unwrap_or_else(|| txn.sender());
        let account = self.account_for(&signer)?;
        Ok(txn.sign(&account))
    }

    async fn sign_multisig_transaction(
        &self,
        mut mtxn: MultisigTransaction,
        signer: &Address,
    ) -> ClientResult<MultisigTransaction> {
        let account = self.account_for(signer)?;
        mtxn.sign(&account)
            .map_err(|e| ClientError::Rejected(e.to_string()))?;
        Ok(mtxn)
    }

    async fn export_master_derivation_key(&self) -> ClientResult<MasterDerivationKey> {
        Ok(self.mdk.clone())
    }
}
