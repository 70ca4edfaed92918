//! Ledger persistence
//!
//! **Explicit Persistence Model:**
//! - `save(path)` - Serialize both partitions and the last-seen marker to JSON
//! - `load_from_disk(path, ..)` - Restore them into a fresh store
//!
//! The chain height provider and mint ledger are runtime collaborators and
//! are supplied again on load. The mutation journal is not persisted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::chain::BlockHeightProvider;
use crate::error::LedgerError;
use crate::last_seen::LastSeen;
use crate::mint::MintLedger;
use crate::store::LedgerStore;
use crate::types::{AddressRecord, Partition};

/// On-disk form of the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LedgerState {
    wallet_addresses: BTreeMap<String, AddressRecord>,
    third_party_addresses: BTreeMap<String, AddressRecord>,
    last_seen: LastSeen,
}

impl LedgerStore {
    /// Save ledger state to disk (JSON format)
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LedgerError> {
        let state = LedgerState {
            wallet_addresses: self.partition(Partition::Wallet).clone(),
            third_party_addresses: self.partition(Partition::ThirdParty).clone(),
            last_seen: self.last_seen().clone(),
        };

        let json = serde_json::to_string_pretty(&state)?;
        std::fs::write(path.as_ref(), json)?;

        log::debug!("Saved ledger state to {}", path.as_ref().display());
        Ok(())
    }

    /// Load ledger state from disk (JSON format)
    ///
    /// # Arguments
    /// - `path`: File written by [`LedgerStore::save`]
    /// - `chain`: Chain height provider for the restored store
    /// - `mint_ledger`: Mint ledger for the restored store
    pub fn load_from_disk<P: AsRef<Path>>(
        path: P,
        chain: Arc<dyn BlockHeightProvider>,
        mint_ledger: Arc<dyn MintLedger>,
    ) -> Result<Self, LedgerError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let state: LedgerState = serde_json::from_str(&json)?;

        log::info!(
            "Loaded ledger state from {} ({} wallet, {} third-party addresses)",
            path.as_ref().display(),
            state.wallet_addresses.len(),
            state.third_party_addresses.len()
        );

        let mut store = LedgerStore::new(chain, mint_ledger);
        store.restore(
            state.wallet_addresses,
            state.third_party_addresses,
            state.last_seen,
        );
        Ok(store)
    }
}
