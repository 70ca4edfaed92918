//! Mint forwarding
//!
//! Mint transactions never land in an address partition. The store hands
//! them to a [`MintLedger`] instead.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

use crate::types::TxBasics;

/// A mint transaction forwarded by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintUpdate {
    #[serde(flatten)]
    pub tx: TxBasics,
    pub fee: Option<i64>,
    pub used: Option<bool>,
}

/// Receiver of mint updates
pub trait MintLedger: Send + Sync {
    fn update_mint(&self, update: MintUpdate);
}

/// Mint ledger that queues updates until they are drained
#[derive(Debug, Default)]
pub struct MintOutbox {
    updates: Mutex<Vec<MintUpdate>>,
}

impl MintOutbox {
    /// Take every queued update
    pub fn drain(&self) -> Vec<MintUpdate> {
        let mut updates = self.updates.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *updates)
    }

    pub fn len(&self) -> usize {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MintLedger for MintOutbox {
    fn update_mint(&self, update: MintUpdate) {
        log::debug!("Queued mint update {}", update.tx.id);
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(update);
    }
}
