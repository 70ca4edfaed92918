//! Current chain height
//!
//! The store reads the height at view time to derive confirmation counts.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the current best block height
pub trait BlockHeightProvider: Send + Sync {
    fn current_block_height(&self) -> u64;
}

/// Chain tip updated by whoever follows the chain
#[derive(Debug, Default)]
pub struct ChainTip {
    height: AtomicU64,
}

impl ChainTip {
    pub fn new(height: u64) -> Self {
        Self {
            height: AtomicU64::new(height),
        }
    }

    pub fn set_height(&self, height: u64) {
        log::debug!("Chain tip moved to {}", height);
        self.height.store(height, Ordering::Release);
    }

    pub fn height(&self) -> u64 {
        self.height.load(Ordering::Acquire)
    }
}

impl BlockHeightProvider for ChainTip {
    fn current_block_height(&self) -> u64 {
        self.height()
    }
}

/// Confirmations of a transaction mined at `block_height`
///
/// Unconfirmed transactions, and blocks above the known tip, have 0.
pub fn confirmations(current_height: u64, block_height: Option<u64>) -> u64 {
    match block_height {
        Some(height) if current_height >= height => current_height - height + 1,
        _ => 0,
    }
}
