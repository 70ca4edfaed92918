//! Shared fixtures for ledger integration tests

#![allow(dead_code)]

use serde_json::{json, Map, Value};
use std::sync::Arc;
use wallet_ledger::{ChainTip, LedgerStore, MintOutbox, MissingCategoryPolicy};

/// Store wired to a chain tip and mint outbox the test can inspect
pub struct TestLedger {
    pub store: LedgerStore,
    pub chain: Arc<ChainTip>,
    pub mints: Arc<MintOutbox>,
}

impl TestLedger {
    pub fn new(height: u64) -> Self {
        let chain = Arc::new(ChainTip::new(height));
        let mints = Arc::new(MintOutbox::default());
        let store = LedgerStore::new(chain.clone(), mints.clone());
        Self {
            store,
            chain,
            mints,
        }
    }

    pub fn with_policy(height: u64, policy: MissingCategoryPolicy) -> Self {
        let ledger = Self::new(height);
        Self {
            store: ledger.store.with_policy(policy),
            ..ledger
        }
    }

    pub fn ingest(&mut self, payload: Value) -> wallet_ledger::IngestReport {
        self.store
            .ingest_address_snapshot(&as_map(payload))
            .expect("Ingest should succeed")
    }
}

pub fn as_map(payload: Value) -> Map<String, Value> {
    match payload {
        Value::Object(map) => map,
        other => panic!("Expected an object payload, got {}", other),
    }
}

/// Snapshot with a single transaction on a single address
pub fn single_tx_snapshot(address: &str, txid: &str, tx: Value, total: Value) -> Value {
    json!({
        address: {
            "txids": { "0": { txid: tx } },
            "total": total,
        }
    })
}
