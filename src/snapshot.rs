//! Raw subscription payloads
//!
//! The wallet backend pushes address snapshots shaped as
//! `{ address: { txids: { outputIndex: { txid: rawTx } }, total } }`,
//! optionally wrapped in `{ addresses: ... }`. This module normalizes the
//! payload and decodes single raw transactions.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::LedgerError;
use crate::types::{transaction_id, Block, Category, TxBasics};

/// Unwrap a subscription payload into its address map
///
/// Both `{ addresses: { ... } }` and a bare address map are accepted.
pub fn normalize_subscription(payload: &Value) -> Result<&Map<String, Value>, LedgerError> {
    let addresses = match payload.get("addresses") {
        Some(inner) if !inner.is_null() => inner,
        _ => payload,
    };

    addresses.as_object().ok_or_else(|| {
        LedgerError::InvalidPayload(format!(
            "expected an address map, got {}",
            value_kind(addresses)
        ))
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Output-index keys in delivery order
///
/// Integer keys come first in ascending numeric order, the rest keep their
/// wire order.
pub fn ordered_output_keys<'a, I>(keys: I) -> impl Iterator<Item = &'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut keys: Vec<_> = keys
        .into_iter()
        .map(|key| {
            let index = key.parse::<u32>().ok().filter(|index| index.to_string() == key);
            (index, key)
        })
        .collect();
    // stable: non-integer keys stay in wire order
    keys.sort_by_key(|(index, _)| index.map_or((1, 0), |index| (0, index)));
    keys.into_iter().map(|(_, key)| key)
}

/// A transaction as reported by the wallet backend
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    /// Falls back to the key the transaction was filed under
    #[serde(default)]
    pub txid: Option<String>,
    #[serde(default)]
    pub tx_index: Option<u32>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub fee: Option<i64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub block_height: Option<u64>,
    #[serde(default)]
    pub block_hash: Option<String>,
    /// Block time in epoch seconds
    #[serde(default)]
    pub block_time: Option<i64>,
    /// Epoch milliseconds
    #[serde(default)]
    pub first_seen_at: Option<i64>,
    /// Mint only
    #[serde(default)]
    pub used: Option<bool>,
}

impl RawTransaction {
    /// Decode a raw transaction filed under `txid_key`
    pub fn decode(txid_key: &str, raw: &Value) -> Result<Self, LedgerError> {
        let mut tx = Self::deserialize(raw)?;
        if tx.txid.as_deref().map_or(true, str::is_empty) {
            tx.txid = Some(txid_key.to_string());
        }
        if let Some(seconds) = tx.block_time {
            if seconds.checked_mul(1000).is_none() {
                return Err(LedgerError::InvalidPayload(format!(
                    "block time {} out of range",
                    seconds
                )));
            }
        }
        Ok(tx)
    }

    /// Block the transaction was confirmed in, if the backend knows it
    pub fn block(&self) -> Option<Block> {
        match (self.block_height, self.block_hash.as_deref()) {
            (Some(height), Some(hash)) if height > 0 && !hash.is_empty() => Some(Block {
                height,
                hash: hash.to_string(),
                time: self.block_time.unwrap_or(0).saturating_mul(1000),
            }),
            _ => None,
        }
    }

    /// Extract the fields every category shares
    ///
    /// When the block is already known (initial sync), `first_seen_at` is
    /// pulled back to the block time if that is earlier.
    pub fn basics(&self, category: Category) -> TxBasics {
        let block = self.block();
        let first_seen_at = match (&block, self.first_seen_at) {
            (Some(block), Some(seen)) => seen.min(block.time),
            (Some(block), None) => block.time,
            (None, Some(seen)) => seen,
            (None, None) => 0,
        };

        let txid = self.txid.clone().unwrap_or_default();
        let index = self.tx_index.unwrap_or(0);

        TxBasics {
            id: transaction_id(&txid, index),
            txid,
            index,
            category,
            amount: self.amount.unwrap_or(0),
            first_seen_at,
            block,
            is_private: false,
        }
    }
}
