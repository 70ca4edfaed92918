//! Derived views over the ledger
//!
//! Pure reads computed on demand from the current partitions and chain
//! height. Nothing here mutates the store.

use serde::Serialize;
use serde_json::Value;

use crate::chain::confirmations;
use crate::store::LedgerStore;
use crate::types::{AddressRecord, Partition, TransactionRecord};

/// Returned by [`LedgerStore::amount_received_via_address`] for addresses the
/// wallet has never seen
pub const UNKNOWN_ADDRESS_AMOUNT: i64 = -1;

/// A transaction with its confirmation count at view time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedTransaction {
    #[serde(flatten)]
    pub transaction: TransactionRecord,
    pub confirmations: u64,
}

/// A wallet-owned address as presented to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAddressView {
    pub address: String,
    pub total: Value,
    /// Sorted by `first_seen_at`, oldest first
    pub transactions: Vec<ConfirmedTransaction>,
    pub has_transactions: bool,
    /// More than one publicly visible payment reached this address
    pub is_reused: bool,
    pub is_confirmed: bool,
    /// Highest confirmation count among the address's transactions
    pub confirmations: u64,
}

/// An outgoing transaction together with the address it paid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingTransaction {
    #[serde(flatten)]
    pub transaction: TransactionRecord,
    pub confirmations: u64,
    pub belongs_to_address: String,
}

impl LedgerStore {
    fn confirm(&self, transaction: &TransactionRecord, current_height: u64) -> ConfirmedTransaction {
        ConfirmedTransaction {
            transaction: transaction.clone(),
            confirmations: confirmations(current_height, transaction.block_height()),
        }
    }

    /// Every wallet-owned address with confirmation and reuse data attached
    pub fn wallet_addresses(&self) -> Vec<WalletAddressView> {
        let current_height = self.current_block_height();

        self.partition(Partition::Wallet)
            .values()
            .map(|record| {
                let mut transactions: Vec<_> = record
                    .transactions
                    .iter()
                    .map(|tx| self.confirm(tx, current_height))
                    .collect();
                // stable: equal timestamps keep delivery order
                transactions.sort_by_key(|tx| tx.transaction.first_seen_at);

                let confirmations = transactions
                    .iter()
                    .map(|tx| tx.confirmations)
                    .max()
                    .unwrap_or(0);

                let public_count = transactions
                    .iter()
                    .filter(|tx| tx.transaction.category.is_public())
                    .count();

                WalletAddressView {
                    address: record.address.clone(),
                    total: record.total.clone(),
                    has_transactions: !transactions.is_empty(),
                    transactions,
                    is_reused: public_count > 1,
                    is_confirmed: confirmations >= 1,
                    confirmations,
                }
            })
            .collect()
    }

    /// Stored balance for a wallet-owned address, `None` if never seen
    ///
    /// A known address whose total carries no balance reports 0.
    pub fn received_total(&self, address: &str) -> Option<i64> {
        self.partition(Partition::Wallet)
            .get(address)
            .map(|record| record.balance().unwrap_or(0))
    }

    /// Stored balance for a wallet-owned address, or
    /// [`UNKNOWN_ADDRESS_AMOUNT`] if the address was never seen
    pub fn amount_received_via_address(&self, address: &str) -> i64 {
        self.received_total(address)
            .unwrap_or(UNKNOWN_ADDRESS_AMOUNT)
    }

    pub fn third_party_addresses(&self) -> Vec<&AddressRecord> {
        self.partition(Partition::ThirdParty).values().collect()
    }

    pub fn has_already_sent_to_address(&self, address: &str) -> bool {
        self.partition(Partition::ThirdParty)
            .get(address)
            .map_or(false, |record| !record.transactions.is_empty())
    }

    /// First recorded payment to a third-party address
    ///
    /// "First" is list order, not time order.
    pub fn first_payment_to_address(&self, address: &str) -> Option<ConfirmedTransaction> {
        let record = self.partition(Partition::ThirdParty).get(address)?;
        let first = record.transactions.first()?;
        Some(self.confirm(first, self.current_block_height()))
    }

    /// All outgoing transactions, flattened across third-party addresses
    pub fn outgoing_transactions(&self) -> Vec<OutgoingTransaction> {
        let current_height = self.current_block_height();

        self.partition(Partition::ThirdParty)
            .iter()
            .flat_map(|(address, record)| {
                record.transactions.iter().map(move |tx| OutgoingTransaction {
                    transaction: tx.clone(),
                    confirmations: confirmations(current_height, tx.block_height()),
                    belongs_to_address: address.clone(),
                })
            })
            .collect()
    }

    pub fn outgoing_transaction_by_id(&self, id: &str) -> Option<OutgoingTransaction> {
        self.outgoing_transactions()
            .into_iter()
            .find(|tx| tx.transaction.id == id)
    }
}
