//! Ledger store
//!
//! Holds the wallet-owned and third-party address partitions and merges
//! address snapshots into them. Every transaction is upserted by its
//! composite id, so redelivered and out-of-order snapshots converge to the
//! same state.
//!
//! Derived views live in [`crate::views`]; persistence in
//! [`crate::persistence`].

use serde_json::{Map, Value};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use crate::chain::BlockHeightProvider;
use crate::config::MissingCategoryPolicy;
use crate::error::LedgerError;
use crate::events::LedgerMutation;
use crate::last_seen::LastSeen;
use crate::mint::{MintLedger, MintUpdate};
use crate::snapshot::{ordered_output_keys, RawTransaction};
use crate::types::{AddressRecord, Category, Partition, TransactionRecord, UnknownCategory};

/// Mutations kept before the oldest are dropped
const JOURNAL_CAPACITY: usize = 1024;

/// Namespace of the composed last-seen marker
pub const TRANSACTION_NAMESPACE: &str = "transaction";

/// Outcome of one snapshot ingest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Transactions inserted or replaced in an address partition
    pub upserted: usize,
    /// Mint transactions forwarded to the mint ledger
    pub mints_forwarded: usize,
    /// Address entries without usable `txids`
    pub skipped_addresses: usize,
    /// Transactions skipped (unknown category, undecodable fields, ...)
    pub skipped_transactions: usize,
}

/// Address/transaction ledger for one wallet
pub struct LedgerStore {
    wallet_addresses: BTreeMap<String, AddressRecord>,
    third_party_addresses: BTreeMap<String, AddressRecord>,
    last_seen: LastSeen,
    policy: MissingCategoryPolicy,
    chain: Arc<dyn BlockHeightProvider>,
    mint_ledger: Arc<dyn MintLedger>,
    journal: VecDeque<LedgerMutation>,
}

impl LedgerStore {
    /// Create an empty store
    ///
    /// # Arguments
    ///
    /// * `chain` - Source of the current block height for confirmation counts
    /// * `mint_ledger` - Receiver of mint transactions
    pub fn new(chain: Arc<dyn BlockHeightProvider>, mint_ledger: Arc<dyn MintLedger>) -> Self {
        Self {
            wallet_addresses: BTreeMap::new(),
            third_party_addresses: BTreeMap::new(),
            last_seen: LastSeen::new(TRANSACTION_NAMESPACE),
            policy: MissingCategoryPolicy::default(),
            chain,
            mint_ledger,
            journal: VecDeque::new(),
        }
    }

    /// Set how transactions without a category are handled
    pub fn with_policy(mut self, policy: MissingCategoryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> MissingCategoryPolicy {
        self.policy
    }

    pub(crate) fn restore(
        &mut self,
        wallet_addresses: BTreeMap<String, AddressRecord>,
        third_party_addresses: BTreeMap<String, AddressRecord>,
        last_seen: LastSeen,
    ) {
        self.wallet_addresses = wallet_addresses;
        self.third_party_addresses = third_party_addresses;
        self.last_seen = last_seen;
    }

    pub(crate) fn current_block_height(&self) -> u64 {
        self.chain.current_block_height()
    }

    pub(crate) fn partition(&self, partition: Partition) -> &BTreeMap<String, AddressRecord> {
        match partition {
            Partition::Wallet => &self.wallet_addresses,
            Partition::ThirdParty => &self.third_party_addresses,
        }
    }

    fn partition_mut(&mut self, partition: Partition) -> &mut BTreeMap<String, AddressRecord> {
        match partition {
            Partition::Wallet => &mut self.wallet_addresses,
            Partition::ThirdParty => &mut self.third_party_addresses,
        }
    }

    /// Raw record of a wallet-owned or third-party address
    pub fn address(&self, partition: Partition, address: &str) -> Option<&AddressRecord> {
        self.partition(partition).get(address)
    }

    pub fn last_seen(&self) -> &LastSeen {
        &self.last_seen
    }

    // ------------------------------------------------------------------
    // Ingest
    // ------------------------------------------------------------------

    /// Merge an address snapshot into the ledger
    ///
    /// `addresses` maps address → `{ txids, total }`, where `txids` maps
    /// output index → txid → raw transaction. Addresses and txids are taken
    /// in wire order, output indexes in numeric order.
    ///
    /// Invalid address entries, unknown categories and undecodable
    /// transactions are skipped with a diagnostic. A transaction without a
    /// category is handled according to [`MissingCategoryPolicy`].
    pub fn ingest_address_snapshot(
        &mut self,
        addresses: &Map<String, Value>,
    ) -> Result<IngestReport, LedgerError> {
        let mut report = IngestReport::default();

        for (address, entry) in addresses {
            if entry.is_null() {
                continue;
            }

            let Some(txids) = entry.get("txids").and_then(Value::as_object) else {
                log::warn!("No txids found for address {}, skipping", address);
                report.skipped_addresses += 1;
                continue;
            };

            let total = entry.get("total").cloned().unwrap_or(Value::Null);

            for output_index in ordered_output_keys(txids.keys().map(String::as_str)) {
                let Some(by_txid) = txids.get(output_index).and_then(Value::as_object) else {
                    log::warn!(
                        "Output {} of address {} is not a txid map, skipping",
                        output_index,
                        address
                    );
                    report.skipped_transactions += 1;
                    continue;
                };

                for (txid, raw) in by_txid {
                    self.ingest_transaction(address, &total, txid, raw, &mut report)?;
                }
            }
        }

        log::debug!(
            "Ingested snapshot: {} upserted, {} mints, {} addresses skipped, {} transactions skipped",
            report.upserted,
            report.mints_forwarded,
            report.skipped_addresses,
            report.skipped_transactions
        );

        Ok(report)
    }

    fn ingest_transaction(
        &mut self,
        address: &str,
        total: &Value,
        txid: &str,
        raw: &Value,
        report: &mut IngestReport,
    ) -> Result<(), LedgerError> {
        let category = match raw.get("category") {
            None | Some(Value::Null) => return self.missing_category(address, txid, report),
            Some(Value::String(category)) if category.is_empty() => {
                return self.missing_category(address, txid, report)
            }
            Some(Value::String(category)) => category.parse::<Category>(),
            Some(other) => Err(UnknownCategory(other.to_string())),
        };

        let category = match category {
            Ok(category) => category,
            Err(e) => {
                log::warn!("Unhandled address category on {}: {}", txid, e);
                report.skipped_transactions += 1;
                return Ok(());
            }
        };

        let tx = match RawTransaction::decode(txid, raw) {
            Ok(tx) => tx,
            Err(e) => {
                log::warn!("Could not decode transaction {} on {}: {}", txid, address, e);
                report.skipped_transactions += 1;
                return Ok(());
            }
        };

        if let Some(reported) = tx.address.as_deref() {
            if reported != address {
                log::warn!(
                    "Transaction {} reports address {} but was filed under {}, using {}",
                    txid,
                    reported,
                    address,
                    address
                );
            }
        }

        match category {
            Category::Receive => self.add_receive_from_tx(address, total, &tx),
            Category::SpendIn => self.add_spend_in_from_tx(address, total, &tx),
            Category::Send => self.add_send_from_tx(address, total, &tx),
            Category::SpendOut => self.add_spend_out_from_tx(address, total, &tx),
            Category::Mined => self.add_mined_from_tx(address, total, &tx),
            Category::Mint => {
                self.add_mint_from_tx(&tx);
                report.mints_forwarded += 1;
                return Ok(());
            }
        }

        report.upserted += 1;
        Ok(())
    }

    fn missing_category(
        &self,
        address: &str,
        txid: &str,
        report: &mut IngestReport,
    ) -> Result<(), LedgerError> {
        match self.policy {
            MissingCategoryPolicy::AbortBatch => {
                log::warn!(
                    "Transaction {} on {} has no category, aborting snapshot",
                    txid,
                    address
                );
                Err(LedgerError::MissingCategory {
                    address: address.to_string(),
                    txid: txid.to_string(),
                })
            }
            MissingCategoryPolicy::SkipTransaction => {
                log::warn!(
                    "Transaction {} on {} has no category, skipping",
                    txid,
                    address
                );
                report.skipped_transactions += 1;
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------
    // Category handlers
    // ------------------------------------------------------------------

    fn add_receive_from_tx(&mut self, address: &str, total: &Value, tx: &RawTransaction) {
        self.ensure_address(Partition::Wallet, address, total);
        let record = TransactionRecord::from(tx.basics(Category::Receive));
        self.upsert_transaction(Partition::Wallet, address, record);
    }

    fn add_spend_in_from_tx(&mut self, address: &str, total: &Value, tx: &RawTransaction) {
        self.ensure_address(Partition::Wallet, address, total);
        let record = TransactionRecord {
            is_private: true,
            ..TransactionRecord::from(tx.basics(Category::SpendIn))
        };
        self.upsert_transaction(Partition::Wallet, address, record);
    }

    fn add_send_from_tx(&mut self, address: &str, total: &Value, tx: &RawTransaction) {
        self.ensure_address(Partition::ThirdParty, address, total);
        let record = TransactionRecord {
            fee: tx.fee,
            label: tx.label.clone(),
            ..TransactionRecord::from(tx.basics(Category::Send))
        };
        self.upsert_transaction(Partition::ThirdParty, address, record);
    }

    fn add_spend_out_from_tx(&mut self, address: &str, total: &Value, tx: &RawTransaction) {
        self.ensure_address(Partition::ThirdParty, address, total);
        let record = TransactionRecord {
            label: tx.label.clone(),
            is_private: true,
            ..TransactionRecord::from(tx.basics(Category::SpendOut))
        };
        self.upsert_transaction(Partition::ThirdParty, address, record);
    }

    fn add_mined_from_tx(&mut self, address: &str, total: &Value, tx: &RawTransaction) {
        self.ensure_address(Partition::Wallet, address, total);
        let record = TransactionRecord::from(tx.basics(Category::Mined));
        self.upsert_transaction(Partition::Wallet, address, record);
    }

    fn add_mint_from_tx(&mut self, tx: &RawTransaction) {
        let update = MintUpdate {
            tx: tx.basics(Category::Mint),
            fee: tx.fee,
            used: tx.used,
        };
        log::debug!("Forwarding mint {}", update.tx.id);
        self.mint_ledger.update_mint(update);
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Create the address on first sighting; later sightings never touch
    /// the stored total
    fn ensure_address(&mut self, partition: Partition, address: &str, total: &Value) {
        if self.partition(partition).contains_key(address) {
            return;
        }

        log::info!("Adding {:?} address {}", partition, address);
        self.partition_mut(partition).insert(
            address.to_string(),
            AddressRecord::new(address, total.clone()),
        );
        self.record(LedgerMutation::AddressAdded {
            partition,
            address: address.to_string(),
        });
    }

    /// Insert or replace a transaction by composite id
    ///
    /// A replacement moves to the end of the list. Redelivery of an
    /// identical record is a no-op.
    fn upsert_transaction(
        &mut self,
        partition: Partition,
        address: &str,
        transaction: TransactionRecord,
    ) {
        let Some(record) = self.partition_mut(partition).get_mut(address) else {
            log::error!("Address {} vanished before upsert of {}", address, transaction.id);
            return;
        };

        let existing = record
            .transactions
            .iter()
            .position(|tx| tx.id == transaction.id);

        if let Some(position) = existing {
            if record.transactions[position] == transaction {
                return;
            }
            record.transactions.remove(position);
        }

        let id = transaction.id.clone();
        record.transactions.push(transaction);

        self.record(LedgerMutation::TransactionUpserted {
            partition,
            address: address.to_string(),
            id,
            replaced: existing.is_some(),
        });
    }

    /// Set the label of an outgoing transaction
    ///
    /// The transaction is looked up by composite id among third-party
    /// transactions and only that record is changed. Returns `false` when
    /// the id is unknown or the label is already set to `label`.
    pub fn record_label(&mut self, id: &str, label: &str) -> bool {
        let found = self
            .third_party_addresses
            .values_mut()
            .find_map(|record| {
                let address = &record.address;
                record
                    .transactions
                    .iter_mut()
                    .find(|tx| tx.id == id)
                    .map(|tx| (address.clone(), tx))
            });

        let Some((address, tx)) = found else {
            log::debug!("No outgoing transaction {} to label", id);
            return false;
        };

        if tx.label.as_deref() == Some(label) {
            return false;
        }

        tx.label = Some(label.to_string());
        self.record(LedgerMutation::LabelUpdated {
            address,
            id: id.to_string(),
            label: label.to_string(),
        });
        true
    }

    /// Acknowledge every transaction first seen at or before `at`
    pub fn mark_transactions_seen(&mut self, at: i64) -> bool {
        let advanced = self.last_seen.mark_seen(at);
        self.record_last_seen(advanced)
    }

    /// Acknowledge every transaction first seen up to now
    pub fn mark_transactions_seen_now(&mut self) -> bool {
        let advanced = self.last_seen.mark_seen_now();
        self.record_last_seen(advanced)
    }

    fn record_last_seen(&mut self, advanced: bool) -> bool {
        let Some(at) = self.last_seen.last_seen().filter(|_| advanced) else {
            return false;
        };

        self.record(LedgerMutation::LastSeenAdvanced {
            namespace: self.last_seen.namespace().to_string(),
            at,
        });
        true
    }

    /// Transactions in either partition first seen after the last-seen marker
    pub fn unseen_transaction_count(&self) -> usize {
        self.wallet_addresses
            .values()
            .chain(self.third_party_addresses.values())
            .flat_map(|record| record.transactions.iter())
            .filter(|tx| self.last_seen.is_unseen(tx.first_seen_at))
            .count()
    }

    fn record(&mut self, mutation: LedgerMutation) {
        if self.journal.len() == JOURNAL_CAPACITY {
            self.journal.pop_front();
        }
        self.journal.push_back(mutation);
    }

    /// Drain the mutation journal
    pub fn take_mutations(&mut self) -> Vec<LedgerMutation> {
        self.journal.drain(..).collect()
    }
}
