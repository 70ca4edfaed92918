//! Derived View Tests
//!
//! Confirmation counts, address reuse, received amounts and the outgoing
//! transaction lookups, computed against a controllable chain tip.
//!
//! Run with: cargo test --test views_test

mod common;

use common::{single_tx_snapshot, TestLedger};
use serde_json::json;
use wallet_ledger::{LedgerMutation, Partition, UNKNOWN_ADDRESS_AMOUNT};

fn confirmed_receive(height: u64) -> serde_json::Value {
    json!({
        "category": "receive",
        "amount": 10,
        "firstSeenAt": 1000,
        "blockHeight": height,
        "blockHash": "00ff",
        "blockTime": 1
    })
}

// ============================================================================
// Test 1: Confirmations
// ============================================================================

#[test]
fn test_confirmations_follow_chain_tip() {
    let mut ledger = TestLedger::new(105);
    ledger.ingest(single_tx_snapshot("A", "t1", confirmed_receive(100), json!({})));

    let view = &ledger.store.wallet_addresses()[0];
    assert_eq!(view.transactions[0].confirmations, 6);
    assert_eq!(view.confirmations, 6);
    assert!(view.is_confirmed);

    ledger.chain.set_height(110);
    let view = &ledger.store.wallet_addresses()[0];
    assert_eq!(view.confirmations, 11, "Views should read the tip at call time");
}

#[test]
fn test_unconfirmed_and_future_blocks_report_zero() {
    let mut ledger = TestLedger::new(50);
    ledger.ingest(single_tx_snapshot("A", "t1", confirmed_receive(100), json!({})));
    ledger.ingest(single_tx_snapshot(
        "B",
        "t2",
        json!({ "category": "receive", "amount": 1, "firstSeenAt": 1 }),
        json!({}),
    ));

    for view in ledger.store.wallet_addresses() {
        assert_eq!(view.confirmations, 0, "Address {} should be unconfirmed", view.address);
        assert!(!view.is_confirmed);
    }
}

#[test]
fn test_address_confirmations_are_the_maximum() {
    let mut ledger = TestLedger::new(200);
    ledger.ingest(json!({
        "A": {
            "txids": { "0": {
                "old": {
                    "category": "receive", "amount": 1, "firstSeenAt": 1,
                    "blockHeight": 101, "blockHash": "aa", "blockTime": 1
                },
                "new": { "category": "receive", "amount": 1, "firstSeenAt": 2 }
            } },
            "total": {}
        }
    }));

    let view = &ledger.store.wallet_addresses()[0];
    assert_eq!(view.confirmations, 100);
}

// ============================================================================
// Test 2: Address reuse
// ============================================================================

#[test]
fn test_two_public_receives_mark_reuse() {
    let mut ledger = TestLedger::new(0);
    ledger.ingest(json!({
        "A": {
            "txids": { "0": {
                "t1": { "category": "receive", "amount": 1, "firstSeenAt": 1 },
                "t2": { "category": "receive", "amount": 2, "firstSeenAt": 2 }
            } },
            "total": {}
        }
    }));

    assert!(ledger.store.wallet_addresses()[0].is_reused);
}

#[test]
fn test_private_transactions_do_not_mark_reuse() {
    let mut ledger = TestLedger::new(0);
    ledger.ingest(json!({
        "A": {
            "txids": { "0": {
                "t1": { "category": "receive", "amount": 1, "firstSeenAt": 1 },
                "t2": { "category": "spendIn", "amount": 2, "firstSeenAt": 2 },
                "t3": { "category": "mined", "amount": 3, "firstSeenAt": 3 }
            } },
            "total": {}
        }
    }));

    let view = &ledger.store.wallet_addresses()[0];
    assert_eq!(view.transactions.len(), 3);
    assert!(!view.is_reused);
}

// ============================================================================
// Test 3: Ordering
// ============================================================================

#[test]
fn test_wallet_transactions_sorted_by_first_seen() {
    let mut ledger = TestLedger::new(0);
    ledger.ingest(json!({
        "A": {
            "txids": { "0": {
                "a": { "category": "receive", "amount": 1, "firstSeenAt": 300 },
                "b": { "category": "receive", "amount": 1, "firstSeenAt": 100 },
                "c": { "category": "receive", "amount": 1, "firstSeenAt": 200 }
            } },
            "total": {}
        }
    }));

    let view = &ledger.store.wallet_addresses()[0];
    let order: Vec<_> = view
        .transactions
        .iter()
        .map(|tx| tx.transaction.txid.as_str())
        .collect();
    assert_eq!(order, vec!["b", "c", "a"]);

    // stored order is untouched
    let stored = ledger.store.address(Partition::Wallet, "A").unwrap();
    assert_eq!(stored.transactions[0].txid, "a");
}

// ============================================================================
// Test 4: Received amounts
// ============================================================================

#[test]
fn test_amount_received_via_address() {
    let mut ledger = TestLedger::new(0);
    ledger.ingest(single_tx_snapshot(
        "A",
        "t1",
        json!({ "category": "receive", "amount": 7, "firstSeenAt": 1 }),
        json!({ "balance": 7 }),
    ));
    ledger.ingest(single_tx_snapshot(
        "B",
        "t2",
        json!({ "category": "receive", "amount": 3, "firstSeenAt": 1 }),
        json!({}),
    ));

    assert_eq!(ledger.store.amount_received_via_address("A"), 7);
    assert_eq!(ledger.store.amount_received_via_address("B"), 0);
    assert_eq!(
        ledger.store.amount_received_via_address("nowhere"),
        UNKNOWN_ADDRESS_AMOUNT
    );
    assert_eq!(ledger.store.received_total("nowhere"), None);
}

// ============================================================================
// Test 5: Outgoing lookups
// ============================================================================

#[test]
fn test_outgoing_views() {
    let mut ledger = TestLedger::new(105);
    ledger.ingest(json!({
        "payee": {
            "txids": { "0": {
                "p1": {
                    "category": "send", "amount": 4, "fee": 1, "firstSeenAt": 10,
                    "blockHeight": 100, "blockHash": "aa", "blockTime": 1
                },
                "p2": { "category": "send", "amount": 5, "firstSeenAt": 20 }
            } },
            "total": {}
        }
    }));

    assert!(ledger.store.has_already_sent_to_address("payee"));
    assert!(!ledger.store.has_already_sent_to_address("stranger"));

    let first = ledger
        .store
        .first_payment_to_address("payee")
        .expect("Should have a first payment");
    assert_eq!(first.transaction.txid, "p1");
    assert_eq!(first.confirmations, 6);
    assert!(ledger.store.first_payment_to_address("stranger").is_none());

    let outgoing = ledger.store.outgoing_transactions();
    assert_eq!(outgoing.len(), 2);
    assert!(outgoing.iter().all(|tx| tx.belongs_to_address == "payee"));

    let found = ledger
        .store
        .outgoing_transaction_by_id("p2-0")
        .expect("Should find p2 by id");
    assert_eq!(found.transaction.amount, 5);
    assert_eq!(found.confirmations, 0);
    assert!(ledger.store.outgoing_transaction_by_id("p2").is_none());

    assert_eq!(ledger.store.third_party_addresses().len(), 1);
}

// ============================================================================
// Test 6: Labels
// ============================================================================

#[test]
fn test_label_update_changes_exactly_one_record() {
    let mut ledger = TestLedger::new(0);
    ledger.ingest(json!({
        "payee": {
            "txids": {
                "0": { "p1": { "category": "send", "amount": 4, "txIndex": 0, "firstSeenAt": 10 } },
                "1": { "p1": { "category": "send", "amount": 6, "txIndex": 1, "firstSeenAt": 10 } }
            },
            "total": {}
        }
    }));
    ledger.store.take_mutations();

    assert!(ledger.store.record_label("p1-1", "rent"));
    assert!(
        !ledger.store.record_label("p1-1", "rent"),
        "Same label twice should be a no-op"
    );
    assert!(!ledger.store.record_label("missing-0", "rent"));

    let mutations = ledger.store.take_mutations();
    assert_eq!(
        mutations,
        vec![LedgerMutation::LabelUpdated {
            address: "payee".to_string(),
            id: "p1-1".to_string(),
            label: "rent".to_string(),
        }]
    );

    let labelled = ledger.store.outgoing_transaction_by_id("p1-1").unwrap();
    let untouched = ledger.store.outgoing_transaction_by_id("p1-0").unwrap();
    assert_eq!(labelled.transaction.label.as_deref(), Some("rent"));
    assert_eq!(untouched.transaction.label, None);
}

// ============================================================================
// Test 7: Last seen
// ============================================================================

#[test]
fn test_unseen_count_follows_marker() {
    let mut ledger = TestLedger::new(0);
    ledger.ingest(json!({
        "A": {
            "txids": { "0": {
                "t1": { "category": "receive", "amount": 1, "firstSeenAt": 100 },
                "t2": { "category": "receive", "amount": 1, "firstSeenAt": 200 }
            } },
            "total": {}
        },
        "payee": {
            "txids": { "0": { "p1": { "category": "send", "amount": 1, "firstSeenAt": 300 } } },
            "total": {}
        }
    }));

    assert_eq!(ledger.store.unseen_transaction_count(), 3);

    assert!(ledger.store.mark_transactions_seen(200));
    assert_eq!(ledger.store.unseen_transaction_count(), 1);

    assert!(
        !ledger.store.mark_transactions_seen(150),
        "Marker should never move backwards"
    );
    assert_eq!(ledger.store.last_seen().last_seen(), Some(200));
}
