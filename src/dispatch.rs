//! Subscription boundary
//!
//! Routes inbound events to the ledger store and the payment-request book.
//! Handler failures are logged and swallowed here: a malformed push must
//! never take the store down or block later events.

use serde::Deserialize;

use crate::error::LedgerError;
use crate::events::InboundEvent;
use crate::gateway::EventSink;
use crate::payment_request::PaymentRequest;
use crate::shared::{SharedLedger, SharedPaymentRequests};
use crate::snapshot::normalize_subscription;

#[derive(Clone)]
pub struct Dispatcher {
    ledger: SharedLedger,
    payment_requests: SharedPaymentRequests,
}

impl Dispatcher {
    pub fn new(ledger: SharedLedger, payment_requests: SharedPaymentRequests) -> Self {
        Self {
            ledger,
            payment_requests,
        }
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    pub fn payment_requests(&self) -> &SharedPaymentRequests {
        &self.payment_requests
    }

    /// Apply an event, logging instead of propagating any failure
    pub fn dispatch(&self, event: InboundEvent) {
        if let Err(e) = self.try_dispatch(&event) {
            log::error!("Failed to handle {} event: {}", event.name(), e);
            log::debug!("Offending event: {:?}", event);
        }
    }

    /// Apply an event, returning the handler's error
    pub fn try_dispatch(&self, event: &InboundEvent) -> Result<(), LedgerError> {
        match event {
            InboundEvent::AddressSubscription(payload)
            | InboundEvent::TransactionSubscription(payload) => {
                let addresses = normalize_subscription(payload)?;
                let report = self.ledger.write()?.ingest_address_snapshot(addresses)?;
                log::info!(
                    "{}: {} transactions upserted, {} mints forwarded",
                    event.name(),
                    report.upserted,
                    report.mints_forwarded
                );
            }
            InboundEvent::LabelUpdate { id, label } => {
                if self.ledger.write()?.record_label(id, label) {
                    log::info!("Labelled transaction {}", id);
                }
            }
            InboundEvent::MarkTransactionsSeen { at } => {
                let mut ledger = self.ledger.write()?;
                match at {
                    Some(at) => ledger.mark_transactions_seen(*at),
                    None => ledger.mark_transactions_seen_now(),
                };
            }
            InboundEvent::PaymentRequestAdded(response) => {
                let request = PaymentRequest::deserialize(response)?;
                self.payment_requests.write()?.upsert(request);
            }
        }
        Ok(())
    }
}

impl EventSink for Dispatcher {
    fn dispatch(&self, event: InboundEvent) {
        Dispatcher::dispatch(self, event)
    }
}
