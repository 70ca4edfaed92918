//! Events crossing the store boundary
//!
//! [`InboundEvent`] is what subscriptions and gateways push in.
//! [`LedgerMutation`] is what the store journals for every state change.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Partition;

/// Event delivered to the dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum InboundEvent {
    /// Address update push; bare address map or `{ addresses: map }`
    AddressSubscription(Value),
    /// Transaction update push; same shape as address updates
    TransactionSubscription(Value),
    /// User assigned a label to an outgoing transaction
    LabelUpdate { id: String, label: String },
    /// User acknowledged transactions up to `at` (epoch ms), or up to now
    /// when `at` is absent
    MarkTransactionsSeen {
        #[serde(default)]
        at: Option<i64>,
    },
    /// Remote service created a payment request
    PaymentRequestAdded(Value),
}

impl InboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddressSubscription(_) => "addressSubscription",
            Self::TransactionSubscription(_) => "transactionSubscription",
            Self::LabelUpdate { .. } => "labelUpdate",
            Self::MarkTransactionsSeen { .. } => "markTransactionsSeen",
            Self::PaymentRequestAdded(_) => "paymentRequestAdded",
        }
    }
}

/// A state change applied by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LedgerMutation {
    AddressAdded {
        partition: Partition,
        address: String,
    },
    TransactionUpserted {
        partition: Partition,
        address: String,
        id: String,
        /// An earlier delivery with the same id was replaced
        replaced: bool,
    },
    LabelUpdated {
        address: String,
        id: String,
        label: String,
    },
    LastSeenAdvanced {
        namespace: String,
        at: i64,
    },
}
