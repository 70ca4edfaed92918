//! Payment requests created through the request gateway

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A payment request as returned by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Receiving address generated for the request
    pub address: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    /// Epoch milliseconds
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// Payment requests keyed by receiving address
#[derive(Debug, Clone, Default)]
pub struct PaymentRequestBook {
    requests: BTreeMap<String, PaymentRequest>,
}

impl PaymentRequestBook {
    /// Insert or replace the request for its address
    ///
    /// Returns `true` if an earlier request for the address was replaced.
    pub fn upsert(&mut self, request: PaymentRequest) -> bool {
        log::info!("Recording payment request for {}", request.address);
        self.requests
            .insert(request.address.clone(), request)
            .is_some()
    }

    pub fn get(&self, address: &str) -> Option<&PaymentRequest> {
        self.requests.get(address)
    }

    pub fn all(&self) -> Vec<&PaymentRequest> {
        self.requests.values().collect()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
