//! Payment-request gateway
//!
//! Sends "create payment request" intents to the `payment-request`
//! collection and feeds the created request back as
//! [`InboundEvent::PaymentRequestAdded`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{EventSink, RequestGateway, Resource, ResourceRequest, Transport};
use crate::error::GatewayError;
use crate::events::InboundEvent;

/// Fields the user fills in for a new payment request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequestDraft {
    pub label: String,
    pub message: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentRequestIntent {
    Create(PaymentRequestDraft),
}

/// The `payment-request` collection
pub struct PaymentRequests;

impl Resource for PaymentRequests {
    const COLLECTION: &'static str = "payment-request";

    type Intent = PaymentRequestIntent;

    fn request(intent: Self::Intent) -> ResourceRequest {
        match intent {
            PaymentRequestIntent::Create(PaymentRequestDraft {
                label,
                message,
                amount,
            }) => ResourceRequest {
                payload: json!({
                    "label": label,
                    "amount": amount,
                    "message": message,
                }),
                follow_up: InboundEvent::PaymentRequestAdded,
            },
        }
    }
}

pub struct PaymentRequestGateway<T, S> {
    gateway: RequestGateway<T, S>,
}

impl<T: Transport, S: EventSink> PaymentRequestGateway<T, S> {
    pub fn new(transport: T, sink: S) -> Self {
        Self {
            gateway: RequestGateway::new(transport, sink),
        }
    }

    pub fn transport(&self) -> &T {
        self.gateway.transport()
    }

    /// Ask the remote service to create a payment request
    pub async fn create_payment_request(
        &self,
        draft: PaymentRequestDraft,
    ) -> Result<Value, GatewayError> {
        log::info!("Creating payment request '{}'", draft.label);
        self.gateway
            .handle::<PaymentRequests>(PaymentRequestIntent::Create(draft))
            .await
    }
}
