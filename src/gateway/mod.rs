//! Outbound request gateways
//!
//! A gateway forwards a local intent to a remote resource collection and,
//! once the remote service accepts it, feeds the response back as an
//! [`InboundEvent`] so downstream stores consume it like subscription data.
//!
//! - [`Transport`] issues the remote `create` call ([`http::HttpTransport`])
//! - [`Resource`] declares a collection and maps intents to requests
//! - [`RequestGateway`] ties the two together with an [`EventSink`]
//!
//! No retry, no backoff: failures are returned to the caller.

pub mod http;
pub mod payment_request;

pub use http::HttpTransport;
pub use payment_request::{PaymentRequestDraft, PaymentRequestGateway, PaymentRequestIntent};

use serde_json::Value;
use std::future::Future;

use crate::error::GatewayError;
use crate::events::InboundEvent;

/// Remote call issued by a gateway
pub trait Transport: Send + Sync {
    /// Create a record in `collection`, returning the service's response
    fn create(
        &self,
        collection: &str,
        payload: Value,
    ) -> impl Future<Output = Result<Value, GatewayError>> + Send;
}

/// Receiver of follow-up events
pub trait EventSink: Send + Sync {
    fn dispatch(&self, event: InboundEvent);
}

/// A request ready to be sent for a resource
pub struct ResourceRequest {
    pub payload: Value,
    /// Builds the event dispatched with the service's response
    pub follow_up: fn(Value) -> InboundEvent,
}

/// A remote resource collection and the intents that target it
pub trait Resource {
    const COLLECTION: &'static str;

    type Intent;

    fn request(intent: Self::Intent) -> ResourceRequest;
}

/// Sends resource requests over a transport and dispatches follow-ups
pub struct RequestGateway<T, S> {
    transport: T,
    sink: S,
}

impl<T: Transport, S: EventSink> RequestGateway<T, S> {
    pub fn new(transport: T, sink: S) -> Self {
        Self { transport, sink }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Handle an intent for resource `R`
    ///
    /// On success the follow-up event is dispatched to the sink and the raw
    /// response is returned as well.
    pub async fn handle<R: Resource>(&self, intent: R::Intent) -> Result<Value, GatewayError> {
        let ResourceRequest { payload, follow_up } = R::request(intent);

        log::debug!("Creating record in {}", R::COLLECTION);
        let response = self
            .transport
            .create(R::COLLECTION, payload)
            .await
            .map_err(|e| {
                log::warn!("Create in {} failed: {}", R::COLLECTION, e);
                e
            })?;

        self.sink.dispatch(follow_up(response.clone()));
        Ok(response)
    }
}
