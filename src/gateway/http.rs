//! HTTP transport for request gateways

use serde_json::Value;

use super::Transport;
use crate::error::GatewayError;

/// Transport posting JSON to `{base_url}/{collection}`
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    async fn create(&self, collection: &str, payload: Value) -> Result<Value, GatewayError> {
        let url = format!("{}/{}", self.base_url, collection);

        let response = self.client.post(&url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                collection: collection.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(GatewayError::invalid_response(collection, "empty body"));
        }

        serde_json::from_str(&body)
            .map_err(|e| GatewayError::invalid_response(collection, e.to_string()))
    }
}
