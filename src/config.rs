//! Ledger configuration from environment variables
//!
//! Controls the gateway endpoint, how ingest treats transactions without a
//! category, and where the replay tool keeps its state.

use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;

/// What ingest does with a transaction that carries no category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingCategoryPolicy {
    /// Stop the whole batch and report the offending transaction.
    /// Mutations applied earlier in the batch are kept.
    #[default]
    AbortBatch,
    /// Skip the transaction and keep going
    SkipTransaction,
}

#[derive(Clone, Debug)]
pub struct LedgerConfig {
    /// Base URL of the request gateway service
    pub gateway_url: String,
    pub missing_category_policy: MissingCategoryPolicy,
    /// Optional file the ledger state is loaded from and saved to
    pub state_path: Option<PathBuf>,
}

impl LedgerConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `GATEWAY_URL`: request gateway endpoint (default `http://localhost:8080`)
    /// - `MISSING_CATEGORY_POLICY`: "abort" (default) or "skip"
    /// - `LEDGER_STATE_PATH`: state file (optional)
    pub fn from_env() -> Self {
        let gateway_url = env::var("GATEWAY_URL").unwrap_or_else(|_| {
            log::info!("Gateway URL: http://localhost:8080 (default)");
            "http://localhost:8080".to_string()
        });

        let missing_category_policy = match env::var("MISSING_CATEGORY_POLICY") {
            Ok(value) => Self::policy_from_str(&value).unwrap_or_else(|e| {
                log::warn!("{}, defaulting to abort", e);
                MissingCategoryPolicy::default()
            }),
            Err(_) => MissingCategoryPolicy::default(),
        };

        let state_path = env::var("LEDGER_STATE_PATH").ok().map(PathBuf::from);
        if let Some(ref path) = state_path {
            log::info!("Ledger state file: {}", path.display());
        }

        Self {
            gateway_url,
            missing_category_policy,
            state_path,
        }
    }

    /// Parse a `MISSING_CATEGORY_POLICY` value
    pub fn policy_from_str(value: &str) -> Result<MissingCategoryPolicy, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "abort" | "" => Ok(MissingCategoryPolicy::AbortBatch),
            "skip" => Ok(MissingCategoryPolicy::SkipTransaction),
            other => Err(ConfigError::InvalidValue {
                key: "MISSING_CATEGORY_POLICY".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            gateway_url: "http://localhost:8080".to_string(),
            missing_category_policy: MissingCategoryPolicy::AbortBatch,
            state_path: None,
        }
    }
}
