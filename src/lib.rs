//! Wallet Ledger: address and transaction reconciliation for wallet front-ends
//!
//! This crate keeps the per-address transaction history a wallet UI shows,
//! built from the raw subscription pushes of the wallet backend. Pushes may
//! arrive out of order or more than once; every transaction is upserted by
//! its composite id so the ledger converges regardless.
//!
//! # Architecture
//!
//! - **Ledger Store**: two address partitions (wallet-owned, third-party),
//!   snapshot ingest and derived views (confirmations, reuse, outgoing lookups)
//! - **Dispatcher**: the subscription boundary; routes inbound events and
//!   swallows handler failures
//! - **Request Gateways**: forward intents such as "create payment request" to
//!   a remote service and feed the response back as an inbound event
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wallet_ledger::{ChainTip, LedgerStore, MintOutbox};
//!
//! let chain = Arc::new(ChainTip::new(105));
//! let mut store = LedgerStore::new(chain, Arc::new(MintOutbox::default()));
//!
//! let payload = serde_json::json!({
//!     "addrA": {
//!         "txids": { "0": { "t1": { "category": "receive", "amount": 10, "firstSeenAt": 1000 } } },
//!         "total": { "balance": 10 }
//!     }
//! });
//! store.ingest_address_snapshot(payload.as_object().unwrap())?;
//!
//! for address in store.wallet_addresses() {
//!     println!("{} reused={}", address.address, address.is_reused);
//! }
//! ```

// Public modules
pub mod chain;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod gateway;
pub mod last_seen;
pub mod mint;
pub mod payment_request;
pub mod persistence;
pub mod shared;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod views;

// Re-exports for convenience
pub use chain::{confirmations, BlockHeightProvider, ChainTip};
pub use config::{LedgerConfig, MissingCategoryPolicy};
pub use dispatch::Dispatcher;
pub use error::{ConfigError, GatewayError, LedgerError};
pub use events::{InboundEvent, LedgerMutation};
pub use gateway::{
    EventSink, HttpTransport, PaymentRequestDraft, PaymentRequestGateway, RequestGateway,
    Resource, Transport,
};
pub use last_seen::LastSeen;
pub use mint::{MintLedger, MintOutbox, MintUpdate};
pub use payment_request::{PaymentRequest, PaymentRequestBook};
pub use shared::{Shared, SharedLedger, SharedPaymentRequests};
pub use snapshot::{normalize_subscription, RawTransaction};
pub use store::{IngestReport, LedgerStore};
pub use types::{AddressRecord, Block, Category, Partition, TransactionRecord, TxBasics};
pub use views::{ConfirmedTransaction, OutgoingTransaction, WalletAddressView, UNKNOWN_ADDRESS_AMOUNT};

// Common result type
pub type Result<T> = std::result::Result<T, LedgerError>;
