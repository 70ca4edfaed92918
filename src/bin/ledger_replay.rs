//! Replay a recorded event stream against the ledger
//!
//! Reads newline-delimited JSON from FILE (or stdin). Each line is either an
//! inbound event (`{"event": "addressSubscription", "payload": {...}}`), a
//! chain height update (`{"event": "chainHeight", "payload": {"height": 105}}`)
//! or a payment request to create through the gateway
//! (`{"event": "createPaymentRequest", "payload": {"label": .., "message": .., "amount": ..}}`).
//! Prints the derived views when the stream ends.

use anyhow::Context;
use serde::Deserialize;
use serde_json::json;
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::sync::Arc;
use wallet_ledger::{
    ChainTip, Dispatcher, HttpTransport, InboundEvent, LedgerConfig, LedgerStore, MintOutbox,
    PaymentRequestBook, PaymentRequestDraft, PaymentRequestGateway, Shared, SharedLedger,
};

#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
enum ReplayCommand {
    ChainHeight { height: u64 },
    CreatePaymentRequest(PaymentRequestDraft),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplayLine {
    Command(ReplayCommand),
    Event(InboundEvent),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = LedgerConfig::from_env();
    let chain = Arc::new(ChainTip::default());
    let mints = Arc::new(MintOutbox::default());

    let store = match config.state_path.as_deref() {
        Some(path) if path.exists() => {
            LedgerStore::load_from_disk(path, chain.clone(), mints.clone())
                .with_context(|| format!("Failed to load state from {}", path.display()))?
        }
        _ => LedgerStore::new(chain.clone(), mints.clone()),
    }
    .with_policy(config.missing_category_policy);

    let ledger: SharedLedger = Shared::new(store);
    let dispatcher = Dispatcher::new(ledger.clone(), Shared::new(PaymentRequestBook::default()));
    let gateway = PaymentRequestGateway::new(
        HttpTransport::new(&config.gateway_url),
        dispatcher.clone(),
    );

    let reader: Box<dyn BufRead> = match env::args().nth(1) {
        Some(path) => Box::new(BufReader::new(
            File::open(&path).with_context(|| format!("Failed to open {}", path))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    for (number, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read event stream")?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<ReplayLine>(&line) {
            Ok(ReplayLine::Event(event)) => dispatcher.dispatch(event),
            Ok(ReplayLine::Command(ReplayCommand::ChainHeight { height })) => {
                chain.set_height(height)
            }
            Ok(ReplayLine::Command(ReplayCommand::CreatePaymentRequest(draft))) => {
                if let Err(e) = gateway.create_payment_request(draft).await {
                    log::error!("Line {}: payment request failed: {}", number + 1, e);
                }
            }
            Err(e) => log::warn!("Skipping line {}: {}", number + 1, e),
        }
    }

    let store = ledger.read()?;
    let payment_requests = dispatcher.payment_requests().read()?;
    let report = json!({
        "chainHeight": chain.height(),
        "walletAddresses": store.wallet_addresses(),
        "thirdPartyAddresses": store.third_party_addresses(),
        "outgoingTransactions": store.outgoing_transactions(),
        "unseenTransactions": store.unseen_transaction_count(),
        "paymentRequests": payment_requests.all(),
        "mints": mints.drain(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(path) = config.state_path.as_deref() {
        store
            .save(path)
            .with_context(|| format!("Failed to save state to {}", path.display()))?;
        log::info!("Saved ledger state to {}", path.display());
    }

    Ok(())
}
