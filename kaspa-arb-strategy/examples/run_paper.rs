//! Paper trading runner for the Kaspa cross-exchange arbitrage strategy.
//!
//! Wires together:
//! - Six in-memory exchanges whose KAS-USDT quotes follow a random walk
//! - The paper execution engine, settling attempts against live quotes
//! - The arbitrage strategy, ticked once per second
//!
//! Usage:
//!   # Optional, omitted keys keep their defaults
//!   KASPA_ARB_CONFIG=./kaspa-arb-strategy/config.example.toml
//!   RUST_LOG=kaspa_arb_strategy=debug
//!
//!   cargo run -p kaspa-arb-strategy --example run_paper

use chrono::Utc;
use kaspa_arb_execution::{ConnectorRef, mock::MockConnector, paper::PaperExecutionEngine};
use kaspa_arb_strategy::{ArbitrageConfig, KaspaArbitrageStrategy, logging::init_logging};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::{error::Error, sync::Arc, time::Duration};
use tracing::info;

const EXCHANGES: [&str; 6] = ["kucoin", "kraken", "bybit", "mexc", "gate_io", "bitget"];
const STATUS_EVERY_TICKS: u64 = 30;
const FEED_INTERVAL: Duration = Duration::from_millis(250);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = dotenvy::dotenv();
    init_logging()?;

    let config = match std::env::var("KASPA_ARB_CONFIG") {
        Ok(path) => {
            info!(%path, "Loading configuration");
            ArbitrageConfig::load(path)?
        }
        Err(_) => ArbitrageConfig::default(),
    };

    let exchanges = EXCHANGES
        .map(|name| {
            Arc::new(
                MockConnector::new(name)
                    .with_quote(dec!(0.1199), dec!(0.1201))
                    .with_balance(config.trading_pair.quote.clone(), dec!(10000))
                    .with_balance(config.trading_pair.base.clone(), dec!(50000)),
            )
        })
        .to_vec();

    tokio::spawn(run_price_feed(exchanges.clone()));

    let connectors = exchanges
        .iter()
        .map(|exchange| -> ConnectorRef { exchange.clone() })
        .collect();
    let mut strategy =
        KaspaArbitrageStrategy::new(config, connectors, PaperExecutionEngine::default());
    info!("{}", strategy.format_status());

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut ticks = 0u64;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                strategy.on_tick(Utc::now());
                ticks += 1;
                if ticks % STATUS_EVERY_TICKS == 0 {
                    info!("{}", strategy.format_status());
                }
            }
            _ = &mut shutdown => {
                info!("Shutting down...");
                break;
            }
        }
    }

    info!("{}", strategy.format_status());
    Ok(())
}

/// Random walk of a shared mid price, with independent per-exchange noise wide
/// enough to open the occasional cross-exchange spread.
async fn run_price_feed(exchanges: Vec<Arc<MockConnector>>) {
    let mut mid = dec!(0.12);
    let mut interval = tokio::time::interval(FEED_INTERVAL);

    loop {
        interval.tick().await;
        mid = step_prices(mid, &exchanges);
    }
}

fn step_prices(mid: Decimal, exchanges: &[Arc<MockConnector>]) -> Decimal {
    let mut rng = rand::rng();

    let drift = Decimal::from(rng.random_range(-20i64..=20)) / dec!(10000);
    let mid = (mid * (Decimal::ONE + drift)).max(dec!(0.01));

    for exchange in exchanges {
        let noise = Decimal::from(rng.random_range(-80i64..=80)) / dec!(10000);
        let half_spread = Decimal::from(rng.random_range(3i64..=10)) / dec!(10000);
        let local_mid = mid * (Decimal::ONE + noise);

        exchange.set_quote(
            (local_mid * (Decimal::ONE - half_spread)).round_dp(6),
            (local_mid * (Decimal::ONE + half_spread)).round_dp(6),
        );
    }

    mid
}
