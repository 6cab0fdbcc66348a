//! Shared fixtures.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use sdex_bot::{AppConfig, Application, PaperVenue};
use sdex_core::{Amount, BookEntry, OrderBook, Price};
use sdex_levels::{make_strategy, OrderBookSource};
use sdex_telemetry::Alert;

pub const STOP_LIMIT_CONFIG: &str = r#"
pair = "XLM/USD"
tick_interval_ms = 10

[strategy]
kind = "stop_limit"
AMOUNT_OF_A_BASE = 100
STOP_PRICE = 0.09
LIMIT_PRICE = 0.085

[venue]
balances = { base = 1000, quote = 0 }
bids = [{ price = 0.1, amount = 1000 }]
asks = [{ price = 0.11, amount = 1000 }]
"#;

pub const BUYSELL_CONFIG: &str = r#"
pair = "XLM/USD"
tick_interval_ms = 10

[strategy]
kind = "buysell"
PRICE_TOLERANCE = 0.001
AMOUNT_TOLERANCE = 0.001
AMOUNT_OF_A_BASE = 100
DATA_TYPE_A = "fixed"
DATA_FEED_A_URL = "0.1"
DATA_TYPE_B = "fixed"
DATA_FEED_B_URL = "1.0"
LEVELS = [{ SPREAD = 0.01, AMOUNT = 1 }]

[venue]
balances = { base = 1000, quote = 1000 }
bids = [{ price = 0.099, amount = 1000 }]
asks = [{ price = 0.102, amount = 1000 }]
"#;

pub fn book(top_bid: Decimal, top_ask: Decimal) -> OrderBook {
    OrderBook::new(
        vec![BookEntry {
            price: Price::new(top_bid),
            amount: Amount::new(Decimal::ONE_THOUSAND),
        }],
        vec![BookEntry {
            price: Price::new(top_ask),
            amount: Amount::new(Decimal::ONE_THOUSAND),
        }],
    )
}

pub fn paper_venue(config: &AppConfig) -> Arc<PaperVenue> {
    Arc::new(PaperVenue::new(
        config.venue.constraints(),
        (&config.venue.balances).into(),
        config.venue.order_book(),
    ))
}

/// Application over `venue` with the configured strategy.
pub fn application(config: &AppConfig, venue: Arc<PaperVenue>, alert: Arc<dyn Alert>) -> Application {
    let pair = config.trading_pair().unwrap();
    let source: Arc<dyn OrderBookSource> = venue.clone();
    let strategy = make_strategy(source, &pair, &config.strategy).unwrap();
    Application::with_parts(
        pair,
        strategy,
        venue,
        alert,
        Duration::from_millis(config.tick_interval_ms),
    )
}
