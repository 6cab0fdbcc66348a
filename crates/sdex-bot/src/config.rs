//! Application configuration.

use crate::error::{AppError, AppResult};
use rust_decimal::Decimal;
use sdex_core::{Amount, Balances, BookEntry, OrderBook, OrderConstraints, TradingPair};
use sdex_levels::StrategyConfig;
use serde::{Deserialize, Serialize};

/// Starting balances of the paper account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalancesConfig {
    #[serde(default)]
    pub base: Decimal,
    #[serde(default)]
    pub quote: Decimal,
}

impl From<&BalancesConfig> for Balances {
    fn from(c: &BalancesConfig) -> Self {
        Balances::new(Amount::new(c.base), Amount::new(c.quote))
    }
}

/// Paper execution venue: constraints, balances and a static order book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueConfig {
    /// Decimal places of quoted prices. Default: 7.
    #[serde(default = "default_precision")]
    pub price_precision: u32,
    /// Decimal places of quoted amounts. Default: 7.
    #[serde(default = "default_precision")]
    pub volume_precision: u32,
    /// Smallest order the venue accepts, in base units. Default: 0.
    #[serde(default)]
    pub min_base_volume: Decimal,
    #[serde(default)]
    pub balances: BalancesConfig,
    /// Bids, best first.
    #[serde(default)]
    pub bids: Vec<BookEntry>,
    /// Asks, best first.
    #[serde(default)]
    pub asks: Vec<BookEntry>,
}

fn default_precision() -> u32 {
    7
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            price_precision: default_precision(),
            volume_precision: default_precision(),
            min_base_volume: Decimal::ZERO,
            balances: BalancesConfig::default(),
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }
}

impl VenueConfig {
    pub fn constraints(&self) -> OrderConstraints {
        let mut constraints = OrderConstraints::new(self.price_precision, self.volume_precision);
        constraints.min_base_volume = Amount::new(self.min_base_volume);
        constraints
    }

    pub fn order_book(&self) -> OrderBook {
        OrderBook::new(self.bids.clone(), self.asks.clone())
    }
}

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Traded pair as `BASE/QUOTE`.
    pub pair: String,
    /// Delay between trading cycles (ms). Default: 5,000.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub venue: VenueConfig,
}

fn default_tick_interval_ms() -> u64 {
    5_000
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    pub fn trading_pair(&self) -> AppResult<TradingPair> {
        Ok(TradingPair::parse(&self.pair)?)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.trading_pair()?;
        if self.tick_interval_ms == 0 {
            return Err(AppError::Config("tick_interval_ms must be positive".into()));
        }
        self.strategy.validate()?;
        Ok(())
    }
}
