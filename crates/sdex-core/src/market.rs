//! Asset identity and exchange order constraints.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};
use crate::Amount;

/// Asset code on the exchange (e.g. `XLM`, `USD:GA5Z...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Asset(String);

impl Asset {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Asset {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Base/quote pair. Prices are quote per unit of base.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingPair {
    pub base: Asset,
    pub quote: Asset,
}

impl TradingPair {
    pub fn new(base: Asset, quote: Asset) -> Self {
        Self { base, quote }
    }

    /// The same pair seen from the other asset (`quote/base`).
    pub fn inverted(&self) -> Self {
        Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
        }
    }

    /// Parse `BASE/QUOTE`.
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((base, quote)) if !base.is_empty() && !quote.is_empty() => {
                Ok(Self::new(Asset::new(base), Asset::new(quote)))
            }
            _ => Err(CoreError::InvalidPair(s.to_string())),
        }
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Exchange-imposed precision and sizing rules for a pair.
///
/// Supplied by the execution layer; read-only for level providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConstraints {
    /// Fractional digits allowed in a price.
    pub price_precision: u32,
    /// Fractional digits allowed in an amount.
    pub volume_precision: u32,
    /// Smallest order the exchange accepts, in base units.
    #[serde(default)]
    pub min_base_volume: Amount,
    /// Largest order the exchange accepts, if capped.
    #[serde(default)]
    pub max_base_volume: Option<Amount>,
}

impl OrderConstraints {
    pub fn new(price_precision: u32, volume_precision: u32) -> Self {
        Self {
            price_precision,
            volume_precision,
            min_base_volume: Amount::ZERO,
            max_base_volume: None,
        }
    }

    /// Whether an order of `base_amount` is within the volume limits.
    pub fn accepts(&self, base_amount: Amount) -> bool {
        base_amount >= self.min_base_volume
            && self.max_base_volume.map_or(true, |max| base_amount <= max)
    }
}

impl Default for OrderConstraints {
    fn default() -> Self {
        // SDEX native precision
        Self::new(7, 7)
    }
}
