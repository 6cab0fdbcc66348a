//! Quote levels and order book snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Amount, OrderConstraints, Price};

/// One quoted order: a price and the amount to offer at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub price: Price,
    pub amount: Amount,
}

impl Level {
    pub fn new(price: Price, amount: Amount) -> Self {
        Self { price, amount }
    }

    /// Build a level rounded to the exchange precision.
    ///
    /// This is the only place where quote arithmetic loses precision.
    pub fn rounded(price: Price, amount: Amount, constraints: &OrderConstraints) -> Self {
        Self {
            price: price.round_to_precision(constraints.price_precision),
            amount: amount.round_to_precision(constraints.volume_precision),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.amount, self.price)
    }
}

/// A resting order in an order book snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    pub price: Price,
    pub amount: Amount,
}

/// Order book snapshot. Bids sorted best (highest) first, asks best (lowest) first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    #[serde(default)]
    pub bids: Vec<BookEntry>,
    #[serde(default)]
    pub asks: Vec<BookEntry>,
}

impl OrderBook {
    pub fn new(bids: Vec<BookEntry>, asks: Vec<BookEntry>) -> Self {
        Self { bids, asks }
    }

    pub fn top_bid(&self) -> Option<Price> {
        self.bids.first().map(|e| e.price)
    }

    pub fn top_ask(&self) -> Option<Price> {
        self.asks.first().map(|e| e.price)
    }

    /// Keep at most `depth` entries on each side.
    pub fn truncated(&self, depth: usize) -> Self {
        Self {
            bids: self.bids.iter().take(depth).cloned().collect(),
            asks: self.asks.iter().take(depth).cloned().collect(),
        }
    }
}

/// Account balances for the two assets of a pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    pub base: Amount,
    pub quote: Amount,
}

impl Balances {
    pub fn new(base: Amount, quote: Amount) -> Self {
        Self { base, quote }
    }

    /// Balances seen from the inverted pair.
    pub fn swapped(&self) -> Self {
        Self {
            base: self.quote,
            quote: self.base,
        }
    }
}
