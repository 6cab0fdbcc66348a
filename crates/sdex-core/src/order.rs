//! Order action and fill types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Amount, Price};

/// Order action: buy or sell the base asset of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderAction {
    Buy,
    Sell,
}

impl OrderAction {
    /// Returns the opposite action.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Fill notification reported by the execution layer.
///
/// Always expressed in the orientation of the traded pair
/// (price is quote per unit of base, amount is in base).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub action: OrderAction,
    pub price: Price,
    pub amount: Amount,
}

impl Trade {
    pub fn new(action: OrderAction, price: Price, amount: Amount) -> Self {
        Self {
            action,
            price,
            amount,
        }
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @ {}", self.action, self.amount, self.price)
    }
}
