//! Core domain types for the SDEX market-making agent.
//!
//! This crate provides fundamental types used throughout the quoting system:
//! - `Price`, `Amount`: Precision-safe numeric types
//! - `Level`: One quoted price/amount pair
//! - `Trade`, `OrderAction`: Fill notifications
//! - `OrderConstraints`, `OrderBook`, `TradingPair`: Execution-side views

pub mod decimal;
pub mod error;
pub mod market;
pub mod order;
pub mod types;

pub use decimal::{Amount, Price};
pub use error::{CoreError, Result};
pub use market::{Asset, OrderConstraints, TradingPair};
pub use order::{OrderAction, Trade};
pub use types::{Balances, BookEntry, Level, OrderBook};
