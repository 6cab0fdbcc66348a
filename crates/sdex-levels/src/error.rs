//! Level provider and strategy error types.

use thiserror::Error;

use sdex_core::{Amount, OrderAction, Price};
use sdex_feed::FeedError;

/// Errors from the execution collaborator.
#[derive(Debug, Clone, Error)]
pub enum ExecutionError {
    #[error("Order book unavailable: {0}")]
    OrderBook(String),

    #[error("Order placement failed: {0}")]
    Placement(String),
}

pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Errors raised while producing levels or handling fills.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Center price could not be loaded: {0}")]
    Feed(#[from] FeedError),

    #[error("Invalid center price: {0}")]
    InvalidCenterPrice(Price),

    #[error("Level arithmetic overflows at center price {0}")]
    Overflow(Price),

    #[error("Account balance {available} is less than the order amount {required}")]
    InsufficientBalance { required: Amount, available: Amount },

    #[error("Unable to get top bid: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Order book for {0} has no bids")]
    NoTopBid(String),

    #[error("Fill handling failed: {0}")]
    Fill(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors raised while building or running a strategy.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Invalid strategy configuration: {0}")]
    Config(String),

    #[error("Cannot make the {side} side feed pair: {source}")]
    FeedPair {
        side: OrderAction,
        #[source]
        source: FeedError,
    },

    #[error("{side} side: {source}")]
    Provider {
        side: OrderAction,
        #[source]
        source: ProviderError,
    },
}

pub type StrategyResult<T> = Result<T, StrategyError>;
