//! Execution-side collaborator consumed by level providers.

use parking_lot::Mutex;

use sdex_core::{OrderBook, OrderConstraints, TradingPair};
use sdex_feed::BoxFuture;

use crate::error::{ExecutionError, ExecutionResult};

/// Order book and constraint queries against the exchange.
///
/// Injected into strategy factories; providers never build their own client.
pub trait OrderBookSource: Send + Sync {
    /// Precision and sizing rules for `pair`.
    fn order_constraints(&self, pair: &TradingPair) -> OrderConstraints;

    /// Snapshot of the top `depth` entries on each side.
    fn get_order_book<'a>(
        &'a self,
        pair: &'a TradingPair,
        depth: usize,
    ) -> BoxFuture<'a, ExecutionResult<OrderBook>>;
}

/// Scriptable order book source for testing.
#[derive(Debug)]
pub struct MockOrderBookSource {
    constraints: OrderConstraints,
    book: Mutex<Option<OrderBook>>,
    queries: Mutex<u64>,
}

impl MockOrderBookSource {
    pub fn new(constraints: OrderConstraints, book: OrderBook) -> Self {
        Self {
            constraints,
            book: Mutex::new(Some(book)),
            queries: Mutex::new(0),
        }
    }

    pub fn set_book(&self, book: OrderBook) {
        *self.book.lock() = Some(book);
    }

    /// Make every following query fail.
    pub fn set_unavailable(&self) {
        *self.book.lock() = None;
    }

    pub fn queries(&self) -> u64 {
        *self.queries.lock()
    }
}

impl OrderBookSource for MockOrderBookSource {
    fn order_constraints(&self, _pair: &TradingPair) -> OrderConstraints {
        self.constraints.clone()
    }

    fn get_order_book<'a>(
        &'a self,
        pair: &'a TradingPair,
        depth: usize,
    ) -> BoxFuture<'a, ExecutionResult<OrderBook>> {
        Box::pin(async move {
            *self.queries.lock() += 1;
            self.book
                .lock()
                .as_ref()
                .map(|b| b.truncated(depth))
                .ok_or_else(|| ExecutionError::OrderBook(format!("no book for {pair}")))
        })
    }
}
