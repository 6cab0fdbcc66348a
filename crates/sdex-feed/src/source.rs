//! Price feed trait and in-process implementations.
//!
//! A feed returns the current price of one asset in some common unit.
//! Two feeds are combined into a center price by [`FeedPair`](crate::FeedPair).

use std::pin::Pin;
use std::str::FromStr;

use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::error::{FeedError, FeedResult};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Source of a single reference price.
pub trait PriceFeed: Send + Sync {
    /// Fetch the latest price.
    fn get_price(&self) -> BoxFuture<'_, FeedResult<Decimal>>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// Feed that always returns the configured value.
#[derive(Debug, Clone)]
pub struct FixedFeed {
    price: Decimal,
}

impl FixedFeed {
    pub fn new(price: Decimal) -> Self {
        Self { price }
    }

    /// Parse the literal value carried in the feed's URL field.
    pub fn parse(value: &str) -> FeedResult<Self> {
        let price = Decimal::from_str(value.trim())
            .map_err(|e| FeedError::InvalidValue(format!("{value:?}: {e}")))?;
        Ok(Self::new(price))
    }
}

impl PriceFeed for FixedFeed {
    fn get_price(&self) -> BoxFuture<'_, FeedResult<Decimal>> {
        let price = self.price;
        Box::pin(async move { Ok(price) })
    }

    fn describe(&self) -> String {
        format!("fixed:{}", self.price)
    }
}

/// Scriptable feed for testing.
///
/// Returns the last value set, or an error when cleared.
#[derive(Debug, Default)]
pub struct MockPriceFeed {
    price: Mutex<Option<Decimal>>,
    calls: Mutex<u64>,
}

impl MockPriceFeed {
    pub fn new(price: Decimal) -> Self {
        Self {
            price: Mutex::new(Some(price)),
            calls: Mutex::new(0),
        }
    }

    /// A feed that fails every fetch.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn set_price(&self, price: Decimal) {
        *self.price.lock() = Some(price);
    }

    pub fn set_unavailable(&self) {
        *self.price.lock() = None;
    }

    /// Number of fetches served so far.
    pub fn calls(&self) -> u64 {
        *self.calls.lock()
    }
}

impl PriceFeed for MockPriceFeed {
    fn get_price(&self) -> BoxFuture<'_, FeedResult<Decimal>> {
        Box::pin(async move {
            *self.calls.lock() += 1;
            (*self.price.lock()).ok_or_else(|| FeedError::Http("mock feed unavailable".into()))
        })
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}
