//! Center price from two independent feeds.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{FeedError, FeedResult};
use crate::http::UrlFeed;
use crate::source::{FixedFeed, PriceFeed};

/// Feed kind named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// The URL field holds a literal price.
    Fixed,
    /// The URL field is an HTTP endpoint returning a price.
    Url,
}

impl FromStr for FeedKind {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "url" => Ok(Self::Url),
            other => Err(FeedError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Url => write!(f, "url"),
        }
    }
}

/// Build a single feed from its kind and URL field.
pub fn make_price_feed(kind: &str, url: &str) -> FeedResult<Arc<dyn PriceFeed>> {
    let feed: Arc<dyn PriceFeed> = match kind.parse::<FeedKind>()? {
        FeedKind::Fixed => Arc::new(FixedFeed::parse(url)?),
        FeedKind::Url => Arc::new(UrlFeed::new(url)?),
    };
    Ok(feed)
}

/// Two feeds whose ratio is the center price (`price(a) / price(b)`).
#[derive(Clone)]
pub struct FeedPair {
    a: Arc<dyn PriceFeed>,
    b: Arc<dyn PriceFeed>,
}

impl FeedPair {
    pub fn new(a: Arc<dyn PriceFeed>, b: Arc<dyn PriceFeed>) -> Self {
        Self { a, b }
    }

    /// Fetch both feeds and derive the center price.
    pub async fn get_center_price(&self) -> FeedResult<Decimal> {
        let price_a = self.a.get_price().await?;
        let price_b = self.b.get_price().await?;
        if price_b.is_zero() {
            return Err(FeedError::ZeroPrice(self.b.describe()));
        }
        let center = price_a.checked_div(price_b).ok_or_else(|| FeedError::Overflow {
            a: self.a.describe(),
            b: self.b.describe(),
        })?;
        debug!(
            feed_a = %self.a.describe(),
            feed_b = %self.b.describe(),
            %price_a,
            %price_b,
            %center,
            "Center price"
        );
        Ok(center)
    }
}

impl fmt::Debug for FeedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedPair")
            .field("a", &self.a.describe())
            .field("b", &self.b.describe())
            .finish()
    }
}

/// Build a feed pair from the `(kind_a, url_a, kind_b, url_b)` quad.
pub fn make_feed_pair(kind_a: &str, url_a: &str, kind_b: &str, url_b: &str) -> FeedResult<FeedPair> {
    let a = make_price_feed(kind_a, url_a)?;
    let b = make_price_feed(kind_b, url_b)?;
    Ok(FeedPair::new(a, b))
}
