//! Reference price feeds for the SDEX market-making agent.
//!
//! Provides the center price consumed by level providers:
//! - `PriceFeed`: one reference price (fixed literal or HTTP endpoint)
//! - `FeedPair`: ratio of two feeds, built from configuration

pub mod error;
pub mod http;
pub mod pair;
pub mod source;

pub use error::{FeedError, FeedResult};
pub use http::UrlFeed;
pub use pair::{make_feed_pair, make_price_feed, FeedKind, FeedPair};
pub use source::{BoxFuture, FixedFeed, MockPriceFeed, PriceFeed};
