//! Level provider and fill handler capabilities.
//!
//! A provider produces the levels for one side of the market. Providers that
//! learn from fills also expose themselves as a [`FillHandler`]; callers only
//! see the two capabilities, never the concrete provider.

use tracing::debug;

use sdex_core::{Amount, Level, Price, Trade};
use sdex_feed::{BoxFuture, FeedPair};

use crate::error::{ProviderError, ProviderResult};
use crate::rate_offset::RateOffset;

/// Result of one level-generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelsOutcome {
    /// Levels to quote this cycle (possibly none).
    Levels(Vec<Level>),
    /// The provider has finished its task; stop scheduling cycles.
    Complete,
}

impl LevelsOutcome {
    /// Levels of this cycle, empty when complete.
    pub fn levels(&self) -> &[Level] {
        match self {
            Self::Levels(levels) => levels,
            Self::Complete => &[],
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Receives fills reported by the execution layer.
pub trait FillHandler: Send {
    fn handle_fill(&mut self, trade: &Trade) -> ProviderResult<()>;
}

/// Produces levels for one side of the market.
///
/// `max_base` and `max_quote` are the balances of the provider's own base
/// and quote assets, supplied by the caller on every cycle.
pub trait LevelProvider: Send {
    fn get_levels(
        &mut self,
        max_base: Amount,
        max_quote: Amount,
    ) -> BoxFuture<'_, ProviderResult<LevelsOutcome>>;

    /// Fill handler facet of this provider, if it reacts to fills.
    fn fill_handler(&mut self) -> Option<&mut dyn FillHandler> {
        None
    }
}

/// Fetch the center price and apply the configured offset.
pub(crate) async fn adjusted_center_price(
    feed: &FeedPair,
    offset: &RateOffset,
) -> ProviderResult<Price> {
    let center = Price::new(feed.get_center_price().await?);
    if !center.is_positive() {
        return Err(ProviderError::InvalidCenterPrice(center));
    }
    if offset.is_noop() {
        return Ok(center);
    }

    let adjusted = offset
        .apply(center)
        .ok_or(ProviderError::InvalidCenterPrice(center))?;
    debug!(%center, %adjusted, invert = offset.invert, "Center price (adjusted)");
    Ok(adjusted)
}
