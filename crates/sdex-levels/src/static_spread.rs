//! Fixed percentage spread around the center price.

use rust_decimal::Decimal;

use sdex_core::{Amount, Level, OrderConstraints};
use sdex_feed::{BoxFuture, FeedPair};

use crate::config::StaticLevel;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::{adjusted_center_price, LevelProvider, LevelsOutcome};
use crate::rate_offset::RateOffset;

/// Provides one level per configured tier at `center * (1 + spread)`.
#[derive(Debug)]
pub struct StaticSpreadLevelProvider {
    static_levels: Vec<StaticLevel>,
    amount_of_base: Decimal,
    offset: RateOffset,
    feed: FeedPair,
    constraints: OrderConstraints,
}

impl StaticSpreadLevelProvider {
    pub fn new(
        static_levels: Vec<StaticLevel>,
        amount_of_base: Decimal,
        offset: RateOffset,
        feed: FeedPair,
        constraints: OrderConstraints,
    ) -> Self {
        Self {
            static_levels,
            amount_of_base,
            offset,
            feed,
            constraints,
        }
    }
}

impl LevelProvider for StaticSpreadLevelProvider {
    fn get_levels(
        &mut self,
        _max_base: Amount,
        _max_quote: Amount,
    ) -> BoxFuture<'_, ProviderResult<LevelsOutcome>> {
        Box::pin(async move {
            let center = adjusted_center_price(&self.feed, &self.offset).await?;

            let levels = self
                .static_levels
                .iter()
                .map(|sl| {
                    // always above center: this side sells its base asset
                    let price = center
                        .checked_spread(sl.spread)
                        .ok_or(ProviderError::Overflow(center))?;
                    let amount = Amount::checked_fraction(sl.amount, self.amount_of_base)
                        .ok_or(ProviderError::Overflow(center))?;
                    Ok(Level::rounded(price, amount, &self.constraints))
                })
                .collect::<ProviderResult<Vec<_>>>()?;

            Ok(LevelsOutcome::Levels(levels))
        })
    }
}
