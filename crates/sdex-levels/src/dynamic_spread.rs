//! Spread levels that react to counter fills and balance drift.
//!
//! On top of the static tiers this provider:
//! - shrinks every tier when the account is already skewed toward this side
//! - withholds tiers that would re-quote too close to the last fill on the
//!   opposite side, carrying their amount over into the next emitted tier
//!
//! # Orientation
//!
//! The buy side of a pair is built on the inverted pair, so its center and
//! target prices are base-per-quote. Fills are always reported in the pair's
//! own orientation, hence the buy-side guard compares `1 / target_price`.

use rust_decimal::Decimal;
use tracing::{debug, info};

use sdex_core::{Amount, Level, OrderAction, OrderConstraints, Price, Trade};
use sdex_feed::{BoxFuture, FeedPair};

use crate::config::StaticLevel;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::{adjusted_center_price, FillHandler, LevelProvider, LevelsOutcome};
use crate::rate_offset::RateOffset;

/// Balance band and counter-fill parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicSpreadParams {
    pub carry_back_trigger: Decimal,
    pub low_balance_target: Decimal,
    pub high_balance_target: Decimal,
    pub amount_reduce: Decimal,
}

#[derive(Debug)]
pub struct DynamicSpreadLevelProvider {
    static_levels: Vec<StaticLevel>,
    amount_of_base: Decimal,
    offset: RateOffset,
    feed: FeedPair,
    constraints: OrderConstraints,
    side: OrderAction,
    params: DynamicSpreadParams,
    /// Price of the most recent fill on the opposite side.
    last_counter_fill: Option<Price>,
}

impl DynamicSpreadLevelProvider {
    pub fn new(
        static_levels: Vec<StaticLevel>,
        amount_of_base: Decimal,
        offset: RateOffset,
        feed: FeedPair,
        constraints: OrderConstraints,
        side: OrderAction,
        params: DynamicSpreadParams,
    ) -> Self {
        Self {
            static_levels,
            amount_of_base,
            offset,
            feed,
            constraints,
            side,
            params,
            last_counter_fill: None,
        }
    }

    pub fn last_counter_fill(&self) -> Option<Price> {
        self.last_counter_fill
    }

    /// Whether the balance band asks for smaller quotes this cycle.
    fn should_reduce(&self, max_base: Amount, max_quote: Amount) -> bool {
        match self.side {
            OrderAction::Sell => max_base.inner() < self.params.low_balance_target,
            OrderAction::Buy => max_quote.inner() > self.params.high_balance_target,
        }
    }

    /// Whether a tier at `target_price` must be withheld.
    fn is_unfavorable(&self, center: Price, target_price: Price) -> ProviderResult<bool> {
        let Some(last) = self.last_counter_fill else {
            return Ok(false);
        };

        let overflow = ProviderError::Overflow(center);
        let unfavorable = match self.side {
            OrderAction::Buy => {
                let inv_center = center
                    .inverse()
                    .ok_or(ProviderError::InvalidCenterPrice(center))?;
                let inv_target = target_price
                    .inverse()
                    .ok_or(ProviderError::InvalidCenterPrice(target_price))?;
                let limit = inv_center
                    .inner()
                    .checked_mul(self.params.carry_back_trigger)
                    .ok_or(overflow)?;
                match last.inner().checked_sub(limit) {
                    Some(bound) => inv_target.inner() > bound,
                    // bound below the decimal range: every target is above it
                    None => true,
                }
            }
            OrderAction::Sell => {
                let limit = center
                    .inner()
                    .checked_mul(self.params.carry_back_trigger)
                    .ok_or(overflow)?;
                match last.inner().checked_add(limit) {
                    Some(bound) => target_price.inner() < bound,
                    None => true,
                }
            }
        };
        Ok(unfavorable)
    }

    fn compute_levels(
        &self,
        center: Price,
        max_base: Amount,
        max_quote: Amount,
    ) -> ProviderResult<Vec<Level>> {
        let reduce = self.should_reduce(max_base, max_quote);
        if reduce {
            debug!(
                side = %self.side,
                %max_base,
                %max_quote,
                "Balance outside target band, reducing quoted amounts"
            );
        }

        let overflow = || ProviderError::Overflow(center);
        let reduction = if reduce {
            Amount::checked_fraction(self.params.amount_reduce, self.amount_of_base)
                .ok_or_else(overflow)?
        } else {
            Amount::ZERO
        };

        let mut levels = Vec::with_capacity(self.static_levels.len());
        let mut carry_over = Amount::ZERO;

        for sl in &self.static_levels {
            let target_price = center.checked_spread(sl.spread).ok_or_else(overflow)?;
            let full_amount =
                Amount::checked_fraction(sl.amount, self.amount_of_base).ok_or_else(overflow)?;
            // a reduction larger than the tier empties it
            let target_amount = if reduction >= full_amount {
                Amount::ZERO
            } else {
                full_amount - reduction
            };

            if self.is_unfavorable(center, target_price)? {
                carry_over = carry_over.checked_add(target_amount).ok_or_else(overflow)?;
                info!(
                    side = %self.side,
                    amount = %target_amount,
                    %target_price,
                    last_counter_fill = ?self.last_counter_fill,
                    "Carrying over tier due to price move"
                );
                continue;
            }

            let amount = target_amount.checked_add(carry_over).ok_or_else(overflow)?;
            levels.push(Level::rounded(target_price, amount, &self.constraints));
            carry_over = Amount::ZERO;
        }

        if carry_over.is_positive() {
            debug!(side = %self.side, dropped = %carry_over, "Carry-over left after last tier");
        }
        Ok(levels)
    }
}

impl LevelProvider for DynamicSpreadLevelProvider {
    fn get_levels(
        &mut self,
        max_base: Amount,
        max_quote: Amount,
    ) -> BoxFuture<'_, ProviderResult<LevelsOutcome>> {
        Box::pin(async move {
            let center = adjusted_center_price(&self.feed, &self.offset).await?;
            let levels = self.compute_levels(center, max_base, max_quote)?;
            Ok(LevelsOutcome::Levels(levels))
        })
    }

    fn fill_handler(&mut self) -> Option<&mut dyn FillHandler> {
        Some(self)
    }
}

impl FillHandler for DynamicSpreadLevelProvider {
    fn handle_fill(&mut self, trade: &Trade) -> ProviderResult<()> {
        if trade.action == self.side.opposite() {
            debug!(side = %self.side, price = %trade.price, "Recorded counter fill");
            self.last_counter_fill = Some(trade.price);
        }
        Ok(())
    }
}
