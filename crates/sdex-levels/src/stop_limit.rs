//! One-shot stop-limit order.
//!
//! ```text
//! ARMED ── top bid <= stop ──▶ emit (limit, amount) ── fill ──▶ FILLED
//!   ▲            │                                               │
//!   └── top bid > stop: no levels                   Complete on every later cycle
//! ```
//!
//! The trigger is re-evaluated each cycle while armed. Once any fill arrives
//! the provider is terminal and reports [`LevelsOutcome::Complete`].

use std::sync::Arc;

use tracing::{debug, info};

use sdex_core::{Amount, Level, OrderConstraints, Price, Trade, TradingPair};
use sdex_feed::BoxFuture;

use crate::error::{ProviderError, ProviderResult};
use crate::execution::OrderBookSource;
use crate::provider::{FillHandler, LevelProvider, LevelsOutcome};

pub struct StopLimitLevelProvider {
    execution: Arc<dyn OrderBookSource>,
    pair: TradingPair,
    amount_of_base: Amount,
    stop_price: Price,
    limit_price: Price,
    constraints: OrderConstraints,
    /// Set by the first fill at any amount; never reset.
    order_filled: bool,
}

impl StopLimitLevelProvider {
    pub fn new(
        execution: Arc<dyn OrderBookSource>,
        pair: TradingPair,
        amount_of_base: Amount,
        stop_price: Price,
        limit_price: Price,
        constraints: OrderConstraints,
    ) -> Self {
        Self {
            execution,
            pair,
            amount_of_base,
            stop_price,
            limit_price,
            constraints,
            order_filled: false,
        }
    }

    pub fn is_filled(&self) -> bool {
        self.order_filled
    }

    async fn top_bid(&self) -> ProviderResult<Price> {
        let book = self.execution.get_order_book(&self.pair, 1).await?;
        book.top_bid()
            .ok_or_else(|| ProviderError::NoTopBid(self.pair.to_string()))
    }
}

impl LevelProvider for StopLimitLevelProvider {
    fn get_levels(
        &mut self,
        max_base: Amount,
        _max_quote: Amount,
    ) -> BoxFuture<'_, ProviderResult<LevelsOutcome>> {
        Box::pin(async move {
            if self.order_filled {
                info!(pair = %self.pair, "The order was placed and filled, stop-limit complete");
                return Ok(LevelsOutcome::Complete);
            }

            if self.amount_of_base > max_base {
                return Err(ProviderError::InsufficientBalance {
                    required: self.amount_of_base,
                    available: max_base,
                });
            }

            let top_bid = self.top_bid().await?;
            if top_bid <= self.stop_price {
                info!(
                    pair = %self.pair,
                    %top_bid,
                    stop = %self.stop_price,
                    limit = %self.limit_price,
                    "Stop was triggered, placing order"
                );
                let level = Level::rounded(self.limit_price, self.amount_of_base, &self.constraints);
                return Ok(LevelsOutcome::Levels(vec![level]));
            }

            debug!(pair = %self.pair, %top_bid, stop = %self.stop_price, "Stop was not triggered");
            Ok(LevelsOutcome::Levels(Vec::new()))
        })
    }

    fn fill_handler(&mut self) -> Option<&mut dyn FillHandler> {
        Some(self)
    }
}

impl FillHandler for StopLimitLevelProvider {
    fn handle_fill(&mut self, trade: &Trade) -> ProviderResult<()> {
        info!(pair = %self.pair, %trade, "The order was taken, will complete next cycle");
        self.order_filled = true;
        Ok(())
    }
}
