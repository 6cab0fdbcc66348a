//! Strategy construction from configuration.
//!
//! The sell side quotes the pair as configured: feed pair (A, B) and the
//! configured offset. The buy side is its mirror: feed pair (B, A), the same
//! offset applied to the inverted price, and the inverted trading pair.

use std::sync::Arc;

use tracing::info;

use sdex_core::{Amount, OrderAction, Price, TradingPair};
use sdex_feed::{make_feed_pair, FeedPair};

use crate::config::{BuySellConfig, DynamicSpreadConfig, StopLimitConfig, StrategyConfig};
use crate::dynamic_spread::{DynamicSpreadLevelProvider, DynamicSpreadParams};
use crate::error::{StrategyError, StrategyResult};
use crate::execution::OrderBookSource;
use crate::static_spread::StaticSpreadLevelProvider;
use crate::stop_limit::StopLimitLevelProvider;
use crate::strategy::{ComposeStrategy, SideStrategy, Strategy, Tolerances};

/// Feed pairs for both sides: `(buy, sell)`.
fn mirrored_feeds(config: &BuySellConfig) -> StrategyResult<(FeedPair, FeedPair)> {
    let sell = make_feed_pair(
        &config.data_type_a,
        &config.data_feed_a_url,
        &config.data_type_b,
        &config.data_feed_b_url,
    )
    .map_err(|source| StrategyError::FeedPair {
        side: OrderAction::Sell,
        source,
    })?;
    let buy = make_feed_pair(
        &config.data_type_b,
        &config.data_feed_b_url,
        &config.data_type_a,
        &config.data_feed_a_url,
    )
    .map_err(|source| StrategyError::FeedPair {
        side: OrderAction::Buy,
        source,
    })?;
    Ok((buy, sell))
}

/// Static spreads on both sides of `pair`.
pub fn make_buysell_strategy(
    execution: &dyn OrderBookSource,
    pair: &TradingPair,
    config: &BuySellConfig,
) -> StrategyResult<ComposeStrategy> {
    config.validate()?;
    let (buy_feed, sell_feed) = mirrored_feeds(config)?;
    let offset = config.rate_offset();
    let tol = Tolerances::new(config.price_tolerance, config.amount_tolerance);

    let sell = StaticSpreadLevelProvider::new(
        config.levels.clone(),
        config.amount_of_a_base,
        offset,
        sell_feed,
        execution.order_constraints(pair),
    );
    let buy = StaticSpreadLevelProvider::new(
        config.levels.clone(),
        config.amount_of_a_base,
        offset.inverted(),
        buy_feed,
        execution.order_constraints(&pair.inverted()),
    );

    info!(%pair, levels = config.levels.len(), "Made buysell strategy");
    Ok(ComposeStrategy::new(
        SideStrategy::new(OrderAction::Buy, pair, Box::new(buy), tol),
        SideStrategy::new(OrderAction::Sell, pair, Box::new(sell), tol),
        tol,
    ))
}

/// Spreads on both sides that react to counter fills and balances.
pub fn make_dynamic_spread_strategy(
    execution: &dyn OrderBookSource,
    pair: &TradingPair,
    config: &DynamicSpreadConfig,
) -> StrategyResult<ComposeStrategy> {
    config.validate()?;
    let spread = &config.spread;
    let (buy_feed, sell_feed) = mirrored_feeds(spread)?;
    let offset = spread.rate_offset();
    let tol = Tolerances::new(spread.price_tolerance, spread.amount_tolerance);
    let params = DynamicSpreadParams {
        carry_back_trigger: config.carry_back_trigger,
        low_balance_target: config.low_balance_target,
        high_balance_target: config.high_balance_target,
        amount_reduce: config.amount_reduce,
    };

    let sell = DynamicSpreadLevelProvider::new(
        spread.levels.clone(),
        spread.amount_of_a_base,
        offset,
        sell_feed,
        execution.order_constraints(pair),
        OrderAction::Sell,
        params,
    );
    let buy = DynamicSpreadLevelProvider::new(
        spread.levels.clone(),
        spread.amount_of_a_base,
        offset.inverted(),
        buy_feed,
        execution.order_constraints(&pair.inverted()),
        OrderAction::Buy,
        params,
    );

    info!(
        %pair,
        levels = spread.levels.len(),
        carry_back_trigger = %config.carry_back_trigger,
        "Made dynamic spread strategy"
    );
    Ok(ComposeStrategy::new(
        SideStrategy::new(OrderAction::Buy, pair, Box::new(buy), tol),
        SideStrategy::new(OrderAction::Sell, pair, Box::new(sell), tol),
        tol,
    ))
}

/// Sell-only stop-limit on `pair`.
pub fn make_stop_limit_strategy(
    execution: Arc<dyn OrderBookSource>,
    pair: &TradingPair,
    config: &StopLimitConfig,
) -> StrategyResult<SideStrategy> {
    config.validate()?;
    let constraints = execution.order_constraints(pair);
    let provider = StopLimitLevelProvider::new(
        execution,
        pair.clone(),
        Amount::new(config.amount_of_a_base),
        Price::new(config.stop_price),
        Price::new(config.limit_price),
        constraints,
    );

    info!(
        %pair,
        stop = %config.stop_price,
        limit = %config.limit_price,
        amount = %config.amount_of_a_base,
        "Made stop-limit strategy"
    );
    Ok(SideStrategy::new(
        OrderAction::Sell,
        pair,
        Box::new(provider),
        Tolerances::new(config.price_tolerance, config.amount_tolerance),
    ))
}

/// Build the configured strategy.
pub fn make_strategy(
    execution: Arc<dyn OrderBookSource>,
    pair: &TradingPair,
    config: &StrategyConfig,
) -> StrategyResult<Box<dyn Strategy>> {
    Ok(match config {
        StrategyConfig::Buysell(c) => Box::new(make_buysell_strategy(execution.as_ref(), pair, c)?),
        StrategyConfig::DynamicSpread(c) => {
            Box::new(make_dynamic_spread_strategy(execution.as_ref(), pair, c)?)
        }
        StrategyConfig::StopLimit(c) => Box::new(make_stop_limit_strategy(execution, pair, c)?),
    })
}
