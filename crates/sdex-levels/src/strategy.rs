//! Side strategies and their composition into one bidirectional strategy.
//!
//! A [`SideStrategy`] wraps one [`LevelProvider`] and knows which asset it
//! sells. The buy side of a pair is built on the inverted pair: it sells the
//! quote asset, its prices are base-per-quote and its amounts are in quote
//! units. Balances are always passed in pair orientation and swapped here.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use sdex_core::{Asset, Balances, Level, OrderAction, Trade, TradingPair};
use sdex_feed::BoxFuture;

use crate::error::{StrategyError, StrategyResult};
use crate::provider::{LevelProvider, LevelsOutcome};

/// Relative thresholds for replacing a resting level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tolerances {
    pub price: Decimal,
    pub amount: Decimal,
}

impl Tolerances {
    pub fn new(price: Decimal, amount: Decimal) -> Self {
        Self { price, amount }
    }

    /// Whether `resting` has drifted far enough from `target` to be replaced.
    pub fn needs_update(&self, resting: &Level, target: &Level) -> bool {
        exceeds(resting.price.inner(), target.price.inner(), self.price)
            || exceeds(resting.amount.inner(), target.amount.inner(), self.amount)
    }
}

fn exceeds(old: Decimal, new: Decimal, tolerance: Decimal) -> bool {
    if old.is_zero() {
        return !new.is_zero();
    }
    // a change too large to represent is past any tolerance
    new.checked_sub(old)
        .and_then(|delta| delta.abs().checked_div(old.abs()))
        .map_or(true, |change| change > tolerance)
}

/// Levels of one side for one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideQuotes {
    pub side: OrderAction,
    /// Asset offered by every level of this side.
    pub selling: Asset,
    /// Asset received when a level is taken.
    pub buying: Asset,
    /// Prices in `buying` per `selling`, amounts in `selling`.
    pub levels: Vec<Level>,
}

/// Outcome of one strategy cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyCycle {
    Quotes(Vec<SideQuotes>),
    Complete,
}

impl StrategyCycle {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    pub fn quotes(&self) -> &[SideQuotes] {
        match self {
            Self::Quotes(q) => q,
            Self::Complete => &[],
        }
    }
}

/// A complete trading strategy driven by the trading loop.
pub trait Strategy: Send {
    /// Compute this cycle's levels. `balances` are in pair orientation.
    fn get_levels(&mut self, balances: Balances) -> BoxFuture<'_, StrategyResult<StrategyCycle>>;

    /// Route a fill, reported in pair orientation.
    fn handle_fill(&mut self, trade: &Trade) -> StrategyResult<()>;

    fn tolerances(&self) -> Tolerances;
}

/// One side of the market backed by a single provider.
pub struct SideStrategy {
    side: OrderAction,
    /// Pair in this side's own orientation (inverted for the buy side).
    pair: TradingPair,
    provider: Box<dyn LevelProvider>,
    tolerances: Tolerances,
}

impl SideStrategy {
    /// `pair` is the traded pair; the buy side inverts it.
    pub fn new(
        side: OrderAction,
        pair: &TradingPair,
        provider: Box<dyn LevelProvider>,
        tolerances: Tolerances,
    ) -> Self {
        let pair = match side {
            OrderAction::Sell => pair.clone(),
            OrderAction::Buy => pair.inverted(),
        };
        Self {
            side,
            pair,
            provider,
            tolerances,
        }
    }

    pub fn side(&self) -> OrderAction {
        self.side
    }

    pub fn selling(&self) -> &Asset {
        &self.pair.base
    }

    pub fn buying(&self) -> &Asset {
        &self.pair.quote
    }

    /// Levels for this side, `None` once the provider has completed.
    pub async fn side_levels(&mut self, balances: Balances) -> StrategyResult<Option<SideQuotes>> {
        let own = match self.side {
            OrderAction::Sell => balances,
            OrderAction::Buy => balances.swapped(),
        };

        let outcome = self
            .provider
            .get_levels(own.base, own.quote)
            .await
            .map_err(|source| StrategyError::Provider {
                side: self.side,
                source,
            })?;

        match outcome {
            LevelsOutcome::Complete => Ok(None),
            LevelsOutcome::Levels(levels) => {
                debug!(side = %self.side, pair = %self.pair, count = levels.len(), "Side levels");
                Ok(Some(SideQuotes {
                    side: self.side,
                    selling: self.pair.base.clone(),
                    buying: self.pair.quote.clone(),
                    levels,
                }))
            }
        }
    }

    /// Deliver a fill to the provider's fill handler, if it has one.
    pub fn deliver_fill(&mut self, trade: &Trade) -> StrategyResult<()> {
        let side = self.side;
        match self.provider.fill_handler() {
            Some(handler) => handler
                .handle_fill(trade)
                .map_err(|source| StrategyError::Provider { side, source }),
            None => Ok(()),
        }
    }
}

impl Strategy for SideStrategy {
    fn get_levels(&mut self, balances: Balances) -> BoxFuture<'_, StrategyResult<StrategyCycle>> {
        Box::pin(async move {
            Ok(match self.side_levels(balances).await? {
                Some(quotes) => StrategyCycle::Quotes(vec![quotes]),
                None => StrategyCycle::Complete,
            })
        })
    }

    fn handle_fill(&mut self, trade: &Trade) -> StrategyResult<()> {
        self.deliver_fill(trade)
    }

    fn tolerances(&self) -> Tolerances {
        self.tolerances
    }
}

/// Buy and sell sides quoted together with shared fill routing.
pub struct ComposeStrategy {
    buy: SideStrategy,
    sell: SideStrategy,
    tolerances: Tolerances,
}

impl ComposeStrategy {
    pub fn new(buy: SideStrategy, sell: SideStrategy, tolerances: Tolerances) -> Self {
        Self {
            buy,
            sell,
            tolerances,
        }
    }
}

impl Strategy for ComposeStrategy {
    fn get_levels(&mut self, balances: Balances) -> BoxFuture<'_, StrategyResult<StrategyCycle>> {
        Box::pin(async move {
            let buy = self.buy.side_levels(balances).await?;
            let sell = self.sell.side_levels(balances).await?;

            match (buy, sell) {
                (Some(buy), Some(sell)) => Ok(StrategyCycle::Quotes(vec![buy, sell])),
                _ => Ok(StrategyCycle::Complete),
            }
        })
    }

    /// Both sides see every fill; the first error is returned after both ran.
    fn handle_fill(&mut self, trade: &Trade) -> StrategyResult<()> {
        let buy = self.buy.deliver_fill(trade);
        let sell = self.sell.deliver_fill(trade);
        if let (Err(e), Err(_)) = (&buy, &sell) {
            warn!(error = %e, "Both sides failed to handle fill");
        }
        buy.and(sell)
    }

    fn tolerances(&self) -> Tolerances {
        self.tolerances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticLevel;
    use crate::dynamic_spread::{DynamicSpreadLevelProvider, DynamicSpreadParams};
    use crate::error::{ProviderError, ProviderResult};
    use crate::provider::FillHandler;
    use crate::rate_offset::RateOffset;
    use parking_lot::Mutex;
    use rust_decimal_macros::dec;
    use sdex_core::{Amount, OrderConstraints, Price};
    use sdex_feed::{FeedPair, FixedFeed};
    use std::sync::Arc;

    /// Records balances and fills it receives.
    struct Recorder {
        seen_balances: Arc<Mutex<Vec<(Amount, Amount)>>>,
        fills: Arc<Mutex<Vec<Trade>>>,
        complete: bool,
        fail_fills: bool,
    }

    impl Recorder {
        fn new() -> (Self, Arc<Mutex<Vec<(Amount, Amount)>>>, Arc<Mutex<Vec<Trade>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            let fills = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    seen_balances: seen.clone(),
                    fills: fills.clone(),
                    complete: false,
                    fail_fills: false,
                },
                seen,
                fills,
            )
        }
    }

    impl LevelProvider for Recorder {
        fn get_levels(
            &mut self,
            max_base: Amount,
            max_quote: Amount,
        ) -> BoxFuture<'_, ProviderResult<LevelsOutcome>> {
            Box::pin(async move {
                self.seen_balances.lock().push((max_base, max_quote));
                if self.complete {
                    return Ok(LevelsOutcome::Complete);
                }
                Ok(LevelsOutcome::Levels(vec![Level::new(
                    Price::new(dec!(1)),
                    Amount::new(dec!(1)),
                )]))
            })
        }

        fn fill_handler(&mut self) -> Option<&mut dyn FillHandler> {
            Some(self)
        }
    }

    impl FillHandler for Recorder {
        fn handle_fill(&mut self, trade: &Trade) -> ProviderResult<()> {
            self.fills.lock().push(*trade);
            if self.fail_fills {
                return Err(ProviderError::Fill("rejected".into()));
            }
            Ok(())
        }
    }

    fn pair() -> TradingPair {
        TradingPair::new(Asset::new("XLM"), Asset::new("USD"))
    }

    fn trade(action: OrderAction, price: Decimal) -> Trade {
        Trade::new(action, Price::new(price), Amount::new(dec!(10)))
    }

    #[test]
    fn test_tolerances() {
        let tol = Tolerances::new(dec!(0.01), dec!(0.1));
        let resting = Level::new(Price::new(dec!(100)), Amount::new(dec!(10)));

        assert!(!tol.needs_update(&resting, &resting));
        assert!(!tol.needs_update(&resting, &Level::new(Price::new(dec!(101)), Amount::new(dec!(10)))));
        assert!(tol.needs_update(&resting, &Level::new(Price::new(dec!(101.01)), Amount::new(dec!(10)))));
        assert!(!tol.needs_update(&resting, &Level::new(Price::new(dec!(100)), Amount::new(dec!(9)))));
        assert!(tol.needs_update(&resting, &Level::new(Price::new(dec!(100)), Amount::new(dec!(8.9)))));

        let zero = Tolerances::default();
        assert!(zero.needs_update(&resting, &Level::new(Price::new(dec!(100.0001)), Amount::new(dec!(10)))));

        // relative change beyond the decimal range still reads as a change
        let tiny = Level::new(Price::new(dec!(0.0000001)), Amount::new(dec!(10)));
        let huge = Level::new(Price::new(Decimal::MAX), Amount::new(dec!(10)));
        assert!(tol.needs_update(&tiny, &huge));
    }

    #[tokio::test]
    async fn test_buy_side_gets_swapped_balances() {
        let (buy, buy_seen, _) = Recorder::new();
        let (sell, sell_seen, _) = Recorder::new();
        let mut strategy = ComposeStrategy::new(
            SideStrategy::new(OrderAction::Buy, &pair(), Box::new(buy), Tolerances::default()),
            SideStrategy::new(OrderAction::Sell, &pair(), Box::new(sell), Tolerances::default()),
            Tolerances::default(),
        );

        let balances = Balances::new(Amount::new(dec!(1000)), Amount::new(dec!(50)));
        let cycle = strategy.get_levels(balances).await.unwrap();

        assert_eq!(
            buy_seen.lock().as_slice(),
            &[(Amount::new(dec!(50)), Amount::new(dec!(1000)))]
        );
        assert_eq!(
            sell_seen.lock().as_slice(),
            &[(Amount::new(dec!(1000)), Amount::new(dec!(50)))]
        );

        let quotes = cycle.quotes();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].side, OrderAction::Buy);
        assert_eq!(quotes[0].selling, Asset::new("USD"));
        assert_eq!(quotes[0].buying, Asset::new("XLM"));
        assert_eq!(quotes[1].selling, Asset::new("XLM"));
    }

    #[tokio::test]
    async fn test_complete_when_either_side_completes() {
        let (buy, _, _) = Recorder::new();
        let (mut sell, _, _) = Recorder::new();
        sell.complete = true;
        let mut strategy = ComposeStrategy::new(
            SideStrategy::new(OrderAction::Buy, &pair(), Box::new(buy), Tolerances::default()),
            SideStrategy::new(OrderAction::Sell, &pair(), Box::new(sell), Tolerances::default()),
            Tolerances::default(),
        );

        let cycle = strategy.get_levels(Balances::default()).await.unwrap();
        assert!(cycle.is_complete());
    }

    #[test]
    fn test_fill_fans_out_to_both_sides() {
        let (mut buy, _, buy_fills) = Recorder::new();
        buy.fail_fills = true;
        let (sell, _, sell_fills) = Recorder::new();
        let mut strategy = ComposeStrategy::new(
            SideStrategy::new(OrderAction::Buy, &pair(), Box::new(buy), Tolerances::default()),
            SideStrategy::new(OrderAction::Sell, &pair(), Box::new(sell), Tolerances::default()),
            Tolerances::default(),
        );

        let fill = trade(OrderAction::Sell, dec!(0.1));
        let result = strategy.handle_fill(&fill);

        // the failing buy side does not starve the sell side
        assert!(matches!(
            result,
            Err(StrategyError::Provider {
                side: OrderAction::Buy,
                ..
            })
        ));
        assert_eq!(buy_fills.lock().as_slice(), &[fill]);
        assert_eq!(sell_fills.lock().as_slice(), &[fill]);
    }

    #[tokio::test]
    async fn test_sell_fill_triggers_buy_carry_over() {
        let tiers = vec![
            StaticLevel::new(dec!(0.005), dec!(1)),
            StaticLevel::new(dec!(0.25), dec!(1)),
        ];
        let params = DynamicSpreadParams {
            carry_back_trigger: dec!(0.01),
            low_balance_target: dec!(0),
            high_balance_target: dec!(1000000),
            amount_reduce: dec!(0),
        };
        // pair price 100 quote per base; the buy side sees 0.01
        let feed = |a: Decimal, b: Decimal| {
            FeedPair::new(Arc::new(FixedFeed::new(a)), Arc::new(FixedFeed::new(b)))
        };
        let buy = DynamicSpreadLevelProvider::new(
            tiers.clone(),
            dec!(10),
            RateOffset::default(),
            feed(dec!(1), dec!(100)),
            OrderConstraints::default(),
            OrderAction::Buy,
            params,
        );
        let sell = DynamicSpreadLevelProvider::new(
            tiers,
            dec!(10),
            RateOffset::default(),
            feed(dec!(100), dec!(1)),
            OrderConstraints::default(),
            OrderAction::Sell,
            params,
        );
        let mut strategy = ComposeStrategy::new(
            SideStrategy::new(OrderAction::Buy, &pair(), Box::new(buy), Tolerances::default()),
            SideStrategy::new(OrderAction::Sell, &pair(), Box::new(sell), Tolerances::default()),
            Tolerances::default(),
        );
        let balances = Balances::new(Amount::new(dec!(100)), Amount::new(dec!(100)));

        let before = strategy.get_levels(balances).await.unwrap();
        assert_eq!(before.quotes()[0].levels.len(), 2);

        strategy.handle_fill(&trade(OrderAction::Sell, dec!(100))).unwrap();

        let after = strategy.get_levels(balances).await.unwrap();
        let buy_levels = &after.quotes()[0].levels;
        assert_eq!(
            buy_levels.as_slice(),
            &[Level::new(Price::new(dec!(0.0125)), Amount::new(dec!(20)))]
        );
        // a sell fill is not a counter fill for the sell side
        assert_eq!(after.quotes()[1].levels.len(), 2);
    }

    #[tokio::test]
    async fn test_side_strategy_standalone() {
        let (mut sell, _, _) = Recorder::new();
        sell.complete = true;
        let mut side = SideStrategy::new(
            OrderAction::Sell,
            &pair(),
            Box::new(sell),
            Tolerances::new(dec!(0.001), dec!(0.001)),
        );

        assert_eq!(side.selling(), &Asset::new("XLM"));
        assert_eq!(side.tolerances().price, dec!(0.001));
        assert!(side.get_levels(Balances::default()).await.unwrap().is_complete());
    }
}
