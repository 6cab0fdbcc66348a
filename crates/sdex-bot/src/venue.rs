//! Execution venue used by the trading loop.
//!
//! `PaperVenue` keeps resting offers in memory and matches them against a
//! static order book. Offers are held in each side's own orientation; fills
//! are reported in pair orientation.

use parking_lot::Mutex;
use tracing::{debug, info};

use sdex_core::{Amount, Balances, Level, OrderAction, OrderBook, OrderConstraints, Trade, TradingPair};
use sdex_feed::BoxFuture;
use sdex_levels::{ExecutionError, ExecutionResult, OrderBookSource, SideQuotes, Tolerances};

/// Counts of the changes made by one reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub placed: usize,
    pub kept: usize,
    pub cancelled: usize,
}

/// Account and order management required by the trading loop.
pub trait ExecutionVenue: OrderBookSource {
    /// Balances of the pair's base and quote assets.
    fn balances<'a>(&'a self, pair: &'a TradingPair) -> BoxFuture<'a, ExecutionResult<Balances>>;

    /// Bring the resting offers of each quoted side in line with its levels.
    fn reconcile<'a>(
        &'a self,
        pair: &'a TradingPair,
        quotes: &'a [SideQuotes],
        tolerances: Tolerances,
    ) -> BoxFuture<'a, ExecutionResult<ReconcileSummary>>;

    /// Fills since the previous call, oldest first.
    fn take_fills<'a>(&'a self, pair: &'a TradingPair) -> BoxFuture<'a, ExecutionResult<Vec<Trade>>>;

    /// Cancel every resting offer; returns how many were cancelled.
    fn cancel_all<'a>(&'a self, pair: &'a TradingPair) -> BoxFuture<'a, ExecutionResult<usize>>;
}

#[derive(Debug, Default)]
struct PaperState {
    balances: Balances,
    book: OrderBook,
    /// Resting buy-side offers: base-per-quote prices, quote amounts.
    bids: Vec<Level>,
    /// Resting sell-side offers: quote-per-base prices, base amounts.
    asks: Vec<Level>,
    fills: Vec<Trade>,
}

/// In-memory venue that fills offers crossing a static order book.
#[derive(Debug)]
pub struct PaperVenue {
    constraints: OrderConstraints,
    state: Mutex<PaperState>,
}

impl PaperVenue {
    pub fn new(constraints: OrderConstraints, balances: Balances, book: OrderBook) -> Self {
        Self {
            constraints,
            state: Mutex::new(PaperState {
                balances,
                book,
                ..PaperState::default()
            }),
        }
    }

    /// Replace the external order book.
    pub fn set_order_book(&self, book: OrderBook) {
        self.state.lock().book = book;
    }

    /// Resting offers of one side, in that side's orientation.
    pub fn resting(&self, side: OrderAction) -> Vec<Level> {
        let state = self.state.lock();
        match side {
            OrderAction::Buy => state.bids.clone(),
            OrderAction::Sell => state.asks.clone(),
        }
    }

    pub fn current_balances(&self) -> Balances {
        self.state.lock().balances
    }
}

/// Base-asset size of a level quoted by `side`, `None` when it overflows.
fn base_amount(side: OrderAction, level: &Level) -> Option<Amount> {
    match side {
        OrderAction::Sell => Some(level.amount),
        // quote amount times base-per-quote price
        OrderAction::Buy => level.amount.notional(level.price),
    }
}

/// Replace `resting` with `target` where tolerances require it.
fn reconcile_side(
    resting: &mut Vec<Level>,
    target: &[Level],
    tolerances: Tolerances,
    summary: &mut ReconcileSummary,
) {
    let mut next = Vec::with_capacity(target.len());
    for (i, level) in target.iter().enumerate() {
        match resting.get(i) {
            Some(old) if !tolerances.needs_update(old, level) => {
                summary.kept += 1;
                next.push(*old);
            }
            Some(_) => {
                summary.cancelled += 1;
                summary.placed += 1;
                next.push(*level);
            }
            None => {
                summary.placed += 1;
                next.push(*level);
            }
        }
    }
    summary.cancelled += resting.len().saturating_sub(target.len());
    *resting = next;
}

impl PaperState {
    /// Fill every resting offer that crosses the external book.
    fn match_offers(&mut self) {
        let top_bid = self.book.top_bid();
        let top_ask = self.book.top_ask();

        let mut remaining = Vec::with_capacity(self.asks.len());
        for offer in self.asks.drain(..) {
            let crossed = matches!(top_bid, Some(bid) if bid >= offer.price)
                && offer.amount <= self.balances.base;
            let quote = offer
                .amount
                .notional(offer.price)
                .and_then(|gained| self.balances.quote.checked_add(gained));
            match quote {
                Some(quote) if crossed => {
                    self.balances.base = self.balances.base - offer.amount;
                    self.balances.quote = quote;
                    self.fills
                        .push(Trade::new(OrderAction::Sell, offer.price, offer.amount));
                }
                _ => remaining.push(offer),
            }
        }
        self.asks = remaining;

        let mut remaining = Vec::with_capacity(self.bids.len());
        for offer in self.bids.drain(..) {
            // pair price of a buy-side offer is 1 / offer price
            let pair_price = offer.price.inverse();
            let bought = offer.amount.notional(offer.price);
            let base = bought.and_then(|amount| self.balances.base.checked_add(amount));
            match (top_ask, pair_price, bought, base) {
                (Some(ask), Some(price), Some(base_amount), Some(base))
                    if ask <= price && offer.amount <= self.balances.quote =>
                {
                    self.balances.quote = self.balances.quote - offer.amount;
                    self.balances.base = base;
                    self.fills.push(Trade::new(OrderAction::Buy, price, base_amount));
                }
                _ => remaining.push(offer),
            }
        }
        self.bids = remaining;
    }
}

impl OrderBookSource for PaperVenue {
    fn order_constraints(&self, _pair: &TradingPair) -> OrderConstraints {
        self.constraints.clone()
    }

    fn get_order_book<'a>(
        &'a self,
        _pair: &'a TradingPair,
        depth: usize,
    ) -> BoxFuture<'a, ExecutionResult<OrderBook>> {
        Box::pin(async move { Ok(self.state.lock().book.truncated(depth)) })
    }
}

impl ExecutionVenue for PaperVenue {
    fn balances<'a>(&'a self, _pair: &'a TradingPair) -> BoxFuture<'a, ExecutionResult<Balances>> {
        Box::pin(async move { Ok(self.state.lock().balances) })
    }

    fn reconcile<'a>(
        &'a self,
        pair: &'a TradingPair,
        quotes: &'a [SideQuotes],
        tolerances: Tolerances,
    ) -> BoxFuture<'a, ExecutionResult<ReconcileSummary>> {
        Box::pin(async move {
            let mut state = self.state.lock();
            let mut summary = ReconcileSummary::default();

            for side in quotes {
                if side.selling != pair.base && side.selling != pair.quote {
                    return Err(ExecutionError::Placement(format!(
                        "{} is not traded on {pair}",
                        side.selling
                    )));
                }
                let accepted: Vec<Level> = side
                    .levels
                    .iter()
                    .copied()
                    .filter(|level| {
                        let ok = base_amount(side.side, level)
                            .is_some_and(|base| self.constraints.accepts(base));
                        if !ok {
                            debug!(side = %side.side, %level, "Level outside volume limits, skipped");
                        }
                        ok
                    })
                    .collect();
                let resting = match side.side {
                    OrderAction::Buy => &mut state.bids,
                    OrderAction::Sell => &mut state.asks,
                };
                reconcile_side(resting, &accepted, tolerances, &mut summary);
            }

            state.match_offers();
            debug!(
                %pair,
                placed = summary.placed,
                kept = summary.kept,
                cancelled = summary.cancelled,
                "Offers reconciled"
            );
            Ok(summary)
        })
    }

    fn take_fills<'a>(&'a self, _pair: &'a TradingPair) -> BoxFuture<'a, ExecutionResult<Vec<Trade>>> {
        Box::pin(async move { Ok(std::mem::take(&mut self.state.lock().fills)) })
    }

    fn cancel_all<'a>(&'a self, pair: &'a TradingPair) -> BoxFuture<'a, ExecutionResult<usize>> {
        Box::pin(async move {
            let mut state = self.state.lock();
            let cancelled = state.bids.len() + state.asks.len();
            state.bids.clear();
            state.asks.clear();
            info!(%pair, cancelled, "Cancelled all offers");
            Ok(cancelled)
        })
    }
}
