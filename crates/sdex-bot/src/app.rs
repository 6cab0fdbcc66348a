//! Main application orchestration.
//!
//! One trading cycle:
//! - Read balances from the venue
//! - Ask the strategy for this cycle's levels
//! - Reconcile resting offers against the levels
//! - Route fills back to the strategy

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{error, info, warn};

use sdex_core::TradingPair;
use sdex_levels::{make_strategy, OrderBookSource, Strategy, StrategyCycle};
use sdex_telemetry::{Alert, LogAlert, Metrics};

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::venue::{ExecutionVenue, PaperVenue};

/// Result of a single trading cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Levels were quoted; the loop continues.
    Quoted { levels: usize, fills: usize },
    /// The strategy finished its task.
    Completed,
}

/// Why the trading loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The strategy completed.
    Completed,
    /// Shutdown was requested.
    Interrupted,
}

/// Main application.
pub struct Application {
    pair: TradingPair,
    strategy: Box<dyn Strategy>,
    venue: Arc<dyn ExecutionVenue>,
    alert: Arc<dyn Alert>,
    tick_interval: Duration,
}

impl Application {
    /// Build the paper venue and the configured strategy.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;
        let pair = config.trading_pair()?;

        let venue = Arc::new(PaperVenue::new(
            config.venue.constraints(),
            (&config.venue.balances).into(),
            config.venue.order_book(),
        ));
        let source: Arc<dyn OrderBookSource> = venue.clone();
        let strategy = make_strategy(source, &pair, &config.strategy)?;

        info!(
            %pair,
            strategy = config.strategy.name(),
            tick_interval_ms = config.tick_interval_ms,
            "Application configured"
        );
        Ok(Self::with_parts(
            pair,
            strategy,
            venue,
            Arc::new(LogAlert),
            Duration::from_millis(config.tick_interval_ms),
        ))
    }

    pub fn with_parts(
        pair: TradingPair,
        strategy: Box<dyn Strategy>,
        venue: Arc<dyn ExecutionVenue>,
        alert: Arc<dyn Alert>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            pair,
            strategy,
            venue,
            alert,
            tick_interval,
        }
    }

    /// Run one trading cycle.
    pub async fn run_cycle(&mut self) -> AppResult<CycleOutcome> {
        let balances = staged("balances", self.venue.balances(&self.pair).await)?;

        let quotes = match staged("levels", self.strategy.get_levels(balances).await)? {
            StrategyCycle::Complete => return Ok(CycleOutcome::Completed),
            StrategyCycle::Quotes(quotes) => quotes,
        };

        let mut levels = 0;
        for side in &quotes {
            Metrics::levels_quoted(&side.side.to_string(), side.levels.len());
            levels += side.levels.len();
        }

        let tolerances = self.strategy.tolerances();
        staged(
            "reconcile",
            self.venue.reconcile(&self.pair, &quotes, tolerances).await,
        )?;

        let fills = staged("fills", self.venue.take_fills(&self.pair).await)?;

        for trade in &fills {
            Metrics::fill(&trade.action.to_string());
            info!(pair = %self.pair, %trade, "Fill");
            // a failed fill handler must not stop the remaining fills
            if let Err(e) = self.strategy.handle_fill(trade) {
                error!(pair = %self.pair, %trade, error = %e, "Fill handling failed");
                self.raise_alert(
                    "fill handling failed",
                    json!({ "pair": self.pair.to_string(), "trade": trade.to_string(), "error": e.to_string() }),
                );
            }
        }

        Metrics::cycle_completed();
        Ok(CycleOutcome::Quoted {
            levels,
            fills: fills.len(),
        })
    }

    /// Tick until the strategy completes or Ctrl-C is received.
    pub async fn run(mut self) -> AppResult<LoopExit> {
        info!(pair = %self.pair, "Entering trading loop");
        let mut ticker = tokio::time::interval(self.tick_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.run_cycle().await {
                        Ok(CycleOutcome::Completed) => {
                            Metrics::strategy_complete();
                            let cancelled = self.venue.cancel_all(&self.pair).await?;
                            info!(pair = %self.pair, cancelled, "Strategy complete, leaving trading loop");
                            return Ok(LoopExit::Completed);
                        }
                        Ok(CycleOutcome::Quoted { .. }) => {}
                        Err(e) => {
                            error!(pair = %self.pair, error = %e, "Trading cycle failed");
                            self.raise_alert(
                                "trading cycle failed",
                                json!({ "pair": self.pair.to_string(), "error": e.to_string() }),
                            );
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown requested");
                    return Ok(LoopExit::Interrupted);
                }
            }
        }
    }

    fn raise_alert(&self, description: &str, details: serde_json::Value) {
        if let Err(e) = self.alert.trigger(description, details) {
            warn!(error = %e, "Alert delivery failed");
        }
    }
}

/// Count a failure of `stage` before propagating it.
fn staged<T, E>(stage: &str, result: Result<T, E>) -> Result<T, E> {
    if result.is_err() {
        Metrics::cycle_error(stage);
    }
    result
}
