//! Prometheus metrics for the trading loop.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. Registration only fails on duplicate
//! metric names, which is a programming error caught at first use.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge, register_gauge_vec, register_int_counter, CounterVec,
    Gauge, GaugeVec, IntCounter,
};

/// Completed trading cycles.
pub static CYCLES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("sdex_cycles_total", "Completed trading cycles").unwrap()
});

/// Failed cycles.
/// Labels: stage (balances/levels/reconcile/fills)
pub static CYCLE_ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "sdex_cycle_errors_total",
        "Failed trading cycles by stage",
        &["stage"]
    )
    .unwrap()
});

/// Levels quoted in the latest cycle.
/// Labels: side (buy/sell)
pub static LEVELS_QUOTED: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "sdex_levels_quoted",
        "Levels quoted in the latest cycle",
        &["side"]
    )
    .unwrap()
});

/// Fills routed to the strategy.
/// Labels: side (buy/sell)
pub static FILLS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!("sdex_fills_total", "Fills routed to the strategy", &["side"]).unwrap()
});

/// Alerts fired.
pub static ALERTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("sdex_alerts_total", "Alerts fired").unwrap()
});

/// Whether the strategy has completed (1) or is still running (0).
pub static STRATEGY_COMPLETE: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "sdex_strategy_complete",
        "Strategy completion state (1=complete)"
    )
    .unwrap()
});

/// Convenience wrapper over the static metrics.
pub struct Metrics;

impl Metrics {
    pub fn cycle_completed() {
        CYCLES_TOTAL.inc();
    }

    pub fn cycle_error(stage: &str) {
        CYCLE_ERRORS_TOTAL.with_label_values(&[stage]).inc();
    }

    pub fn levels_quoted(side: &str, count: usize) {
        LEVELS_QUOTED.with_label_values(&[side]).set(count as f64);
    }

    pub fn fill(side: &str) {
        FILLS_TOTAL.with_label_values(&[side]).inc();
    }

    pub fn alert_fired() {
        ALERTS_TOTAL.inc();
    }

    pub fn strategy_complete() {
        STRATEGY_COMPLETE.set(1.0);
    }
}
