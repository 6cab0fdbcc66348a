//! Structured logging, metrics and alerting for the SDEX market-making agent.
//!
//! - Structured logging with tracing (JSON in production)
//! - Prometheus counters and gauges for the trading loop
//! - `Alert` capability fired on cycle errors

pub mod alert;
pub mod error;
pub mod logging;
pub mod metrics;

pub use alert::{Alert, LogAlert, RecordingAlert};
pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
