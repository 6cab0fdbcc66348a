//! SDEX market-making agent.
//!
//! Wires the configured strategy to an execution venue and drives it:
//! - TOML configuration (pair, strategy, paper venue)
//! - Trading loop with tolerance-based offer reconciliation
//! - Fill routing back to the strategy
//! - Alerting on failed cycles

pub mod app;
pub mod config;
pub mod error;
pub mod venue;

pub use app::{Application, CycleOutcome, LoopExit};
pub use config::{AppConfig, BalancesConfig, VenueConfig};
pub use error::{AppError, AppResult};
pub use venue::{ExecutionVenue, PaperVenue, ReconcileSummary};
