//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] sdex_core::CoreError),

    #[error("Strategy error: {0}")]
    Strategy(#[from] sdex_levels::StrategyError),

    #[error("Execution error: {0}")]
    Execution(#[from] sdex_levels::ExecutionError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] sdex_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
