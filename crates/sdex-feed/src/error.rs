//! Feed error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Unknown feed kind: {0}")]
    UnknownKind(String),

    #[error("Invalid feed value: {0}")]
    InvalidValue(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Zero price from {0}, cannot derive center price")]
    ZeroPrice(String),

    #[error("Center price overflows: {a} / {b}")]
    Overflow { a: String, b: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type FeedResult<T> = Result<T, FeedError>;
