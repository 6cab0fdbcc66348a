//! Integration tests for sdex-bot.
//!
//! These tests drive the trading loop against the paper venue:
//! - Stop-limit trigger, fill and completion
//! - Fill routing and alerting
//! - Loop exit on completion

pub mod common;
