//! Level providers and strategy composition for the SDEX market-making agent.
//!
//! Provides the decision logic of the agent:
//! - `RateOffset`: manual correction of the center price
//! - Level providers: static spread, dynamic spread and stop-limit
//! - `ComposeStrategy`: buy and sell sides with shared fill routing
//! - Factories building strategies from TOML configuration
//!
//! # Architecture
//!
//! ```text
//! FeedPair ─▶ RateOffset ─▶ LevelProvider.get_levels() ─▶ Vec<Level>
//!                                  ▲
//! Trade ─▶ ComposeStrategy ─▶ FillHandler.handle_fill()   (both sides)
//! ```

pub mod config;
pub mod dynamic_spread;
pub mod error;
pub mod execution;
pub mod factory;
pub mod provider;
pub mod rate_offset;
pub mod static_spread;
pub mod stop_limit;
pub mod strategy;

pub use config::{BuySellConfig, DynamicSpreadConfig, StaticLevel, StopLimitConfig, StrategyConfig};
pub use dynamic_spread::{DynamicSpreadLevelProvider, DynamicSpreadParams};
pub use error::{
    ExecutionError, ExecutionResult, ProviderError, ProviderResult, StrategyError, StrategyResult,
};
pub use execution::{MockOrderBookSource, OrderBookSource};
pub use factory::{
    make_buysell_strategy, make_dynamic_spread_strategy, make_stop_limit_strategy, make_strategy,
};
pub use provider::{FillHandler, LevelProvider, LevelsOutcome};
pub use rate_offset::RateOffset;
pub use static_spread::StaticSpreadLevelProvider;
pub use stop_limit::StopLimitLevelProvider;
pub use strategy::{ComposeStrategy, SideQuotes, SideStrategy, Strategy, StrategyCycle, Tolerances};
