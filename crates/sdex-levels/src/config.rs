//! Strategy configuration.
//!
//! Keys follow the upper-case naming of the agent's TOML strategy files
//! (`PRICE_TOLERANCE`, `LEVELS`, ...). Values are only checked structurally.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{StrategyError, StrategyResult};
use crate::rate_offset::RateOffset;

/// One configured spread tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct StaticLevel {
    /// Fractional distance from the center price.
    pub spread: Decimal,
    /// Fraction of `AMOUNT_OF_A_BASE` to quote at this tier.
    pub amount: Decimal,
}

impl StaticLevel {
    pub fn new(spread: Decimal, amount: Decimal) -> Self {
        Self { spread, amount }
    }
}

/// Buy/sell strategy: mirrored static spreads on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct BuySellConfig {
    #[serde(default)]
    pub price_tolerance: Decimal,
    #[serde(default)]
    pub amount_tolerance: Decimal,
    #[serde(default)]
    pub rate_offset_percent: Decimal,
    #[serde(default)]
    pub rate_offset: Decimal,
    #[serde(default)]
    pub rate_offset_percent_first: bool,
    /// Size of the order to keep on either side.
    pub amount_of_a_base: Decimal,
    pub data_type_a: String,
    pub data_feed_a_url: String,
    pub data_type_b: String,
    pub data_feed_b_url: String,
    pub levels: Vec<StaticLevel>,
}

impl BuySellConfig {
    /// Offset for the sell side; the buy side uses [`RateOffset::inverted`].
    pub fn rate_offset(&self) -> RateOffset {
        RateOffset::new(
            self.rate_offset_percent,
            self.rate_offset,
            self.rate_offset_percent_first,
        )
    }

    pub fn validate(&self) -> StrategyResult<()> {
        non_negative("PRICE_TOLERANCE", self.price_tolerance)?;
        non_negative("AMOUNT_TOLERANCE", self.amount_tolerance)?;
        non_negative("AMOUNT_OF_A_BASE", self.amount_of_a_base)?;
        if self.levels.is_empty() {
            return Err(StrategyError::Config("LEVELS must not be empty".into()));
        }
        for (i, level) in self.levels.iter().enumerate() {
            non_negative(&format!("LEVELS[{i}].AMOUNT"), level.amount)?;
            if level.spread <= Decimal::NEGATIVE_ONE {
                return Err(StrategyError::Config(format!(
                    "LEVELS[{i}].SPREAD must be greater than -1, got {}",
                    level.spread
                )));
            }
        }
        Ok(())
    }
}

/// Buy/sell strategy whose levels react to fills and balances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct DynamicSpreadConfig {
    #[serde(flatten)]
    pub spread: BuySellConfig,
    /// Fraction of the center price a tier must clear past the last counter fill.
    pub carry_back_trigger: Decimal,
    /// Sell side throttles when its base balance drops below this.
    pub low_balance_target: Decimal,
    /// Buy side throttles when its quote balance rises above this.
    pub high_balance_target: Decimal,
    /// Fraction of `AMOUNT_OF_A_BASE` removed from each tier when throttling.
    #[serde(default)]
    pub amount_reduce: Decimal,
}

impl DynamicSpreadConfig {
    pub fn validate(&self) -> StrategyResult<()> {
        self.spread.validate()?;
        non_negative("CARRY_BACK_TRIGGER", self.carry_back_trigger)?;
        non_negative("AMOUNT_REDUCE", self.amount_reduce)?;
        Ok(())
    }
}

/// One-shot stop-limit sell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct StopLimitConfig {
    #[serde(default)]
    pub price_tolerance: Decimal,
    #[serde(default)]
    pub amount_tolerance: Decimal,
    pub amount_of_a_base: Decimal,
    /// Trigger once the top bid is at or below this price.
    pub stop_price: Decimal,
    /// Price of the order placed once triggered.
    pub limit_price: Decimal,
}

impl StopLimitConfig {
    pub fn validate(&self) -> StrategyResult<()> {
        non_negative("PRICE_TOLERANCE", self.price_tolerance)?;
        non_negative("AMOUNT_TOLERANCE", self.amount_tolerance)?;
        positive("AMOUNT_OF_A_BASE", self.amount_of_a_base)?;
        positive("STOP_PRICE", self.stop_price)?;
        positive("LIMIT_PRICE", self.limit_price)?;
        Ok(())
    }
}

/// Strategy selection, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    Buysell(BuySellConfig),
    DynamicSpread(DynamicSpreadConfig),
    StopLimit(StopLimitConfig),
}

impl StrategyConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Buysell(_) => "buysell",
            Self::DynamicSpread(_) => "dynamic_spread",
            Self::StopLimit(_) => "stop_limit",
        }
    }

    pub fn validate(&self) -> StrategyResult<()> {
        match self {
            Self::Buysell(c) => c.validate(),
            Self::DynamicSpread(c) => c.validate(),
            Self::StopLimit(c) => c.validate(),
        }
    }
}

fn non_negative(field: &str, value: Decimal) -> StrategyResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(StrategyError::Config(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(())
}

fn positive(field: &str, value: Decimal) -> StrategyResult<()> {
    if value <= Decimal::ZERO {
        return Err(StrategyError::Config(format!(
            "{field} must be positive, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const BUYSELL_TOML: &str = r#"
PRICE_TOLERANCE = 0.001
AMOUNT_TOLERANCE = 0.001
RATE_OFFSET_PERCENT = 0.0
RATE_OFFSET = 0.0
RATE_OFFSET_PERCENT_FIRST = true
AMOUNT_OF_A_BASE = 10.0
DATA_TYPE_A = "fixed"
DATA_FEED_A_URL = "1.0"
DATA_TYPE_B = "fixed"
DATA_FEED_B_URL = "0.1"

[[LEVELS]]
SPREAD = 0.0010
AMOUNT = 1.0

[[LEVELS]]
SPREAD = 0.0015
AMOUNT = 1.0
"#;

    #[test]
    fn test_buysell_parse() {
        let config: BuySellConfig = toml::from_str(BUYSELL_TOML).unwrap();
        assert_eq!(config.price_tolerance, dec!(0.001));
        assert_eq!(config.amount_of_a_base, dec!(10));
        assert_eq!(config.data_feed_b_url, "0.1");
        assert_eq!(config.levels.len(), 2);
        assert_eq!(config.levels[1], StaticLevel::new(dec!(0.0015), dec!(1)));
        assert!(config.rate_offset().is_noop());
        config.validate().unwrap();
    }

    #[test]
    fn test_buysell_defaults() {
        let toml_str = r#"
AMOUNT_OF_A_BASE = 5
DATA_TYPE_A = "fixed"
DATA_FEED_A_URL = "1"
DATA_TYPE_B = "fixed"
DATA_FEED_B_URL = "1"
LEVELS = [{ SPREAD = 0.01, AMOUNT = 1 }]
"#;
        let config: BuySellConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.price_tolerance, Decimal::ZERO);
        assert!(!config.rate_offset_percent_first);
    }

    #[test]
    fn test_dynamic_spread_parse() {
        let toml_str = format!(
            "{}\nCARRY_BACK_TRIGGER = 0.01\nLOW_BALANCE_TARGET = 100\nHIGH_BALANCE_TARGET = 1000\nAMOUNT_REDUCE = 0.5\n",
            BUYSELL_TOML.split("[[LEVELS]]").next().unwrap()
        ) + "LEVELS = [{ SPREAD = 0.01, AMOUNT = 1 }]\n";
        let config: DynamicSpreadConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.carry_back_trigger, dec!(0.01));
        assert_eq!(config.amount_reduce, dec!(0.5));
        assert_eq!(config.spread.amount_of_a_base, dec!(10));
        config.validate().unwrap();
    }

    #[test]
    fn test_strategy_config_tagged() {
        let toml_str = r#"
kind = "stop_limit"
AMOUNT_OF_A_BASE = 100
STOP_PRICE = 0.09
LIMIT_PRICE = 0.085
"#;
        let config: StrategyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.name(), "stop_limit");
        match config {
            StrategyConfig::StopLimit(c) => {
                assert_eq!(c.stop_price, dec!(0.09));
                assert_eq!(c.limit_price, dec!(0.085));
            }
            other => panic!("unexpected config {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_empty_levels() {
        let mut config: BuySellConfig = toml::from_str(BUYSELL_TOML).unwrap();
        config.levels.clear();
        assert!(matches!(config.validate(), Err(StrategyError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let mut config: BuySellConfig = toml::from_str(BUYSELL_TOML).unwrap();
        config.amount_of_a_base = dec!(-1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_reduce_is_structural() {
        let mut config = DynamicSpreadConfig {
            spread: toml::from_str(BUYSELL_TOML).unwrap(),
            carry_back_trigger: dec!(0.01),
            low_balance_target: dec!(0),
            high_balance_target: dec!(0),
            amount_reduce: dec!(2),
        };
        // larger than a tier is allowed, the provider clamps at zero
        config.validate().unwrap();

        config.amount_reduce = dec!(-0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_stop_limit_validate() {
        let config = StopLimitConfig {
            price_tolerance: dec!(0),
            amount_tolerance: dec!(0),
            amount_of_a_base: dec!(1),
            stop_price: dec!(0),
            limit_price: dec!(1),
        };
        assert!(config.validate().is_err());
    }
}
