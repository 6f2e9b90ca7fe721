//! Engine configuration: named parameters validated once at construction.

use crate::domain::error::TickpilotError;
use crate::ports::config_port::ConfigPort;

/// Immutable engine parameters. Construct via [`EngineConfig::from_config`]
/// (which validates) or build literally and call [`EngineConfig::validate`]
/// before handing it to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub initial_balance: f64,
    pub maker_fee: f64,
    pub taker_fee: f64,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub min_history_for_decisions: usize,
    pub sma_short_window: usize,
    pub sma_long_window: usize,
    pub rsi_window: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub bollinger_window: usize,
    pub bollinger_k: f64,
    pub forecast_horizon: usize,
    pub decision_horizon: usize,
    pub forecast_std_multiplier: f64,
}

impl EngineConfig {
    /// Read every parameter from the `[engine]`, `[indicators]` and
    /// `[forecast]` sections and validate the result.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TickpilotError> {
        let built = Self {
            initial_balance: config.get_double("engine", "initial_balance", 10_000.0),
            maker_fee: config.get_double("engine", "maker_fee", 0.0002),
            taker_fee: config.get_double("engine", "taker_fee", 0.0005),
            stop_loss_pct: config.get_double("engine", "stop_loss_pct", 0.02),
            take_profit_pct: config.get_double("engine", "take_profit_pct", 0.04),
            min_history_for_decisions: config.get_int("engine", "min_history_for_decisions", 30)
                as usize,
            sma_short_window: config.get_int("indicators", "sma_short_window", 7) as usize,
            sma_long_window: config.get_int("indicators", "sma_long_window", 25) as usize,
            rsi_window: config.get_int("indicators", "rsi_window", 14) as usize,
            rsi_oversold: config.get_double("indicators", "rsi_oversold", 30.0),
            rsi_overbought: config.get_double("indicators", "rsi_overbought", 70.0),
            bollinger_window: config.get_int("indicators", "bollinger_window", 20) as usize,
            bollinger_k: config.get_double("indicators", "bollinger_k", 2.0),
            forecast_horizon: config.get_int("forecast", "horizon", 16) as usize,
            decision_horizon: config.get_int("forecast", "decision_horizon", 4) as usize,
            forecast_std_multiplier: config.get_double("forecast", "std_multiplier", 1.0),
        };
        built.validate()?;
        Ok(built)
    }

    /// Check every field range. Runs before any tick is processed.
    pub fn validate(&self) -> Result<(), TickpilotError> {
        fn invalid(section: &str, key: &str, reason: &str) -> TickpilotError {
            TickpilotError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: reason.to_string(),
            }
        }

        if self.initial_balance <= 0.0 {
            return Err(invalid("engine", "initial_balance", "must be positive"));
        }
        if !(0.0..1.0).contains(&self.maker_fee) {
            return Err(invalid("engine", "maker_fee", "must be in [0, 1)"));
        }
        if !(0.0..1.0).contains(&self.taker_fee) {
            return Err(invalid("engine", "taker_fee", "must be in [0, 1)"));
        }
        if self.stop_loss_pct <= 0.0 || self.stop_loss_pct >= 1.0 {
            return Err(invalid("engine", "stop_loss_pct", "must be in (0, 1)"));
        }
        if self.take_profit_pct <= 0.0 || self.take_profit_pct >= 1.0 {
            return Err(invalid("engine", "take_profit_pct", "must be in (0, 1)"));
        }
        if self.min_history_for_decisions < 1 {
            return Err(invalid(
                "engine",
                "min_history_for_decisions",
                "must be at least 1",
            ));
        }
        if self.sma_short_window < 1 {
            return Err(invalid("indicators", "sma_short_window", "must be at least 1"));
        }
        if self.sma_short_window >= self.sma_long_window {
            return Err(invalid(
                "indicators",
                "sma_long_window",
                "must be greater than sma_short_window",
            ));
        }
        if self.rsi_window < 1 {
            return Err(invalid("indicators", "rsi_window", "must be at least 1"));
        }
        if self.rsi_oversold <= 0.0 || self.rsi_oversold >= 100.0 {
            return Err(invalid("indicators", "rsi_oversold", "must be in (0, 100)"));
        }
        if self.rsi_overbought <= 0.0 || self.rsi_overbought >= 100.0 {
            return Err(invalid("indicators", "rsi_overbought", "must be in (0, 100)"));
        }
        if self.rsi_oversold >= self.rsi_overbought {
            return Err(invalid(
                "indicators",
                "rsi_overbought",
                "must be greater than rsi_oversold",
            ));
        }
        if self.bollinger_window < 1 {
            return Err(invalid("indicators", "bollinger_window", "must be at least 1"));
        }
        if self.bollinger_k < 0.0 {
            return Err(invalid("indicators", "bollinger_k", "must be non-negative"));
        }
        if self.forecast_horizon < 1 {
            return Err(invalid("forecast", "horizon", "must be at least 1"));
        }
        if self.decision_horizon < 1 || self.decision_horizon > self.forecast_horizon {
            return Err(invalid(
                "forecast",
                "decision_horizon",
                "must be between 1 and the forecast horizon",
            ));
        }
        if self.forecast_std_multiplier < 0.0 {
            return Err(invalid("forecast", "std_multiplier", "must be non-negative"));
        }
        Ok(())
    }

    /// Small, valid parameter set for unit tests.
    #[cfg(test)]
    pub fn sample() -> Self {
        Self {
            initial_balance: 10_000.0,
            maker_fee: 0.0002,
            taker_fee: 0.0005,
            stop_loss_pct: 0.02,
            take_profit_pct: 0.04,
            min_history_for_decisions: 5,
            sma_short_window: 2,
            sma_long_window: 4,
            rsi_window: 3,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            bollinger_window: 4,
            bollinger_k: 2.0,
            forecast_horizon: 4,
            decision_horizon: 3,
            forecast_std_multiplier: 1.0,
        }
    }
}
