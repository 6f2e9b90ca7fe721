//! Entry/exit decision rules: fee-aware forecast edge plus indicator
//! confirmation, with hard risk limits.

use crate::domain::account::{Position, Side};
use crate::domain::config::EngineConfig;
use crate::domain::error::TickpilotError;
use crate::domain::indicators::IndicatorSnapshot;
use crate::domain::tick::ForecastVector;

/// What the policy wants done this tick. At most one transition per tick;
/// a reversal needs a `Close` tick followed by an `Open*` tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    OpenLong,
    OpenShort,
    Close,
    Hold,
}

/// Evaluate one tick.
///
/// Entries require the full indicator set and `min_history_for_decisions`
/// observed prices; anything undefined means `Hold`, never a numeric zero.
/// Exits check stop-loss/take-profit against the entry price on every tick,
/// indicator conditions only when the statistic is defined.
pub fn evaluate(
    price: f64,
    forecast: &ForecastVector,
    snapshot: &IndicatorSnapshot,
    position: &Position,
    ticks_seen: usize,
    config: &EngineConfig,
) -> Result<Signal, TickpilotError> {
    match position {
        Position::Flat => evaluate_entry(price, forecast, snapshot, ticks_seen, config),
        Position::Long(open) => Ok(evaluate_exit(
            Side::Long,
            price,
            open.entry_price,
            snapshot,
            config,
        )),
        Position::Short(open) => Ok(evaluate_exit(
            Side::Short,
            price,
            open.entry_price,
            snapshot,
            config,
        )),
    }
}

fn evaluate_entry(
    price: f64,
    forecast: &ForecastVector,
    snapshot: &IndicatorSnapshot,
    ticks_seen: usize,
    config: &EngineConfig,
) -> Result<Signal, TickpilotError> {
    if ticks_seen < config.min_history_for_decisions {
        return Ok(Signal::Hold);
    }
    let (Some(sma_short), Some(sma_long), Some(rsi), Some(upper), Some(lower)) = (
        snapshot.sma_short,
        snapshot.sma_long,
        snapshot.rsi,
        snapshot.bollinger_upper,
        snapshot.bollinger_lower,
    ) else {
        return Ok(Signal::Hold);
    };

    let forecast_mean = forecast.mean_over(config.decision_horizon)?;
    let forecast_std = forecast.stddev_over(config.decision_horizon)?;
    let edge_buffer = config.forecast_std_multiplier * forecast_std;
    let round_trip_fee = config.maker_fee + config.taker_fee;

    let long_edge = forecast_mean > price * (1.0 + round_trip_fee) + edge_buffer;
    let long_confirmed = price < lower && sma_short > sma_long && rsi < config.rsi_oversold;
    if long_edge && long_confirmed {
        return Ok(Signal::OpenLong);
    }

    let short_edge = forecast_mean < price * (1.0 - round_trip_fee) - edge_buffer;
    let short_confirmed = price > upper && sma_short < sma_long && rsi > config.rsi_overbought;
    if short_edge && short_confirmed {
        return Ok(Signal::OpenShort);
    }

    Ok(Signal::Hold)
}

fn evaluate_exit(
    side: Side,
    price: f64,
    entry_price: f64,
    snapshot: &IndicatorSnapshot,
    config: &EngineConfig,
) -> Signal {
    // Risk limits depend only on the entry price; they fire even while the
    // indicator windows are still warming up.
    let (stopped, took_profit) = match side {
        Side::Long => (
            price < entry_price * (1.0 - config.stop_loss_pct),
            price > entry_price * (1.0 + config.take_profit_pct),
        ),
        Side::Short => (
            price > entry_price * (1.0 + config.stop_loss_pct),
            price < entry_price * (1.0 - config.take_profit_pct),
        ),
    };
    if stopped || took_profit {
        return Signal::Close;
    }

    let trend_turned = match (snapshot.sma_short, snapshot.sma_long, side) {
        (Some(short), Some(long), Side::Long) => short < long,
        (Some(short), Some(long), Side::Short) => short > long,
        _ => false,
    };
    let momentum_exhausted = match (snapshot.rsi, side) {
        (Some(rsi), Side::Long) => rsi > config.rsi_overbought,
        (Some(rsi), Side::Short) => rsi < config.rsi_oversold,
        _ => false,
    };
    let band_breached = match side {
        Side::Long => snapshot.bollinger_upper.is_some_and(|upper| price > upper),
        Side::Short => snapshot.bollinger_lower.is_some_and(|lower| price < lower),
    };

    if trend_turned || momentum_exhausted || band_breached {
        Signal::Close
    } else {
        Signal::Hold
    }
}
