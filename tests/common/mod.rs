#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use tickpilot::domain::config::EngineConfig;
use tickpilot::domain::error::TickpilotError;
use tickpilot::domain::event::EngineEvent;
use tickpilot::domain::tick::{ForecastVector, PriceTick};
use tickpilot::ports::event_port::EventPort;
use tickpilot::ports::feed_port::FeedPort;

/// Engine parameters small enough to drive entries from short synthetic
/// price paths.
pub fn scenario_config() -> EngineConfig {
    EngineConfig {
        initial_balance: 10_000.0,
        maker_fee: 0.0002,
        taker_fee: 0.0005,
        stop_loss_pct: 0.02,
        take_profit_pct: 0.04,
        min_history_for_decisions: 11,
        sma_short_window: 3,
        sma_long_window: 10,
        rsi_window: 3,
        rsi_oversold: 60.0,
        rsi_overbought: 75.0,
        bollinger_window: 5,
        bollinger_k: 1.0,
        forecast_horizon: 3,
        decision_horizon: 3,
        forecast_std_multiplier: 1.0,
    }
}

pub fn ts(minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
        + chrono::Duration::minutes(minute as i64)
}

pub fn tick(minute: u32, price: f64) -> PriceTick {
    PriceTick {
        timestamp: ts(minute),
        price,
    }
}

pub fn flat_forecast(value: f64) -> ForecastVector {
    ForecastVector::new(vec![value; 3])
}

/// Ten-tick uptrend (90 to 108) then a dip to 99 that lands below the lower
/// Bollinger band while the short SMA still leads the long one.
pub fn uptrend_then_dip() -> Vec<f64> {
    let mut prices: Vec<f64> = (0..10).map(|i| 90.0 + 2.0 * i as f64).collect();
    prices.push(99.0);
    prices
}

/// Mirror image: downtrend (110 to 92) then a pop to 101 above the upper
/// band while the short SMA trails.
pub fn downtrend_then_pop() -> Vec<f64> {
    let mut prices: Vec<f64> = (0..10).map(|i| 110.0 - 2.0 * i as f64).collect();
    prices.push(101.0);
    prices
}

pub struct MockFeedPort {
    pub rows: Vec<(PriceTick, ForecastVector)>,
}

impl MockFeedPort {
    pub fn from_prices(prices: &[f64], forecast_value: f64) -> Self {
        let rows = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| (tick(i as u32, price), flat_forecast(forecast_value)))
            .collect();
        Self { rows }
    }
}

impl FeedPort for MockFeedPort {
    fn ticks(&self) -> Result<Vec<(PriceTick, ForecastVector)>, TickpilotError> {
        Ok(self.rows.clone())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<EngineEvent>,
}

impl EventPort for RecordingSink {
    fn emit(&mut self, event: &EngineEvent) {
        self.events.push(event.clone());
    }
}

impl RecordingSink {
    pub fn opened(&self) -> Vec<&EngineEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, EngineEvent::TradeOpened { .. }))
            .collect()
    }

    pub fn closed(&self) -> Vec<&EngineEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, EngineEvent::TradeClosed { .. }))
            .collect()
    }

    pub fn valuations(&self) -> Vec<&EngineEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, EngineEvent::ValuationUpdate { .. }))
            .collect()
    }
}
