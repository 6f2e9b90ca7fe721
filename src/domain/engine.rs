//! Tick pipeline: indicator update, decision, account mutation, valuation.
//!
//! Each tick runs to completion before the next one is looked at. Once a
//! transition is committed the fee and balance update land together; there is
//! no state where a fee was charged without the matching balance change.

use crate::domain::account::{Account, OpenResult, Side};
use crate::domain::config::EngineConfig;
use crate::domain::error::TickpilotError;
use crate::domain::event::EngineEvent;
use crate::domain::indicators::RollingIndicatorEngine;
use crate::domain::policy::{self, Signal};
use crate::domain::tick::{ForecastVector, PriceTick};
use crate::domain::valuation::{AssetValuationTracker, Valuation, ValuePoint};
use crate::ports::event_port::EventPort;

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub signal: Signal,
    pub valuation: Valuation,
}

/// Owns the account, indicator window and value history for one instrument.
/// External readers only get shared references and slices.
#[derive(Debug)]
pub struct TradingEngine {
    config: EngineConfig,
    indicators: RollingIndicatorEngine,
    account: Account,
    tracker: AssetValuationTracker,
    ticks_seen: usize,
}

impl TradingEngine {
    /// Build an engine. Rejects an invalid config before any tick runs.
    pub fn new(config: EngineConfig) -> Result<Self, TickpilotError> {
        config.validate()?;
        let indicators = RollingIndicatorEngine::new(&config);
        let account = Account::new(config.initial_balance);
        Ok(Self {
            config,
            indicators,
            account,
            tracker: AssetValuationTracker::new(),
            ticks_seen: 0,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn value_history(&self) -> &[ValuePoint] {
        self.tracker.history()
    }

    pub fn ticks_seen(&self) -> usize {
        self.ticks_seen
    }

    /// Run one full tick: validate the forecast, update indicators, decide,
    /// apply at most one account transition, then value the account.
    ///
    /// A forecast shorter than the decision horizon aborts the tick before
    /// anything is touched.
    pub fn process_tick(
        &mut self,
        tick: &PriceTick,
        forecast: &ForecastVector,
        sink: &mut dyn EventPort,
    ) -> Result<TickOutcome, TickpilotError> {
        if forecast.len() < self.config.decision_horizon {
            return Err(TickpilotError::InsufficientForecastHorizon {
                have: forecast.len(),
                need: self.config.decision_horizon,
            });
        }

        self.indicators.push(tick.price);
        self.ticks_seen += 1;
        let snapshot = self.indicators.snapshot();

        let signal = policy::evaluate(
            tick.price,
            forecast,
            &snapshot,
            self.account.position(),
            self.ticks_seen,
            &self.config,
        )?;

        match signal {
            Signal::OpenLong => self.apply_open(Side::Long, tick, sink),
            Signal::OpenShort => self.apply_open(Side::Short, tick, sink),
            Signal::Close => {
                let fill = self.account.close(tick.price, &self.config);
                sink.emit(&EngineEvent::TradeClosed {
                    price: fill.price,
                    contracts: fill.contracts,
                    fee: fill.fee,
                    profit_loss: fill.profit_loss,
                    timestamp: tick.timestamp,
                });
            }
            Signal::Hold => {}
        }

        let valuation = self.tracker.record(&self.account, tick.price, tick.timestamp);
        sink.emit(&EngineEvent::ValuationUpdate {
            price: tick.price,
            cash_balance: self.account.cash_balance(),
            contracts: self.account.position().contracts(),
            position: self.account.position().side(),
            unrealized_pnl: valuation.unrealized_pnl,
            total_value: valuation.total_value,
            timestamp: tick.timestamp,
        });

        Ok(TickOutcome { signal, valuation })
    }

    fn apply_open(&mut self, side: Side, tick: &PriceTick, sink: &mut dyn EventPort) {
        match self.account.open(side, tick.price, tick.timestamp, &self.config) {
            OpenResult::Opened(fill) => sink.emit(&EngineEvent::TradeOpened {
                side: fill.side,
                price: fill.price,
                contracts: fill.contracts,
                fee: fill.fee,
                timestamp: tick.timestamp,
            }),
            // A balance too small to trade is a quiet hold, not a fault.
            OpenResult::InsufficientBalance => {}
        }
    }
}
