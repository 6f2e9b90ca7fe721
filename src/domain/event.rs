//! Structured events emitted to the host's sink.

use chrono::NaiveDateTime;

use crate::domain::account::Side;

/// One event per account mutation, plus one valuation update per tick.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    TradeOpened {
        side: Side,
        price: f64,
        contracts: f64,
        fee: f64,
        timestamp: NaiveDateTime,
    },
    TradeClosed {
        price: f64,
        contracts: f64,
        fee: f64,
        profit_loss: f64,
        timestamp: NaiveDateTime,
    },
    ValuationUpdate {
        price: f64,
        cash_balance: f64,
        contracts: f64,
        /// `None` when flat.
        position: Option<Side>,
        unrealized_pnl: f64,
        total_value: f64,
        timestamp: NaiveDateTime,
    },
}
