//! Per-tick account valuation and total-value history.

use chrono::NaiveDateTime;

use crate::domain::account::Account;

#[derive(Debug, Clone, PartialEq)]
pub struct ValuePoint {
    pub timestamp: NaiveDateTime,
    pub total_value: f64,
}

/// Valuation of the account at one price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    pub unrealized_pnl: f64,
    pub total_value: f64,
}

/// Appends one total-value point per tick. The history is unbounded;
/// trimming for display belongs to whatever consumes it.
#[derive(Debug, Clone, Default)]
pub struct AssetValuationTracker {
    history: Vec<ValuePoint>,
}

impl AssetValuationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value the account at `price` and append to the history.
    ///
    /// `total_value = cash + entry_notional + unrealized_pnl`: the escrowed
    /// entry notional (not the marked notional) keeps total value continuous
    /// across a zero-fee open or close at an unchanged price.
    pub fn record(
        &mut self,
        account: &Account,
        price: f64,
        timestamp: NaiveDateTime,
    ) -> Valuation {
        let unrealized_pnl = account.position().unrealized_pnl(price);
        let total_value =
            account.cash_balance() + account.position().entry_notional() + unrealized_pnl;
        self.history.push(ValuePoint {
            timestamp,
            total_value,
        });
        Valuation {
            unrealized_pnl,
            total_value,
        }
    }

    pub fn history(&self) -> &[ValuePoint] {
        &self.history
    }

    pub fn latest(&self) -> Option<&ValuePoint> {
        self.history.last()
    }
}
