//! Single-position account: cash balance, position state machine, fees.
//!
//! Fee policy is asymmetric by execution assumption: a long entry rests as a
//! limit order (maker fee), a short entry hits the book (taker fee), and any
//! close is an urgent market exit (taker fee).

use chrono::NaiveDateTime;
use std::fmt;

use crate::domain::config::EngineConfig;

/// Cash reserved per open so rounding can never push the balance negative.
const BALANCE_RESERVE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Long,
    Short,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenPosition {
    pub entry_price: f64,
    pub contracts: f64,
    pub opened_at: NaiveDateTime,
}

/// Position state. `Flat` carries no fields, so a flat account structurally
/// has zero contracts and no entry price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    Flat,
    Long(OpenPosition),
    Short(OpenPosition),
}

impl Position {
    pub fn is_flat(&self) -> bool {
        matches!(self, Position::Flat)
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            Position::Flat => None,
            Position::Long(_) => Some(Side::Long),
            Position::Short(_) => Some(Side::Short),
        }
    }

    pub fn open_position(&self) -> Option<&OpenPosition> {
        match self {
            Position::Flat => None,
            Position::Long(open) | Position::Short(open) => Some(open),
        }
    }

    pub fn contracts(&self) -> f64 {
        self.open_position().map_or(0.0, |open| open.contracts)
    }

    /// Capital committed at entry; zero when flat.
    pub fn entry_notional(&self) -> f64 {
        self.open_position()
            .map_or(0.0, |open| open.contracts * open.entry_price)
    }

    /// Mark-to-market profit or loss against the entry price.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long(open) => (price - open.entry_price) * open.contracts,
            Position::Short(open) => (open.entry_price - price) * open.contracts,
        }
    }
}

/// Fill details of a successful open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenFill {
    pub side: Side,
    pub price: f64,
    pub contracts: f64,
    pub fee: f64,
}

/// Outcome of an open attempt on a flat account.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpenResult {
    Opened(OpenFill),
    /// Balance too small to buy any contracts after the rounding reserve.
    InsufficientBalance,
}

/// Fill details of a close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloseFill {
    pub side: Side,
    pub price: f64,
    pub contracts: f64,
    pub fee: f64,
    pub profit_loss: f64,
}

/// Cash balance plus the single open position, with realized P&L history.
///
/// Owned by the engine; callers outside the tick pipeline only read.
#[derive(Debug, Clone)]
pub struct Account {
    cash_balance: f64,
    position: Position,
    realized_pnl: Vec<f64>,
}

impl Account {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            cash_balance: initial_balance,
            position: Position::Flat,
            realized_pnl: Vec::new(),
        }
    }

    pub fn cash_balance(&self) -> f64 {
        self.cash_balance
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn realized_pnl(&self) -> &[f64] {
        &self.realized_pnl
    }

    /// Open a position with the whole balance (minus a rounding reserve).
    ///
    /// `max_contracts = cash / (price * (1 + fee_rate))`, then
    /// `contracts = max_contracts - 0.01 / price`. The open is rejected as
    /// [`OpenResult::InsufficientBalance`] when no positive contract amount
    /// remains; the account is untouched in that case.
    ///
    /// # Panics
    ///
    /// Panics if a position is already open. Opening while non-flat is a
    /// programming error in the caller, not a market condition.
    pub fn open(
        &mut self,
        side: Side,
        price: f64,
        timestamp: NaiveDateTime,
        config: &EngineConfig,
    ) -> OpenResult {
        assert!(
            self.position.is_flat(),
            "open() called while a {} position is already open",
            self.position.side().expect("non-flat position has a side"),
        );

        let fee_rate = match side {
            Side::Long => config.maker_fee,
            Side::Short => config.taker_fee,
        };

        let max_contracts = self.cash_balance / (price * (1.0 + fee_rate));
        let contracts = max_contracts - BALANCE_RESERVE / price;
        if contracts <= 0.0 {
            return OpenResult::InsufficientBalance;
        }

        let fee = contracts * price * fee_rate;
        self.cash_balance -= contracts * price + fee;

        let open = OpenPosition {
            entry_price: price,
            contracts,
            opened_at: timestamp,
        };
        self.position = match side {
            Side::Long => Position::Long(open),
            Side::Short => Position::Short(open),
        };

        OpenResult::Opened(OpenFill {
            side,
            price,
            contracts,
            fee,
        })
    }

    /// Close the open position at `price`, charging the taker fee.
    ///
    /// The balance is credited with the escrowed entry notional plus the
    /// realized profit or loss, so a zero-fee round trip at one price
    /// restores the balance exactly.
    ///
    /// # Panics
    ///
    /// Panics if the account is flat.
    pub fn close(&mut self, price: f64, config: &EngineConfig) -> CloseFill {
        let (side, open) = match self.position {
            Position::Flat => panic!("close() called with no open position"),
            Position::Long(open) => (Side::Long, open),
            Position::Short(open) => (Side::Short, open),
        };

        let fee = open.contracts * price * config.taker_fee;
        let profit_loss = match side {
            Side::Long => (price - open.entry_price) * open.contracts - fee,
            Side::Short => (open.entry_price - price) * open.contracts - fee,
        };

        self.cash_balance += open.contracts * open.entry_price + profit_loss;
        self.position = Position::Flat;
        self.realized_pnl.push(profit_loss);

        CloseFill {
            side,
            price,
            contracts: open.contracts,
            fee,
            profit_loss,
        }
    }
}
