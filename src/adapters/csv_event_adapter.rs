//! CSV event log adapter: trades.csv and valuations.csv in an output
//! directory.

use std::fs::{self, File};
use std::path::Path;

use crate::domain::error::TickpilotError;
use crate::domain::event::EngineEvent;
use crate::ports::event_port::EventPort;

pub struct CsvEventAdapter {
    trades: csv::Writer<File>,
    valuations: csv::Writer<File>,
    /// First write failure, surfaced by `finish` since `emit` is infallible.
    write_error: Option<String>,
}

impl CsvEventAdapter {
    pub fn create(dir: &Path) -> Result<Self, TickpilotError> {
        fs::create_dir_all(dir)?;

        let mut trades = csv::Writer::from_path(dir.join("trades.csv"))
            .map_err(|e| Self::io_error("trades.csv", &e))?;
        trades
            .write_record([
                "event",
                "timestamp",
                "side",
                "price",
                "contracts",
                "fee",
                "profit_loss",
            ])
            .map_err(|e| Self::io_error("trades.csv", &e))?;

        let mut valuations = csv::Writer::from_path(dir.join("valuations.csv"))
            .map_err(|e| Self::io_error("valuations.csv", &e))?;
        valuations
            .write_record([
                "timestamp",
                "price",
                "cash_balance",
                "contracts",
                "position",
                "unrealized_pnl",
                "total_value",
            ])
            .map_err(|e| Self::io_error("valuations.csv", &e))?;

        Ok(Self {
            trades,
            valuations,
            write_error: None,
        })
    }

    /// Flush both files and report any write failure seen along the way.
    pub fn finish(mut self) -> Result<(), TickpilotError> {
        if let Some(reason) = self.write_error.take() {
            return Err(TickpilotError::Feed { reason });
        }
        self.trades.flush().map_err(TickpilotError::Io)?;
        self.valuations.flush().map_err(TickpilotError::Io)?;
        Ok(())
    }

    fn io_error(file: &str, err: &dyn std::fmt::Display) -> TickpilotError {
        TickpilotError::Feed {
            reason: format!("{}: {}", file, err),
        }
    }

    fn record(&mut self, file: &'static str, result: Result<(), csv::Error>) {
        if self.write_error.is_none() {
            if let Err(e) = result {
                self.write_error = Some(format!("{}: {}", file, e));
            }
        }
    }
}

impl EventPort for CsvEventAdapter {
    fn emit(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::TradeOpened {
                side,
                price,
                contracts,
                fee,
                timestamp,
            } => {
                let result = self.trades.write_record([
                    "open".to_string(),
                    timestamp.to_string(),
                    side.to_string(),
                    price.to_string(),
                    contracts.to_string(),
                    fee.to_string(),
                    String::new(),
                ]);
                self.record("trades.csv", result);
            }
            EngineEvent::TradeClosed {
                price,
                contracts,
                fee,
                profit_loss,
                timestamp,
            } => {
                let result = self.trades.write_record([
                    "close".to_string(),
                    timestamp.to_string(),
                    String::new(),
                    price.to_string(),
                    contracts.to_string(),
                    fee.to_string(),
                    profit_loss.to_string(),
                ]);
                self.record("trades.csv", result);
            }
            EngineEvent::ValuationUpdate {
                price,
                cash_balance,
                contracts,
                position,
                unrealized_pnl,
                total_value,
                timestamp,
            } => {
                let held = match position {
                    Some(side) => side.to_string(),
                    None => "flat".to_string(),
                };
                let result = self.valuations.write_record([
                    timestamp.to_string(),
                    price.to_string(),
                    cash_balance.to_string(),
                    contracts.to_string(),
                    held,
                    unrealized_pnl.to_string(),
                    total_value.to_string(),
                ]);
                self.record("valuations.csv", result);
            }
        }
    }
}
