//! Human-readable event logging to stderr.

use crate::domain::event::EngineEvent;
use crate::ports::event_port::EventPort;

/// Logs trade events to stderr; per-tick valuations only when verbose.
pub struct ConsoleEventAdapter {
    log_valuations: bool,
}

impl ConsoleEventAdapter {
    pub fn new(log_valuations: bool) -> Self {
        Self { log_valuations }
    }
}

impl EventPort for ConsoleEventAdapter {
    fn emit(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::TradeOpened {
                side,
                price,
                contracts,
                fee,
                timestamp,
            } => {
                eprintln!(
                    "{} opened {}: {:.8} contracts at {:.2} (fee {:.4})",
                    timestamp, side, contracts, price, fee
                );
            }
            EngineEvent::TradeClosed {
                price,
                contracts,
                fee,
                profit_loss,
                timestamp,
            } => {
                eprintln!(
                    "{} closed {:.8} contracts at {:.2} (fee {:.4}), P/L {:+.2}",
                    timestamp, contracts, price, fee, profit_loss
                );
            }
            EngineEvent::ValuationUpdate {
                price,
                cash_balance,
                contracts,
                position,
                total_value,
                timestamp,
                ..
            } => {
                if self.log_valuations {
                    let held = match position {
                        Some(side) => side.to_string(),
                        None => "flat".to_string(),
                    };
                    eprintln!(
                        "{} price {:.2} | cash {:.2} | {:.8} contracts ({}) | total {:.2}",
                        timestamp, price, cash_balance, contracts, held, total_value
                    );
                }
            }
        }
    }
}
