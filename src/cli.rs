//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::console_event_adapter::ConsoleEventAdapter;
use crate::adapters::csv_event_adapter::CsvEventAdapter;
use crate::adapters::csv_feed_adapter::CsvFeedAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config::EngineConfig;
use crate::domain::engine::TradingEngine;
use crate::domain::error::TickpilotError;
use crate::domain::event::EngineEvent;
use crate::ports::event_port::EventPort;
use crate::ports::feed_port::FeedPort;

#[derive(Parser, Debug)]
#[command(name = "tickpilot", about = "Forecast-driven tick trading engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a feed file through the engine
    Run {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
        /// Directory for trades.csv / valuations.csv
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Log every valuation tick to stderr
        #[arg(short, long)]
        verbose: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate an engine configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Summarize a feed file
    Info {
        #[arg(short, long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            data,
            output,
            verbose,
            dry_run,
        } => run_engine(&config, &data, output.as_deref(), verbose, dry_run),
        Command::Validate { config } => run_validate(&config),
        Command::Info { data } => run_info(&data),
    }
}

pub fn load_config(path: &std::path::Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TickpilotError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Console sink plus optional CSV logs, driven as one event port.
struct RunSinks {
    console: ConsoleEventAdapter,
    csv: Option<CsvEventAdapter>,
}

impl EventPort for RunSinks {
    fn emit(&mut self, event: &EngineEvent) {
        self.console.emit(event);
        if let Some(csv) = &mut self.csv {
            csv.emit(event);
        }
    }
}

fn run_engine(
    config_path: &std::path::Path,
    data_path: &std::path::Path,
    output: Option<&std::path::Path>,
    verbose: bool,
    dry_run: bool,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let engine_config = match EngineConfig::from_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Loading feed from {}", data_path.display());
    let feed = CsvFeedAdapter::new(data_path.to_path_buf());
    let rows = match feed.ticks() {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if rows.is_empty() {
        eprintln!("error: feed contains no ticks");
        return ExitCode::from(3);
    }

    let horizon = rows[0].1.len();
    if horizon < engine_config.decision_horizon {
        let err = TickpilotError::InsufficientForecastHorizon {
            have: horizon,
            need: engine_config.decision_horizon,
        };
        eprintln!("error: {err}");
        return (&err).into();
    }

    if dry_run {
        eprintln!(
            "Dry run complete: {} ticks, forecast horizon {}, decision horizon {}",
            rows.len(),
            horizon,
            engine_config.decision_horizon,
        );
        return ExitCode::SUCCESS;
    }

    let mut engine = match TradingEngine::new(engine_config) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let csv_sink = match output {
        Some(dir) => match CsvEventAdapter::create(dir) {
            Ok(sink) => Some(sink),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
        None => None,
    };
    let mut sinks = RunSinks {
        console: ConsoleEventAdapter::new(verbose),
        csv: csv_sink,
    };

    eprintln!("Processing {} ticks...", rows.len());
    let mut skipped = 0usize;
    for (tick, forecast) in &rows {
        if let Err(e) = engine.process_tick(tick, forecast, &mut sinks) {
            eprintln!("warning: skipping tick at {} ({})", tick.timestamp, e);
            skipped += 1;
        }
    }

    let realized: f64 = engine.account().realized_pnl().iter().sum();
    let final_value = engine
        .value_history()
        .last()
        .map_or(0.0, |point| point.total_value);

    eprintln!("\n=== Run Summary ===");
    eprintln!("Ticks processed:  {}", engine.ticks_seen());
    if skipped > 0 {
        eprintln!("Ticks skipped:    {}", skipped);
    }
    eprintln!("Trades closed:    {}", engine.account().realized_pnl().len());
    eprintln!("Realized P/L:     {:+.2}", realized);
    eprintln!("Final cash:       {:.2}", engine.account().cash_balance());
    eprintln!("Final value:      {:.2}", final_value);

    if let Some(csv) = sinks.csv.take() {
        match csv.finish() {
            Ok(()) => {
                if let Some(dir) = output {
                    eprintln!("Event logs written to {}", dir.display());
                }
            }
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &std::path::Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match EngineConfig::from_config(&adapter) {
        Ok(config) => {
            eprintln!("Config is valid.");
            eprintln!("  initial_balance:  {}", config.initial_balance);
            eprintln!(
                "  fees:             maker {} / taker {}",
                config.maker_fee, config.taker_fee
            );
            eprintln!(
                "  risk limits:      stop {} / take {}",
                config.stop_loss_pct, config.take_profit_pct
            );
            eprintln!(
                "  SMA windows:      {} / {}",
                config.sma_short_window, config.sma_long_window
            );
            eprintln!(
                "  RSI:              window {} thresholds {}/{}",
                config.rsi_window, config.rsi_oversold, config.rsi_overbought
            );
            eprintln!(
                "  Bollinger:        window {} k {}",
                config.bollinger_window, config.bollinger_k
            );
            eprintln!(
                "  forecast:         horizon {} decision {} mult {}",
                config.forecast_horizon, config.decision_horizon, config.forecast_std_multiplier
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(data_path: &std::path::Path) -> ExitCode {
    let feed = CsvFeedAdapter::new(data_path.to_path_buf());
    let rows = match feed.ticks() {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match (rows.first(), rows.last()) {
        (Some((first, forecast)), Some((last, _))) => {
            println!(
                "{}: {} ticks, {} to {}, horizon {}",
                data_path.display(),
                rows.len(),
                first.timestamp,
                last.timestamp,
                forecast.len(),
            );
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("{}: no ticks found", data_path.display());
            ExitCode::from(3)
        }
    }
}
