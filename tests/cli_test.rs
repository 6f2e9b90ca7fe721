//! CLI orchestration tests: config loading, validation failures with the
//! right keys, and feed files on disk.

use std::io::Write;
use tickpilot::adapters::csv_feed_adapter::CsvFeedAdapter;
use tickpilot::adapters::file_config_adapter::FileConfigAdapter;
use tickpilot::cli;
use tickpilot::domain::config::EngineConfig;
use tickpilot::domain::error::TickpilotError;
use tickpilot::ports::feed_port::FeedPort;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[engine]
initial_balance = 10000.0
maker_fee = 0.0002
taker_fee = 0.0005
stop_loss_pct = 0.02
take_profit_pct = 0.04
min_history_for_decisions = 30

[indicators]
sma_short_window = 7
sma_long_window = 25
rsi_window = 14
rsi_oversold = 30
rsi_overbought = 70
bollinger_window = 20
bollinger_k = 2.0

[forecast]
horizon = 16
decision_horizon = 4
std_multiplier = 1.0
"#;

mod config_loading {
    use super::*;

    #[test]
    fn load_config_reads_ini_from_disk() {
        let file = write_temp_ini(VALID_INI);
        let adapter = cli::load_config(file.path()).expect("config should load");

        let config = EngineConfig::from_config(&adapter).unwrap();
        assert!((config.initial_balance - 10_000.0).abs() < f64::EPSILON);
        assert_eq!(config.sma_short_window, 7);
        assert_eq!(config.sma_long_window, 25);
        assert_eq!(config.forecast_horizon, 16);
        assert_eq!(config.decision_horizon, 4);
    }

    #[test]
    fn load_config_rejects_missing_file() {
        assert!(cli::load_config(std::path::Path::new("/nonexistent/engine.ini")).is_err());
    }

    #[test]
    fn invalid_fee_reports_its_key() {
        let adapter = FileConfigAdapter::from_string(
            "[engine]\nmaker_fee = -0.5\n",
        )
        .unwrap();
        let err = EngineConfig::from_config(&adapter).unwrap_err();
        assert!(
            matches!(err, TickpilotError::ConfigInvalid { ref key, .. } if key == "maker_fee")
        );
    }

    #[test]
    fn crossed_sma_windows_report_their_key() {
        let adapter = FileConfigAdapter::from_string(
            "[indicators]\nsma_short_window = 30\nsma_long_window = 10\n",
        )
        .unwrap();
        let err = EngineConfig::from_config(&adapter).unwrap_err();
        assert!(
            matches!(err, TickpilotError::ConfigInvalid { ref key, .. } if key == "sma_long_window")
        );
    }

    #[test]
    fn oversized_decision_horizon_reports_its_key() {
        let adapter = FileConfigAdapter::from_string(
            "[forecast]\nhorizon = 4\ndecision_horizon = 9\n",
        )
        .unwrap();
        let err = EngineConfig::from_config(&adapter).unwrap_err();
        assert!(
            matches!(err, TickpilotError::ConfigInvalid { ref key, .. } if key == "decision_horizon")
        );
    }

    #[test]
    fn defaults_alone_form_a_valid_config() {
        let adapter = FileConfigAdapter::from_string("[engine]\n").unwrap();
        let config = EngineConfig::from_config(&adapter).unwrap();
        assert!(config.validate().is_ok());
    }
}

mod feed_files {
    use super::*;

    #[test]
    fn feed_file_on_disk_round_trips() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timestamp,price,f1,f2").unwrap();
        writeln!(file, "2024-03-01 09:01:00,101.5,102.0,102.5").unwrap();
        writeln!(file, "2024-03-01 09:00:00,100.0,101.0,101.5").unwrap();
        file.flush().unwrap();

        let feed = CsvFeedAdapter::new(file.path().to_path_buf());
        let rows = feed.ticks().unwrap();

        assert_eq!(rows.len(), 2);
        // Sorted by timestamp regardless of file order.
        assert!((rows[0].0.price - 100.0).abs() < f64::EPSILON);
        assert!((rows[1].0.price - 101.5).abs() < f64::EPSILON);
        assert_eq!(rows[0].1.len(), 2);
    }

    #[test]
    fn malformed_feed_is_a_feed_error() {
        let file = write_temp_ini("timestamp,price,f1\ngarbage-row\n");
        let feed = CsvFeedAdapter::new(file.path().to_path_buf());
        let err = feed.ticks().unwrap_err();
        assert!(matches!(err, TickpilotError::Feed { .. }));
    }
}
