//! CSV-backed tick/forecast feed adapter.
//!
//! Expected layout: `timestamp,price,f1,...,fH` with one forecast column per
//! future step; the header decides the horizon. Rows are sorted by timestamp
//! after load, so an unordered export still replays correctly.

use chrono::NaiveDateTime;
use std::fs;
use std::path::PathBuf;

use crate::domain::error::TickpilotError;
use crate::domain::tick::{ForecastVector, PriceTick};
use crate::ports::feed_port::FeedPort;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct CsvFeedAdapter {
    path: PathBuf,
}

impl CsvFeedAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn feed_error(&self, reason: String) -> TickpilotError {
        TickpilotError::Feed {
            reason: format!("{}: {}", self.path.display(), reason),
        }
    }
}

impl FeedPort for CsvFeedAdapter {
    fn ticks(&self) -> Result<Vec<(PriceTick, ForecastVector)>, TickpilotError> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| self.feed_error(format!("failed to read: {}", e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| self.feed_error(format!("header parse error: {}", e)))?;
        if headers.len() < 3 {
            return Err(self.feed_error(format!(
                "expected timestamp, price and at least one forecast column, found {} columns",
                headers.len()
            )));
        }
        let horizon = headers.len() - 2;

        let mut rows = Vec::new();
        for (index, result) in rdr.records().enumerate() {
            let line = index + 2; // header is line 1
            let record =
                result.map_err(|e| self.feed_error(format!("row {}: {}", line, e)))?;

            if record.len() != horizon + 2 {
                return Err(self.feed_error(format!(
                    "row {}: expected {} columns, found {}",
                    line,
                    horizon + 2,
                    record.len()
                )));
            }

            let timestamp = NaiveDateTime::parse_from_str(&record[0], TIMESTAMP_FORMAT)
                .map_err(|e| self.feed_error(format!("row {}: invalid timestamp: {}", line, e)))?;

            let price: f64 = record[1]
                .parse()
                .map_err(|e| self.feed_error(format!("row {}: invalid price: {}", line, e)))?;
            if price <= 0.0 {
                return Err(self.feed_error(format!("row {}: price must be positive", line)));
            }

            let mut predictions = Vec::with_capacity(horizon);
            for value in record.iter().skip(2) {
                let prediction: f64 = value.parse().map_err(|e| {
                    self.feed_error(format!("row {}: invalid forecast value: {}", line, e))
                })?;
                predictions.push(prediction);
            }

            rows.push((
                PriceTick { timestamp, price },
                ForecastVector::new(predictions),
            ));
        }

        rows.sort_by_key(|(tick, _)| tick.timestamp);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_feed(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn reads_rows_with_forecast_columns() {
        let file = write_feed(
            "timestamp,price,f1,f2,f3\n\
             2024-03-01 09:30:00,100.0,101.0,102.0,103.0\n\
             2024-03-01 09:31:00,100.5,101.5,102.5,103.5\n",
        );
        let adapter = CsvFeedAdapter::new(file.path().to_path_buf());

        let rows = adapter.ticks().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0.price, 100.0);
        assert_eq!(rows[0].1.len(), 3);
        assert_eq!(rows[0].1.as_slice(), &[101.0, 102.0, 103.0]);
        assert_eq!(rows[1].0.price, 100.5);
    }

    #[test]
    fn sorts_out_of_order_rows() {
        let file = write_feed(
            "timestamp,price,f1\n\
             2024-03-01 09:32:00,102.0,103.0\n\
             2024-03-01 09:30:00,100.0,101.0\n\
             2024-03-01 09:31:00,101.0,102.0\n",
        );
        let adapter = CsvFeedAdapter::new(file.path().to_path_buf());

        let rows = adapter.ticks().unwrap();
        let prices: Vec<f64> = rows.iter().map(|(tick, _)| tick.price).collect();
        assert_eq!(prices, vec![100.0, 101.0, 102.0]);
    }

    #[test]
    fn rejects_missing_forecast_columns() {
        let file = write_feed("timestamp,price\n2024-03-01 09:30:00,100.0\n");
        let adapter = CsvFeedAdapter::new(file.path().to_path_buf());

        let err = adapter.ticks().unwrap_err();
        assert!(matches!(err, TickpilotError::Feed { .. }));
    }

    #[test]
    fn rejects_bad_timestamp_with_row_context() {
        let file = write_feed(
            "timestamp,price,f1\n\
             2024-03-01 09:30:00,100.0,101.0\n\
             not-a-time,100.0,101.0\n",
        );
        let adapter = CsvFeedAdapter::new(file.path().to_path_buf());

        let err = adapter.ticks().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("row 3"), "unexpected message: {message}");
        assert!(message.contains("invalid timestamp"));
    }

    #[test]
    fn rejects_non_positive_price() {
        let file = write_feed("timestamp,price,f1\n2024-03-01 09:30:00,-5.0,101.0\n");
        let adapter = CsvFeedAdapter::new(file.path().to_path_buf());

        let err = adapter.ticks().unwrap_err();
        assert!(err.to_string().contains("price must be positive"));
    }

    #[test]
    fn rejects_ragged_rows() {
        let file = write_feed(
            "timestamp,price,f1,f2\n\
             2024-03-01 09:30:00,100.0,101.0\n",
        );
        let adapter = CsvFeedAdapter::new(file.path().to_path_buf());

        assert!(adapter.ticks().is_err());
    }

    #[test]
    fn missing_file_is_a_feed_error() {
        let adapter = CsvFeedAdapter::new(PathBuf::from("/nonexistent/feed.csv"));
        let err = adapter.ticks().unwrap_err();
        assert!(matches!(err, TickpilotError::Feed { .. }));
    }
}
