//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod csv_feed_adapter;
pub mod console_event_adapter;
pub mod csv_event_adapter;
