//! Domain error types.

/// Top-level error type for tickpilot.
#[derive(Debug, thiserror::Error)]
pub enum TickpilotError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("feed error: {reason}")]
    Feed { reason: String },

    #[error("forecast horizon too short: have {have} predictions, need {need}")]
    InsufficientForecastHorizon { have: usize, need: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TickpilotError> for std::process::ExitCode {
    fn from(err: &TickpilotError) -> Self {
        let code: u8 = match err {
            TickpilotError::Io(_) => 1,
            TickpilotError::ConfigParse { .. }
            | TickpilotError::ConfigMissing { .. }
            | TickpilotError::ConfigInvalid { .. } => 2,
            TickpilotError::Feed { .. } => 3,
            TickpilotError::InsufficientForecastHorizon { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
