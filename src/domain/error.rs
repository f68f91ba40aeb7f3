//! Domain error types.

/// Top-level error type for holiday-refresh.
#[derive(Debug, thiserror::Error)]
pub enum HolidayError {
    #[error("http client error: {reason}")]
    Http { reason: String },

    #[error("malformed holiday payload: {reason}")]
    Payload { reason: String },

    #[error("invalid holiday date {value:?}: {reason}")]
    DateParse { value: String, reason: String },

    #[error("holiday source unavailable: {reason}")]
    SourceUnavailable { reason: String },

    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

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

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&HolidayError> for std::process::ExitCode {
    fn from(err: &HolidayError) -> Self {
        let code: u8 = match err {
            HolidayError::Io(_) | HolidayError::Http { .. } => 1,
            HolidayError::ConfigParse { .. }
            | HolidayError::ConfigMissing { .. }
            | HolidayError::ConfigInvalid { .. } => 2,
            HolidayError::Database { .. } | HolidayError::DatabaseQuery { .. } => 3,
            HolidayError::Payload { .. } | HolidayError::DateParse { .. } => 4,
            HolidayError::SourceUnavailable { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
