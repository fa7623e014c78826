//! Error type shared by every part of the pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A caller passed a value outside the operation's domain. Prior state is untouched.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("malformed CSV at line {line}: {reason}")]
    Csv { line: usize, reason: String },

    /// The session actor has shut down and no longer accepts commands.
    #[error("telemetry session is closed")]
    SessionClosed,

    #[cfg(feature = "parquet")]
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl TelemetryError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        TelemetryError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// `true` for [`TelemetryError::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, TelemetryError::InvalidArgument { .. })
    }
}

pub type Result<T> = std::result::Result<T, TelemetryError>;
