//! Error types for calendar data access.

use thiserror::Error;

/// An error raised while fetching calendar data from a backend.
///
/// Repositories raise these; the analyzer catches them at its boundary
/// and converts them into failed analysis results, so callers of
/// [`crate::CalendarAnalyzer::analyze`] never see them directly.
#[derive(Debug, Error)]
pub enum CalendarError {
    /// The repository was built with invalid or missing configuration.
    #[error("calendar repository misconfigured: {0}")]
    Configuration(String),

    /// The backend could not be reached.
    #[error("cannot connect to calendar service at {0}")]
    Connection(String),

    /// The backend did not answer within the configured timeout.
    #[error("calendar request timed out after {0} seconds")]
    Timeout(u64),

    /// The backend answered with a non-success HTTP status.
    #[error("calendar service returned status {0}")]
    Status(u16),

    /// The backend answered with a payload we could not interpret.
    #[error("malformed calendar payload: {0}")]
    Malformed(String),
}

impl CalendarError {
    /// Short machine-readable class of this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::Connection(_) => "connection_error",
            Self::Timeout(_) => "timeout",
            Self::Status(_) => "upstream_error",
            Self::Malformed(_) => "upstream_error",
        }
    }
}
