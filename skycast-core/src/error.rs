use std::time::Duration;
use thiserror::Error;

/// Failure of a forecast session operation. The `Display` text is what the
/// session records in `SessionState::error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Weather API request failed: {0}")]
    Api(String),

    #[error("Weather API request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Nothing to retry: no forecast has been requested yet")]
    NothingToRetry,
}

impl From<anyhow::Error> for SessionError {
    fn from(err: anyhow::Error) -> Self {
        SessionError::Api(format!("{err:#}"))
    }
}
