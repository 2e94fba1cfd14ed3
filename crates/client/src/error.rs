//! Client-side step errors.

use thiserror::Error;
use updraft_core::FailureKind;

/// Errors raised by individual session steps.
///
/// These never cross the session boundary: `run` reduces whichever one
/// short-circuited the pipeline into an `Outcome` with the matching
/// [`FailureKind`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("operation cancelled")]
    Cancelled,

    #[error("unauthorized")]
    Unauthorized,

    /// The endpoint answered with a status other than 200.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("payload error: {0}")]
    Payload(String),
}

impl Error {
    /// Rejection for a non-200 response with its best-effort body text.
    pub fn rejected(status: u16, body: &str) -> Self {
        let message = if body.is_empty() {
            status.to_string()
        } else {
            format!("{status}: {body}")
        };
        Self::Rejected { status, message }
    }

    /// The classification reported through the outcome.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Cancelled => FailureKind::Cancelled,
            Self::Unauthorized => FailureKind::Unauthorized,
            Self::Rejected { .. } => FailureKind::Rejected,
            Self::Transport(_) => FailureKind::Transport,
            Self::Payload(_) => FailureKind::Payload,
        }
    }

    /// HTTP status for rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Payload(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Payload(err.to_string())
    }
}

/// Result type alias for session steps.
pub type Result<T> = std::result::Result<T, Error>;
