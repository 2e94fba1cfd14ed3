//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
///
/// These cover eager validation at session creation. Failures that
/// happen while a session runs never surface as errors; they are folded
/// into the session's [`Outcome`](crate::Outcome).
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid target URL: {0}")]
    InvalidTargetUrl(String),

    #[error("invalid auth URL: {0}")]
    InvalidAuthUrl(String),

    #[error("invalid upload file: {0}")]
    InvalidUploadFile(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
