//! Core domain types for the updraft upload/request client.
//!
//! This crate defines the vocabulary shared between the client library
//! and embedding applications:
//! - Caller credentials and token-cache keys
//! - Bearer tokens with absolute expiry
//! - Single-use session lifecycle state
//! - Structured outcomes with failure classification
//! - The credential-hasher capability boundary
//! - Client configuration

pub mod config;
pub mod credentials;
pub mod error;
pub mod hasher;
pub mod outcome;
pub mod session_state;
pub mod token;

pub use config::ClientConfig;
pub use credentials::{CacheKey, Credentials};
pub use error::{Error, Result};
pub use hasher::CredentialHasher;
pub use outcome::{FailureKind, Outcome};
pub use session_state::{SessionState, SessionStateCell};
pub use token::AuthToken;

/// Read-buffer size for progress-reporting uploads: 20 KiB.
pub const PROGRESS_CHUNK_SIZE: usize = 20 * 1024;

/// Default timeout for the authentication exchange, in seconds.
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 30;

/// Default timeout for upload and request exchanges, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15 * 60;
