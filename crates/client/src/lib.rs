//! Authenticated upload/request client.
//!
//! This crate implements the client side of the portal protocol:
//! - A process-wide bearer-token cache keyed by login identity and
//!   authentication endpoint
//! - Token acquisition with a single form POST per cache miss
//! - Payload preparation: gzip for files, JSON (optionally Brotli) for
//!   structured data, HMAC signing of wire bytes
//! - Progress-reporting request bodies with cooperative cancellation
//! - Single-use upload and request sessions that reduce every failure
//!   to a structured [`Outcome`](updraft_core::Outcome)
//!
//! [`UploadClient`] is the entry point; it owns the shared pieces and
//! builds sessions.

pub mod auth;
pub mod cache;
pub mod error;
pub mod payload;
pub mod progress;
pub mod session;

pub use auth::Authorizer;
pub use cache::TokenCache;
pub use error::{Error, Result};
pub use payload::PreparedPayload;
pub use progress::{Progress, ProgressBody, ProgressFn};
pub use session::{RequestSession, UploadClient, UploadSession};
