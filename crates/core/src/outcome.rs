//! Session outcomes and failure classification.

use std::fmt;

/// Why a session failed.
///
/// Callers branch on this instead of parsing the outcome message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A completed session was started again.
    Reuse,
    /// The cancellation signal was observed before the exchange finished.
    Cancelled,
    /// No usable bearer token could be obtained.
    Unauthorized,
    /// The endpoint answered with a status other than 200.
    Rejected,
    /// The exchange failed below the HTTP layer.
    Transport,
    /// Reading, serializing, or compressing the payload failed.
    Payload,
}

impl FailureKind {
    /// Stable identifier, used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reuse => "reuse",
            Self::Cancelled => "cancelled",
            Self::Unauthorized => "unauthorized",
            Self::Rejected => "rejected",
            Self::Transport => "transport",
            Self::Payload => "payload",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one session run.
///
/// `success` is true exactly when the endpoint returned HTTP 200. Every
/// failure carries a classification and a non-empty message; a
/// successful read-style request carries the response body in
/// `message`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    success: bool,
    kind: Option<FailureKind>,
    message: String,
}

impl Outcome {
    /// Successful outcome with an empty message.
    pub fn success() -> Self {
        Self {
            success: true,
            kind: None,
            message: String::new(),
        }
    }

    /// Successful outcome carrying a response body.
    pub fn success_with_body(body: impl Into<String>) -> Self {
        Self {
            success: true,
            kind: None,
            message: body.into(),
        }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            kind: Some(kind),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Failure classification; `None` on success.
    pub fn kind(&self) -> Option<FailureKind> {
        self.kind
    }

    /// Failure description, or the response body for successful reads.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_no_kind() {
        let outcome = Outcome::success();
        assert!(outcome.is_success());
        assert_eq!(outcome.kind(), None);
        assert_eq!(outcome.message(), "");
    }

    #[test]
    fn test_success_with_body() {
        let outcome = Outcome::success_with_body("{\"ok\":true}");
        assert!(outcome.is_success());
        assert_eq!(outcome.message(), "{\"ok\":true}");
    }

    #[test]
    fn test_failure_carries_kind_and_message() {
        let outcome = Outcome::failure(FailureKind::Rejected, "500: disk full");
        assert!(!outcome.is_success());
        assert_eq!(outcome.kind(), Some(FailureKind::Rejected));
        assert_eq!(outcome.message(), "500: disk full");
    }

    #[test]
    fn test_failure_kind_as_str() {
        assert_eq!(FailureKind::Reuse.as_str(), "reuse");
        assert_eq!(FailureKind::Unauthorized.as_str(), "unauthorized");
        assert_eq!(FailureKind::Cancelled.to_string(), "cancelled");
    }
}
