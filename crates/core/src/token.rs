//! Bearer tokens with absolute expiry.

use serde::{Deserialize, Serialize};
use std::fmt;
use time::{Duration, OffsetDateTime};

/// A bearer token and the instant it stops being valid.
///
/// Expiry is absolute: a token minted with a validity window is pinned
/// to `now + validity` at creation, so cached copies age out no matter
/// when they are re-read.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    value: String,
    #[serde(with = "time::serde::rfc3339")]
    expires_at: OffsetDateTime,
}

impl AuthToken {
    pub fn new(value: impl Into<String>, expires_at: OffsetDateTime) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Token valid for `validity_secs` seconds from now. Windows beyond
    /// the representable range saturate.
    pub fn with_validity(value: impl Into<String>, validity_secs: i64) -> Self {
        Self::new(
            value,
            OffsetDateTime::now_utc().saturating_add(Duration::seconds(validity_secs)),
        )
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> OffsetDateTime {
        self.expires_at
    }

    /// Check if the expiry instant has passed.
    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.expires_at
    }

    /// Render the `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_with_validity() {
        let token = AuthToken::with_validity("abc", 60);
        assert!(!token.is_expired());
        assert!(token.expires_at() > OffsetDateTime::now_utc());
    }

    #[test]
    fn test_expired_token() {
        let token = AuthToken::with_validity("abc", -1);
        assert!(token.is_expired());
    }

    #[test]
    fn test_oversized_validity_saturates() {
        let token = AuthToken::with_validity("abc", i64::MAX);
        assert!(!token.is_expired());
        assert!(token.expires_at() > OffsetDateTime::now_utc());
    }

    #[test]
    fn test_bearer_header_value() {
        let token = AuthToken::with_validity("abc123", 60);
        assert_eq!(token.bearer(), "Bearer abc123");
    }

    #[test]
    fn test_debug_redacts_value() {
        let token = AuthToken::with_validity("topsecret", 60);
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("topsecret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_rfc3339_round_trip() {
        let token = AuthToken::with_validity("abc", 300);
        let json = serde_json::to_string(&token).unwrap();
        assert!(json.contains("expires_at"));
        let back: AuthToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value(), "abc");
        assert_eq!(back.expires_at(), token.expires_at());
    }
}
