//! Bearer-token acquisition.

use crate::cache::TokenCache;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio_util::sync::CancellationToken;
use updraft_core::{AuthToken, CacheKey, ClientConfig, CredentialHasher, Credentials};

/// Response body of the authentication endpoint.
///
/// The endpoint reports token lifetime either as `validity` (a window
/// in seconds) or as `expiresAt` (an absolute RFC 3339 instant).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    validity: Option<i64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    expires_at: Option<OffsetDateTime>,
}

impl AuthResponse {
    /// Absolute expiry from whichever form the endpoint supplied.
    ///
    /// A non-positive validity yields `None`: the token is treated as
    /// single-use and nothing is cached, but it still authorizes the
    /// current exchange. A window too large to land on a representable
    /// instant degrades the same way.
    fn expiry(&self) -> Option<OffsetDateTime> {
        if let Some(validity) = self.validity {
            if validity > 0 {
                return OffsetDateTime::now_utc().checked_add(Duration::seconds(validity));
            }
            return None;
        }
        self.expires_at
    }
}

/// Produces `Authorization` header values for sessions.
///
/// The token cache is consulted first; a miss costs exactly one
/// authentication exchange against the auth endpoint. Every failure
/// mode of that exchange collapses into `Unauthorized`.
#[derive(Clone)]
pub struct Authorizer {
    http: reqwest::Client,
    cache: TokenCache,
    hasher: Arc<dyn CredentialHasher>,
    config: ClientConfig,
}

impl Authorizer {
    pub fn new(
        http: reqwest::Client,
        cache: TokenCache,
        hasher: Arc<dyn CredentialHasher>,
        config: ClientConfig,
    ) -> Self {
        Self {
            http,
            cache,
            hasher,
            config,
        }
    }

    /// Obtain the `Authorization` header value for one request.
    ///
    /// Anonymous credentials yield `Ok(None)`: the request goes out
    /// with no header and no network round-trip is spent here. A
    /// cached live token is returned without touching the network.
    pub async fn authorize(
        &self,
        credentials: &Credentials,
        auth_url: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>> {
        if credentials.is_anonymous() {
            return Ok(None);
        }

        let key = CacheKey::new(credentials.login_id(), auth_url);
        if let Some(token) = self.cache.get(&key) {
            tracing::debug!(auth_url, "token cache hit");
            return Ok(Some(token.bearer()));
        }

        tracing::debug!(auth_url, "token cache miss, authenticating");

        let auth = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            auth = self.exchange(credentials, auth_url) => auth,
        };

        let Some(auth) = auth else {
            return Err(Error::Unauthorized);
        };
        let token_value = match auth.token {
            Some(ref token) if !token.is_empty() => token.clone(),
            _ => return Err(Error::Unauthorized),
        };

        if let Some(expires_at) = auth.expiry() {
            if expires_at > OffsetDateTime::now_utc() {
                self.cache
                    .set(key, AuthToken::new(token_value.clone(), expires_at));
            }
        }

        Ok(Some(format!("Bearer {token_value}")))
    }

    /// One authentication exchange: a form POST of the login id and
    /// the hashed password. Any transport or parse failure yields
    /// `None`; the password itself never goes on the wire or into a
    /// log.
    async fn exchange(&self, credentials: &Credentials, auth_url: &str) -> Option<AuthResponse> {
        let hashed = self
            .hasher
            .send_hash(credentials.login_id(), credentials.password());
        let form = [
            ("LoginId", credentials.login_id()),
            ("Password", hashed.as_str()),
        ];

        let result = self
            .http
            .post(auth_url)
            .timeout(self.config.auth_timeout())
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .form(&form)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(auth_url, error = %err, "authentication exchange failed");
                return None;
            }
        };

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str(&body) {
            Ok(auth) => Some(auth),
            Err(err) => {
                tracing::warn!(auth_url, error = %err, "authentication response unreadable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_from_validity_seconds() {
        let auth = AuthResponse {
            token: Some("t".to_string()),
            validity: Some(3600),
            expires_at: None,
        };
        let expiry = auth.expiry().unwrap();
        assert!(expiry > OffsetDateTime::now_utc());
        assert!(expiry <= OffsetDateTime::now_utc() + Duration::seconds(3600));
    }

    #[test]
    fn test_non_positive_validity_yields_no_expiry() {
        for validity in [0, -60] {
            let auth = AuthResponse {
                token: Some("t".to_string()),
                validity: Some(validity),
                expires_at: Some(OffsetDateTime::now_utc() + Duration::hours(1)),
            };
            // validity takes precedence over the absolute form
            assert!(auth.expiry().is_none());
        }
    }

    #[test]
    fn test_oversized_validity_yields_no_expiry() {
        let auth = AuthResponse {
            token: Some("t".to_string()),
            validity: Some(i64::MAX),
            expires_at: None,
        };
        assert!(auth.expiry().is_none());
    }

    #[test]
    fn test_expiry_falls_back_to_absolute() {
        let instant = OffsetDateTime::now_utc() + Duration::hours(2);
        let auth = AuthResponse {
            token: Some("t".to_string()),
            validity: None,
            expires_at: Some(instant),
        };
        assert_eq!(auth.expiry(), Some(instant));
    }

    #[test]
    fn test_parse_validity_response() {
        let auth: AuthResponse =
            serde_json::from_str(r#"{"loginId":"alice","token":"abc","validity":3600}"#).unwrap();
        assert_eq!(auth.token.as_deref(), Some("abc"));
        assert_eq!(auth.validity, Some(3600));
        assert!(auth.expires_at.is_none());
    }

    #[test]
    fn test_parse_expires_at_response() {
        let auth: AuthResponse =
            serde_json::from_str(r#"{"token":"abc","expiresAt":"2030-01-01T00:00:00Z"}"#).unwrap();
        assert_eq!(auth.token.as_deref(), Some("abc"));
        assert!(auth.expires_at.is_some());
    }

    #[test]
    fn test_parse_token_missing() {
        let auth: AuthResponse = serde_json::from_str(r#"{"validity":60}"#).unwrap();
        assert!(auth.token.is_none());
    }
}
