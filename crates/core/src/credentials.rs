//! Caller credentials and token-cache keys.

use std::fmt;

/// Login credentials supplied by the caller.
///
/// An empty login id means anonymous: sessions built with anonymous
/// credentials skip the token exchange and send no `Authorization`
/// header. The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    login_id: String,
    password: String,
}

impl Credentials {
    pub fn new(login_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login_id: login_id.into(),
            password: password.into(),
        }
    }

    /// Credentials carrying no identity.
    pub fn anonymous() -> Self {
        Self {
            login_id: String::new(),
            password: String::new(),
        }
    }

    pub fn login_id(&self) -> &str {
        &self.login_id
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// True when no login identity is present.
    pub fn is_anonymous(&self) -> bool {
        self.login_id.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login_id", &self.login_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Token-cache key: one cached token per login identity per
/// authentication endpoint.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a login identity and authentication endpoint.
    pub fn new(login_id: &str, auth_url: &str) -> Self {
        Self(format!("{login_id}@{auth_url}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({})", self.0)
    }
}
