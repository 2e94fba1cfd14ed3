//! The credential-hasher capability boundary.

/// Pluggable credential-hashing capability.
///
/// The library never hashes credentials itself; the embedding
/// application supplies an implementation matched to its portal, and
/// tests swap in a fake. All four operations are pure functions of
/// their inputs.
///
/// Only [`send_hash`](Self::send_hash) participates in the token
/// exchange. The remaining operations cover the challenge-response
/// variant of the portal protocol, where a seed derived from the
/// request is combined with a stored password hash.
pub trait CredentialHasher: Send + Sync {
    /// Hash a password for storage or comparison.
    fn password_hash(&self, login_id: &str, password: &str) -> String;

    /// Hash a password into the form sent to the authentication
    /// endpoint.
    fn send_hash(&self, login_id: &str, password: &str) -> String;

    /// Derive a challenge seed from a request password.
    fn challenge_seed(&self, request_password: &str) -> String;

    /// Combine a stored password hash with a challenge seed.
    fn combine_hash(&self, password_hash: &str, seed: &str) -> String;
}
