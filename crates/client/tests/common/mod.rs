#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use updraft_client::{Progress, ProgressFn, TokenCache, UploadClient};
use updraft_core::{ClientConfig, CredentialHasher};

pub fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Deterministic hasher with URL-safe output, so form bodies can be
/// matched literally in mocks.
pub struct TestHasher;

impl CredentialHasher for TestHasher {
    fn password_hash(&self, login_id: &str, password: &str) -> String {
        format!("ph-{login_id}-{password}")
    }

    fn send_hash(&self, login_id: &str, password: &str) -> String {
        format!("sh-{login_id}-{password}")
    }

    fn challenge_seed(&self, request_password: &str) -> String {
        format!("cs-{request_password}")
    }

    fn combine_hash(&self, password_hash: &str, seed: &str) -> String {
        format!("ch-{password_hash}-{seed}")
    }
}

/// Client with test timeouts and a fresh cache.
pub fn test_client() -> UploadClient {
    test_client_with_cache(TokenCache::new())
}

/// Client with test timeouts sharing the given cache.
pub fn test_client_with_cache(cache: TokenCache) -> UploadClient {
    UploadClient::new(cache, Arc::new(TestHasher), ClientConfig::for_testing())
        .expect("test client config is valid")
}

/// Progress callback that records every snapshot.
pub fn progress_recorder() -> (ProgressFn, Arc<Mutex<Vec<Progress>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: ProgressFn = Arc::new(move |p| sink.lock().unwrap().push(p));
    (callback, seen)
}

/// Pseudo-random bytes that gzip cannot shrink much, for multi-chunk
/// upload bodies.
pub fn noisy_bytes(len: usize) -> Vec<u8> {
    let mut state = 0x2545f491_u32;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            (state >> 24) as u8
        })
        .collect()
}
