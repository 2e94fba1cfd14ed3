//! Payload preparation: compression and signing.

use crate::error::{Error, Result};
use async_compression::tokio::write::{BrotliEncoder, GzipEncoder};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

type HmacSha1 = Hmac<Sha1>;

/// How many payload bytes are fed to an encoder per write.
const ENCODER_WRITE_SIZE: usize = 64 * 1024;

/// A payload ready for the wire.
#[derive(Clone, Debug)]
pub struct PreparedPayload {
    /// The exact bytes that will be transmitted.
    pub data: Bytes,
    /// Base64 HMAC over `data`, keyed by the resource name.
    pub signature: String,
}

/// Gzip-compress a payload in memory.
///
/// The cancellation signal is checked between encoder writes, so large
/// payloads abort promptly.
pub async fn compress_gzip(data: &[u8], cancel: &CancellationToken) -> Result<Bytes> {
    let mut encoder = GzipEncoder::with_quality(Vec::new(), async_compression::Level::Default);
    for chunk in data.chunks(ENCODER_WRITE_SIZE) {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        encoder.write_all(chunk).await?;
    }
    encoder.shutdown().await?;
    Ok(Bytes::from(encoder.into_inner()))
}

/// Brotli-compress a payload in memory.
pub async fn compress_brotli(data: &[u8], cancel: &CancellationToken) -> Result<Bytes> {
    let mut encoder = BrotliEncoder::with_quality(Vec::new(), async_compression::Level::Default);
    for chunk in data.chunks(ENCODER_WRITE_SIZE) {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        encoder.write_all(chunk).await?;
    }
    encoder.shutdown().await?;
    Ok(Bytes::from(encoder.into_inner()))
}

/// Sign wire bytes with HMAC-SHA1 keyed by the resource name,
/// base64-encoded.
///
/// The signature binds the payload to its resource name and is always
/// computed over the final wire bytes, after compression.
pub fn sign(data: &[u8], resource_name: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(resource_name.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(data);
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Prepare a file payload: read it, gzip it, sign the result.
///
/// An empty compressed result is reported as a cancelled operation.
pub async fn prepare_file(
    path: &Path,
    resource_name: &str,
    cancel: &CancellationToken,
) -> Result<PreparedPayload> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let raw = tokio::fs::read(path).await?;
    let data = compress_gzip(&raw, cancel).await?;
    if data.is_empty() {
        return Err(Error::Cancelled);
    }

    let signature = sign(&data, resource_name);
    tracing::debug!(
        resource = resource_name,
        raw_len = raw.len(),
        compressed_len = data.len(),
        "prepared file payload"
    );
    Ok(PreparedPayload { data, signature })
}
