//! Progress-reporting request bodies.

use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio_util::sync::CancellationToken;

/// A snapshot of transmission progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Bytes handed to the transport so far.
    pub sent: u64,
    /// Total payload size, clamped to at least 1.
    pub total: u64,
}

impl Progress {
    /// Build a snapshot; `total` is clamped so the ratio is always
    /// defined.
    pub fn new(sent: u64, total: u64) -> Self {
        Self {
            sent,
            total: total.max(1),
        }
    }

    /// Completion percentage.
    pub fn percent(&self) -> f64 {
        (self.sent as f64 * 100.0) / self.total as f64
    }
}

/// Callback invoked once per transmitted chunk.
///
/// Invoked synchronously on the streaming path; a slow callback stalls
/// the upload.
pub type ProgressFn = Arc<dyn Fn(Progress) + Send + Sync>;

/// Request body that yields fixed-size chunks of an in-memory payload,
/// reporting cumulative progress as each chunk is handed to the
/// transport.
///
/// The cancellation signal is checked before every chunk; once
/// observed, the stream fails and no further bytes or callbacks are
/// produced. Chunks are yielded strictly in order, so callbacks are
/// sequential and monotonically non-decreasing.
pub struct ProgressBody {
    data: Bytes,
    offset: usize,
    chunk_size: usize,
    sent: u64,
    total: u64,
    progress: Option<ProgressFn>,
    cancel: CancellationToken,
}

impl ProgressBody {
    pub fn new(
        data: Bytes,
        chunk_size: usize,
        progress: Option<ProgressFn>,
        cancel: CancellationToken,
    ) -> Self {
        let total = (data.len() as u64).max(1);
        Self {
            data,
            offset: 0,
            chunk_size: chunk_size.max(1),
            sent: 0,
            total,
            progress,
            cancel,
        }
    }

    /// Exact byte length of the body.
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Stream for ProgressBody {
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.cancel.is_cancelled() {
            return Poll::Ready(Some(Err(std::io::Error::other("operation cancelled"))));
        }

        if this.offset >= this.data.len() {
            return Poll::Ready(None);
        }

        let end = (this.offset + this.chunk_size).min(this.data.len());
        let chunk = this.data.slice(this.offset..end);
        this.offset = end;
        this.sent += chunk.len() as u64;

        if let Some(progress) = &this.progress {
            progress(Progress::new(this.sent, this.total));
        }

        Poll::Ready(Some(Ok(chunk)))
    }
}
