//! Single-use upload and request sessions.

use crate::auth::Authorizer;
use crate::cache::TokenCache;
use crate::error::{Error, Result};
use crate::payload;
use crate::progress::{ProgressBody, ProgressFn};
use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, StatusCode, Url};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use updraft_core::Error as CoreError;
use updraft_core::{
    ClientConfig, CredentialHasher, Credentials, FailureKind, Outcome, SessionState,
    SessionStateCell,
};

const REUSE_UPLOAD: &str =
    "an upload session cannot be reused; create a new session to upload another file";
const REUSE_REQUEST: &str =
    "a request session cannot be reused; create a new session to send another request";

/// Entry point of the client.
///
/// Owns the HTTP connection pool, the token cache, the credential
/// hasher, and the configuration, and builds single-use sessions that
/// share them. Clones share all of these.
#[derive(Clone)]
pub struct UploadClient {
    http: reqwest::Client,
    cache: TokenCache,
    hasher: Arc<dyn CredentialHasher>,
    config: ClientConfig,
}

impl UploadClient {
    /// Create a client.
    ///
    /// Fails if the configuration does not validate or the HTTP client
    /// cannot be constructed from it.
    pub fn new(
        cache: TokenCache,
        hasher: Arc<dyn CredentialHasher>,
        config: ClientConfig,
    ) -> updraft_core::Result<Self> {
        config.validate().map_err(CoreError::InvalidConfig)?;
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| CoreError::InvalidConfig(err.to_string()))?;
        Ok(Self {
            http,
            cache,
            hasher,
            config,
        })
    }

    /// Build a session that uploads one file as a signed multipart
    /// request.
    ///
    /// The resource name is the file's final path component; it keys
    /// the payload signature and is sent as the part's file name.
    /// Endpoint URLs are validated here; the file itself is read when
    /// the session runs.
    pub fn upload(
        &self,
        target_url: &str,
        auth_url: &str,
        file_path: impl Into<PathBuf>,
        credentials: Credentials,
    ) -> updraft_core::Result<UploadSession> {
        let file_path: PathBuf = file_path.into();
        let resource_name = file_path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                CoreError::InvalidUploadFile(format!(
                    "no usable file name in {}",
                    file_path.display()
                ))
            })?;
        Ok(UploadSession {
            core: self.session_core(target_url, auth_url, credentials)?,
            file_path,
            resource_name,
            progress: None,
        })
    }

    /// Build a session that POSTs `data` as a JSON document, optionally
    /// Brotli-compressed.
    ///
    /// Serialization happens here, so a payload that cannot be encoded
    /// is rejected at creation rather than mid-session.
    pub fn request<T: Serialize>(
        &self,
        target_url: &str,
        auth_url: &str,
        data: &T,
        compress: bool,
        credentials: Credentials,
    ) -> updraft_core::Result<RequestSession> {
        let json =
            serde_json::to_vec(data).map_err(|err| CoreError::InvalidPayload(err.to_string()))?;
        Ok(RequestSession {
            core: self.session_core(target_url, auth_url, credentials)?,
            kind: RequestKind::Send {
                json: Bytes::from(json),
                compress,
            },
        })
    }

    /// Build a session that GETs the target and yields the response
    /// body through its outcome.
    pub fn fetch(
        &self,
        target_url: &str,
        auth_url: &str,
        credentials: Credentials,
    ) -> updraft_core::Result<RequestSession> {
        Ok(RequestSession {
            core: self.session_core(target_url, auth_url, credentials)?,
            kind: RequestKind::Fetch,
        })
    }

    /// The shared token cache.
    pub fn token_cache(&self) -> &TokenCache {
        &self.cache
    }

    fn session_core(
        &self,
        target_url: &str,
        auth_url: &str,
        credentials: Credentials,
    ) -> updraft_core::Result<SessionCore> {
        let target_url = Url::parse(target_url)
            .map_err(|err| CoreError::InvalidTargetUrl(format!("{target_url}: {err}")))?;
        Url::parse(auth_url)
            .map_err(|err| CoreError::InvalidAuthUrl(format!("{auth_url}: {err}")))?;
        Ok(SessionCore {
            http: self.http.clone(),
            authorizer: Authorizer::new(
                self.http.clone(),
                self.cache.clone(),
                Arc::clone(&self.hasher),
                self.config.clone(),
            ),
            credentials,
            target_url,
            auth_url: auth_url.to_string(),
            state: SessionStateCell::new(),
            cancel: CancellationToken::new(),
            config: self.config.clone(),
        })
    }
}

/// Pieces shared by both session flavors.
struct SessionCore {
    http: reqwest::Client,
    authorizer: Authorizer,
    credentials: Credentials,
    target_url: Url,
    auth_url: String,
    state: SessionStateCell,
    cancel: CancellationToken,
    config: ClientConfig,
}

impl SessionCore {
    async fn authorize(&self) -> Result<Option<String>> {
        self.authorizer
            .authorize(&self.credentials, &self.auth_url, &self.cancel)
            .await
    }

    /// Send a request, folding failures caused by cancellation back
    /// into `Cancelled`.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let result = tokio::select! {
            _ = self.cancel.cancelled() => return Err(Error::Cancelled),
            result = request.send() => result,
        };
        match result {
            Ok(response) => Ok(response),
            Err(_) if self.cancel.is_cancelled() => Err(Error::Cancelled),
            Err(err) => Err(err.into()),
        }
    }
}

/// Reduce a response to success or rejection.
///
/// Exactly HTTP 200 counts as success. The rejection message carries
/// the numeric status and the best-effort response body.
async fn interpret(response: reqwest::Response) -> Result<()> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::rejected(status.as_u16(), &body))
}

/// One file upload: gzip, sign, stream as multipart `signature` +
/// `data`.
///
/// Sessions are single-use. `run` consumes the one `Idle` -> `Running`
/// transition; a second call observes `Completed` and reports a reuse
/// failure without touching the network.
pub struct UploadSession {
    core: SessionCore,
    file_path: PathBuf,
    resource_name: String,
    progress: Option<ProgressFn>,
}

impl UploadSession {
    /// Attach a progress callback, invoked once per transmitted chunk.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.core.cancel = cancel;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.core.state.get()
    }

    /// Run the upload. Never returns an error: every failure is folded
    /// into the outcome, and the session is `Completed` afterwards no
    /// matter what happened.
    pub async fn run(&self) -> Outcome {
        if !self.core.state.begin() {
            return Outcome::failure(FailureKind::Reuse, REUSE_UPLOAD);
        }

        tracing::info!(
            url = %self.core.target_url,
            file = %self.file_path.display(),
            "starting file upload"
        );

        let result = self.perform().await;
        self.core.state.complete();

        match result {
            Ok(()) => {
                tracing::info!(url = %self.core.target_url, "file upload complete");
                Outcome::success()
            }
            Err(err) => {
                tracing::warn!(
                    url = %self.core.target_url,
                    kind = %err.kind(),
                    status = ?err.status(),
                    error = %err,
                    "file upload failed"
                );
                Outcome::failure(err.kind(), err.to_string())
            }
        }
    }

    async fn perform(&self) -> Result<()> {
        if self.core.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let prepared =
            payload::prepare_file(&self.file_path, &self.resource_name, &self.core.cancel).await?;

        let bearer = self.core.authorize().await?;

        let body = ProgressBody::new(
            prepared.data,
            self.core.config.progress_chunk_size,
            self.progress.clone(),
            self.core.cancel.clone(),
        );
        let total = body.len();
        let part = Part::stream_with_length(Body::wrap_stream(body), total)
            .file_name(self.resource_name.clone());
        let form = Form::new()
            .text("signature", prepared.signature)
            .part("data", part);

        let mut request = self
            .core
            .http
            .post(self.core.target_url.clone())
            .header(CACHE_CONTROL, "no-cache")
            .multipart(form);
        if let Some(bearer) = bearer {
            request = request.header(AUTHORIZATION, bearer);
        }

        let response = self.core.send(request).await?;
        interpret(response).await
    }
}

enum RequestKind {
    /// JSON POST, optionally Brotli-compressed.
    Send { json: Bytes, compress: bool },
    /// Plain GET; the response body rides back in the outcome.
    Fetch,
}

/// One structured request: a JSON POST or a plain GET.
///
/// Single-use, with the same lifecycle contract as [`UploadSession`].
pub struct RequestSession {
    core: SessionCore,
    kind: RequestKind,
}

impl RequestSession {
    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.core.cancel = cancel;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.core.state.get()
    }

    /// Run the request. Never returns an error; on a successful GET the
    /// outcome's message is the response body.
    pub async fn run(&self) -> Outcome {
        if !self.core.state.begin() {
            return Outcome::failure(FailureKind::Reuse, REUSE_REQUEST);
        }

        tracing::info!(url = %self.core.target_url, "starting request");

        let result = match &self.kind {
            RequestKind::Send { json, compress } => self
                .perform_send(json.clone(), *compress)
                .await
                .map(|()| Outcome::success()),
            RequestKind::Fetch => self.perform_fetch().await.map(Outcome::success_with_body),
        };
        self.core.state.complete();

        match result {
            Ok(outcome) => {
                tracing::info!(url = %self.core.target_url, "request complete");
                outcome
            }
            Err(err) => {
                tracing::warn!(
                    url = %self.core.target_url,
                    kind = %err.kind(),
                    status = ?err.status(),
                    error = %err,
                    "request failed"
                );
                Outcome::failure(err.kind(), err.to_string())
            }
        }
    }

    async fn perform_send(&self, json: Bytes, compress: bool) -> Result<()> {
        if self.core.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let body = if compress {
            payload::compress_brotli(&json, &self.core.cancel).await?
        } else {
            json
        };

        let bearer = self.core.authorize().await?;

        let mut request = self
            .core
            .http
            .post(self.core.target_url.clone())
            .header(CACHE_CONTROL, "no-cache")
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(bearer) = bearer {
            request = request.header(AUTHORIZATION, bearer);
        }

        let response = self.core.send(request).await?;
        interpret(response).await
    }

    async fn perform_fetch(&self) -> Result<String> {
        if self.core.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let bearer = self.core.authorize().await?;

        let mut request = self
            .core
            .http
            .get(self.core.target_url.clone())
            .header(CACHE_CONTROL, "no-cache");
        if let Some(bearer) = bearer {
            request = request.header(AUTHORIZATION, bearer);
        }

        let response = self.core.send(request).await?;
        let status = response.status();
        if status == StatusCode::OK {
            return Ok(response.text().await.unwrap_or_default());
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::rejected(status.as_u16(), &body))
    }
}
