//! Command-line interface for the updraft upload/request client.

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::{Args, Parser, Subcommand};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use updraft_client::{ProgressFn, TokenCache, UploadClient};
use updraft_core::{ClientConfig, CredentialHasher, Credentials, Outcome};

#[derive(Parser)]
#[command(name = "updraft")]
#[command(about = "Authenticated upload/request client for portal endpoints")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct EndpointArgs {
    /// Target endpoint URL
    #[arg(long, env = "UPDRAFT_URL")]
    url: String,

    /// Authentication endpoint URL
    #[arg(long, env = "UPDRAFT_AUTH_URL")]
    auth_url: String,

    /// Login identity (omit for anonymous access)
    #[arg(long, env = "UPDRAFT_LOGIN", default_value = "")]
    login: String,

    /// Password (prefer --password-file over the command line)
    #[arg(long, env = "UPDRAFT_PASSWORD")]
    password: Option<String>,

    /// Read the password from a file
    #[arg(long)]
    password_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file as a signed, gzip-compressed multipart request
    Push {
        /// File to upload
        file: PathBuf,

        /// Print transmission progress
        #[arg(long)]
        progress: bool,

        #[command(flatten)]
        endpoint: EndpointArgs,
    },
    /// Send a JSON document to the target endpoint
    Send {
        /// Inline JSON document
        #[arg(long)]
        json: Option<String>,

        /// Read the JSON document from a file
        #[arg(long)]
        json_file: Option<PathBuf>,

        /// Brotli-compress the request body
        #[arg(long)]
        compress: bool,

        #[command(flatten)]
        endpoint: EndpointArgs,
    },
    /// Fetch the target endpoint and print the response body
    Fetch {
        #[command(flatten)]
        endpoint: EndpointArgs,
    },
}

/// Credential hasher for the portal: SHA-256 over a role-prefixed
/// input, base64-encoded.
struct PortalHasher;

fn digest_b64(input: String) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    STANDARD.encode(hasher.finalize())
}

impl CredentialHasher for PortalHasher {
    fn password_hash(&self, login_id: &str, password: &str) -> String {
        digest_b64(format!("store:{login_id}:{password}"))
    }

    fn send_hash(&self, login_id: &str, password: &str) -> String {
        digest_b64(format!("send:{login_id}:{password}"))
    }

    fn challenge_seed(&self, request_password: &str) -> String {
        digest_b64(format!("seed:{request_password}"))
    }

    fn combine_hash(&self, password_hash: &str, seed: &str) -> String {
        digest_b64(format!("combine:{password_hash}:{seed}"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let Cli { command } = Cli::parse();
    match command {
        Commands::Push {
            file,
            progress,
            endpoint,
        } => handle_push(file, progress, &endpoint).await,
        Commands::Send {
            json,
            json_file,
            compress,
            endpoint,
        } => handle_send(json, json_file, compress, &endpoint).await,
        Commands::Fetch { endpoint } => handle_fetch(&endpoint).await,
    }
}

fn build_client() -> Result<UploadClient> {
    let client = UploadClient::new(
        TokenCache::new(),
        Arc::new(PortalHasher),
        ClientConfig::default(),
    )?;
    Ok(client)
}

fn credentials(endpoint: &EndpointArgs) -> Result<Credentials> {
    if endpoint.login.is_empty() {
        return Ok(Credentials::anonymous());
    }
    let password = match (&endpoint.password, &endpoint.password_file) {
        (Some(password), _) => password.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("reading password file {}", path.display()))?
            .trim_end()
            .to_string(),
        (None, None) => {
            anyhow::bail!("--password or --password-file is required when --login is set")
        }
    };
    Ok(Credentials::new(&endpoint.login, password))
}

/// Token that fires on Ctrl-C, for graceful session cancellation.
fn cancel_on_interrupt() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\ninterrupted, cancelling");
            trigger.cancel();
        }
    });
    cancel
}

fn report(outcome: Outcome) -> Result<()> {
    if outcome.is_success() {
        if !outcome.message().is_empty() {
            println!("{}", outcome.message());
        }
        return Ok(());
    }
    anyhow::bail!("{}", outcome.message());
}

async fn handle_push(file: PathBuf, progress: bool, endpoint: &EndpointArgs) -> Result<()> {
    let client = build_client()?;
    let credentials = credentials(endpoint)?;

    let mut session = client
        .upload(&endpoint.url, &endpoint.auth_url, &file, credentials)?
        .with_cancellation(cancel_on_interrupt());
    if progress {
        let callback: ProgressFn = Arc::new(|p| {
            eprint!("\r{:>5.1}% ({}/{} bytes)", p.percent(), p.sent, p.total);
        });
        session = session.with_progress(callback);
    }

    let outcome = session.run().await;
    if progress {
        eprintln!();
    }
    report(outcome)
}

async fn handle_send(
    json: Option<String>,
    json_file: Option<PathBuf>,
    compress: bool,
    endpoint: &EndpointArgs,
) -> Result<()> {
    let client = build_client()?;
    let credentials = credentials(endpoint)?;

    let raw = match (json, json_file) {
        (Some(inline), None) => inline,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading JSON document {}", path.display()))?,
        _ => anyhow::bail!("exactly one of --json or --json-file is required"),
    };
    let document: serde_json::Value =
        serde_json::from_str(&raw).context("invalid JSON document")?;

    let outcome = client
        .request(
            &endpoint.url,
            &endpoint.auth_url,
            &document,
            compress,
            credentials,
        )?
        .with_cancellation(cancel_on_interrupt())
        .run()
        .await;
    report(outcome)
}

async fn handle_fetch(endpoint: &EndpointArgs) -> Result<()> {
    let client = build_client()?;
    let credentials = credentials(endpoint)?;

    let outcome = client
        .fetch(&endpoint.url, &endpoint.auth_url, credentials)?
        .with_cancellation(cancel_on_interrupt())
        .run()
        .await;
    report(outcome)
}
