//! Optimistic-concurrency publish of a graph snapshot to a remote
//! versioned-file content API.
//!
//! The remote contract is GitHub's contents endpoint: a GET returns the
//! current version token ("sha"), a conditional PUT writes new content
//! against an expected token and fails when the token is stale. The
//! pipeline fetches a fresh token before every write attempt and retries
//! conflicts with linear backoff.

use crate::{GraphDocument, Settings};
use async_trait::async_trait;
use base64::Engine;
use log::{info, warn};
use reqwest::header::{ACCEPT, CACHE_CONTROL, PRAGMA, USER_AGENT};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

const API_ROOT: &str = "https://api.github.com";
const AGENT: &str = concat!("graph_node_editor/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Structured failure of a publish operation. Network, parse, and
/// credential problems all normalize into this type; nothing escapes
/// the pipeline boundary as a panic or a raw transport error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PublishError {
    #[error("no access token configured")]
    CredentialMissing,

    #[error("another publish is still in flight")]
    InFlight,

    #[error("failed to encode snapshot: {0}")]
    Snapshot(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("remote rejected the update: {message}")]
    Remote {
        status: Option<u16>,
        message: String,
    },
}

impl PublishError {
    /// HTTP status carried by a remote rejection, when available
    pub fn status(&self) -> Option<u16> {
        match self {
            PublishError::Remote { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether this failure is an optimistic-lock conflict worth
    /// retrying with a fresh version token
    pub fn is_version_conflict(&self) -> bool {
        match self {
            PublishError::Remote { status, message } => {
                matches!(status, Some(409) | Some(422))
                    || is_version_conflict_message(message)
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for PublishError {
    fn from(err: reqwest::Error) -> Self {
        PublishError::Network(err.to_string())
    }
}

/// Text heuristic for stale-token conflicts. The remote API has no
/// stable error code for them, so this matches the known phrasings;
/// a structured 409/422 status takes precedence where present.
pub fn is_version_conflict_message(message: &str) -> bool {
    let text = message.to_lowercase();
    text.contains("does not match")
        || (text.contains("sha") && text.contains("match"))
        || text.contains("stale")
}

/// Retry budget and backoff for conflict retries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Backoff grows linearly: `base_backoff * attempt_number`
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(400),
        }
    }
}

/// Remote versioned-file store the pipeline publishes to. The seam
/// exists so tests can script conflict sequences without a network.
#[async_trait]
pub trait ContentHost: Send + Sync {
    /// Whether a credential is configured; checked before any network call
    fn ready(&self) -> bool;

    /// Fetch the current version token, with intermediary caching defeated
    async fn fetch_version(&self) -> Result<String, PublishError>;

    /// Conditionally write base64 content against an expected version token
    async fn write_content(&self, content_b64: &str, version: &str) -> Result<(), PublishError>;
}

/// GitHub contents-API implementation of [`ContentHost`]
pub struct GitHubHost {
    client: reqwest::Client,
    settings: Settings,
}

impl GitHubHost {
    pub fn new(settings: Settings) -> Result<Self, PublishError> {
        Self::with_timeout(settings, DEFAULT_TIMEOUT)
    }

    /// Build a host with an explicit per-request timeout, so a hung
    /// request fails the attempt instead of blocking the publish forever
    pub fn with_timeout(settings: Settings, timeout: Duration) -> Result<Self, PublishError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, settings })
    }

    fn contents_url(&self) -> String {
        format!(
            "{API_ROOT}/repos/{}/contents/{}",
            self.settings.repo, self.settings.file_path
        )
    }

    fn token(&self) -> Result<&str, PublishError> {
        self.settings
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(PublishError::CredentialMissing)
    }
}

#[derive(Debug, Deserialize)]
struct ContentInfo {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

#[async_trait]
impl ContentHost for GitHubHost {
    fn ready(&self) -> bool {
        self.settings.is_configured()
    }

    async fn fetch_version(&self) -> Result<String, PublishError> {
        // The endpoint can briefly serve a stale token through edge
        // caches right after a write; vary the URL and disable caching.
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let url = format!(
            "{}?ref={}&_={}",
            self.contents_url(),
            self.settings.branch,
            nonce
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.token()?)
            .header(ACCEPT, "application/vnd.github.v3+json")
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .header(USER_AGENT, AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PublishError::Remote {
                status: Some(response.status().as_u16()),
                message: "failed to read the remote version token".to_string(),
            });
        }

        let info: ContentInfo = response.json().await?;
        Ok(info.sha)
    }

    async fn write_content(&self, content_b64: &str, version: &str) -> Result<(), PublishError> {
        let body = json!({
            "message": "Update nodes.json via editor",
            "content": content_b64,
            "sha": version,
            "branch": self.settings.branch,
        });

        let response = self
            .client
            .put(self.contents_url())
            .bearer_auth(self.token()?)
            .header(ACCEPT, "application/vnd.github.v3+json")
            .header(USER_AGENT, AGENT)
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status().as_u16();
        let message = response
            .json::<ApiError>()
            .await
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| format!("HTTP {status}"));

        Err(PublishError::Remote {
            status: Some(status),
            message,
        })
    }
}

/// Publishes graph snapshots to a [`ContentHost`] with conflict retries
/// and a single-flight guard
pub struct PublishPipeline<H: ContentHost> {
    host: H,
    policy: RetryPolicy,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag on every exit path, including errors
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<H: ContentHost> PublishPipeline<H> {
    pub fn new(host: H) -> Self {
        Self::with_policy(host, RetryPolicy::default())
    }

    pub fn with_policy(host: H, policy: RetryPolicy) -> Self {
        Self {
            host,
            policy,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Publish a snapshot.
    ///
    /// Fails fast without touching the network when no credential is
    /// configured, or when a previous publish has not settled yet. The
    /// payload is encoded once and reused across attempts; each attempt
    /// fetches a fresh version token. Conflicts back off linearly and
    /// retry; any other failure returns immediately.
    pub async fn publish(&self, snapshot: &GraphDocument) -> Result<(), PublishError> {
        if !self.host.ready() {
            return Err(PublishError::CredentialMissing);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(PublishError::InFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let payload = encode_snapshot(snapshot)?;

        let mut last_err = PublishError::Remote {
            status: None,
            message: "unknown publish error".to_string(),
        };

        for attempt in 1..=self.policy.max_attempts {
            // A failed token read aborts the whole publish; only write
            // conflicts are worth retrying.
            let version = self.host.fetch_version().await?;

            match self.host.write_content(&payload, &version).await {
                Ok(()) => {
                    info!("published snapshot on attempt {attempt}");
                    return Ok(());
                }
                Err(err) => {
                    if !err.is_version_conflict() {
                        return Err(err);
                    }
                    warn!("version conflict on attempt {attempt}: {err}");
                    last_err = err;
                    if attempt < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.base_backoff * attempt).await;
                    }
                }
            }
        }

        Err(last_err)
    }
}

/// Serialize a snapshot as pretty JSON and base64-encode it for the
/// content API
pub fn encode_snapshot(snapshot: &GraphDocument) -> Result<String, PublishError> {
    let text = serde_json::to_string_pretty(snapshot)
        .map_err(|err| PublishError::Snapshot(err.to_string()))?;
    Ok(base64::engine::general_purpose::STANDARD.encode(text))
}
