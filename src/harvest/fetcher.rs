//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building per-session HTTP clients with the configured user agent
//! - Optional forwarding-proxy URL rewriting
//! - Error classification
//! - Retry logic with a fresh session per attempt
//! - Best-effort diagnostic snapshots on failed attempts

use crate::config::{ClientConfig, ProxyConfig};
use crate::url::proxy_url;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by fetch operations
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Not found: {url}")]
    NotFound { url: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Empty response body for {url}")]
    EmptyBody { url: String },

    #[error("Failed to open session: {0}")]
    Session(String),

    #[error("Proxy rewrite failed: {0}")]
    ProxyRewrite(String),

    #[error("Exhausted {attempts} attempts for {url}")]
    Exhausted { url: String, attempts: u32 },
}

/// Trait for one isolated request session
///
/// A session issues navigations for URLs and returns the raw response body.
/// Sessions are exclusively owned by the task that opened them and are
/// released when dropped, on every exit path.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a URL and returns the raw response body
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Captures a best-effort diagnostic snapshot for a failed attempt
    ///
    /// Must never fail loudly; the original fetch error always wins.
    fn capture_diagnostic(&self, _context: &str, _error: &FetchError) {}
}

/// Trait for the shared session-spawning context
///
/// The factory is the heavyweight resource that lives for the whole run;
/// opening an individual session from it is cheap. Implementations must be
/// shareable by reference across concurrent tasks.
pub trait SessionFactory: Send + Sync {
    type Session: Fetcher;

    /// Opens a fresh isolated session; no state leaks between sessions
    fn open_session(&self) -> Result<Self::Session, FetchError>;
}

/// Builds an HTTP client for a single session
///
/// # Arguments
///
/// * `config` - The client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// One isolated HTTP session
///
/// Wraps a dedicated reqwest client so cookies and connection state never
/// leak between retry attempts.
pub struct HttpSession {
    client: Client,
    proxy: Option<ProxyConfig>,
    snapshot_dir: Option<PathBuf>,
}

impl HttpSession {
    /// Rewrites the target URL through the forwarding proxy when configured
    fn request_url(&self, url: &str) -> Result<String, FetchError> {
        match &self.proxy {
            Some(proxy) => {
                proxy_url(proxy, url).map_err(|e| FetchError::ProxyRewrite(e.to_string()))
            }
            None => Ok(url.to_string()),
        }
    }
}

#[async_trait]
impl Fetcher for HttpSession {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let target = self.request_url(url)?;

        let response = match self.client.get(&target).send().await {
            Ok(response) => response,
            Err(e) => {
                // Classify error
                return if e.is_timeout() {
                    Err(FetchError::Timeout {
                        url: url.to_string(),
                    })
                } else {
                    Err(FetchError::Network {
                        url: url.to_string(),
                        message: e.to_string(),
                    })
                };
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn capture_diagnostic(&self, context: &str, error: &FetchError) {
        let Some(dir) = &self.snapshot_dir else {
            return;
        };

        let path = dir.join(format!("ERROR-{}.txt", context));
        let body = format!("{}\n", error);
        if let Err(e) = std::fs::create_dir_all(dir).and_then(|_| std::fs::write(&path, body)) {
            tracing::debug!("Could not write snapshot {}: {}", path.display(), e);
        }
    }
}

/// Shared factory for opening isolated HTTP sessions
///
/// Holds the session configuration for the whole run. Each `open_session`
/// call builds a fresh client, so retry attempts never share state.
pub struct HttpSessionFactory {
    client_config: ClientConfig,
    proxy: Option<ProxyConfig>,
}

impl HttpSessionFactory {
    pub fn new(client_config: ClientConfig, proxy: Option<ProxyConfig>) -> Self {
        Self {
            client_config,
            proxy,
        }
    }
}

impl SessionFactory for HttpSessionFactory {
    type Session = HttpSession;

    fn open_session(&self) -> Result<HttpSession, FetchError> {
        let client =
            build_http_client(&self.client_config).map_err(|e| FetchError::Session(e.to_string()))?;

        Ok(HttpSession {
            client,
            proxy: self.proxy.clone(),
            snapshot_dir: self.client_config.snapshot_dir.as_ref().map(PathBuf::from),
        })
    }
}

/// Fetches a URL with bounded retries, one fresh session per attempt
///
/// The attempt counter starts at 0 and the loop runs while
/// `tries <= max_retries`, so `max_retries = N` permits N + 1 total attempts.
/// This inclusive bound is deliberate and pinned by tests.
///
/// On success the body is returned immediately and remaining attempts are not
/// consumed. When `require_content` is set, a nominally successful fetch with
/// an empty body counts as a failed attempt. Each failure triggers a
/// best-effort diagnostic snapshot and is logged with the retries remaining.
/// Every session is released when its attempt ends, on every exit path.
///
/// # Arguments
///
/// * `factory` - The shared session factory
/// * `url` - The URL to fetch
/// * `max_retries` - Retries permitted after the first attempt
/// * `require_content` - Whether an empty body is a failure
/// * `context` - Short name used for diagnostic snapshots
///
/// # Returns
///
/// * `Ok(String)` - The raw response body
/// * `Err(FetchError::Exhausted)` - All attempts failed
pub async fn fetch_with_retry<F: SessionFactory>(
    factory: &F,
    url: &str,
    max_retries: u32,
    require_content: bool,
    context: &str,
) -> Result<String, FetchError> {
    let mut tries: u32 = 0;

    while tries <= max_retries {
        let session = factory.open_session()?;

        let outcome = match session.fetch(url).await {
            Ok(body) if require_content && body.is_empty() => Err(FetchError::EmptyBody {
                url: url.to_string(),
            }),
            other => other,
        };

        match outcome {
            Ok(body) => return Ok(body),
            Err(error) => {
                session.capture_diagnostic(context, &error);
                tracing::warn!(
                    "Fetch attempt failed for {} ({}), retries left: {}",
                    context,
                    error,
                    max_retries - tries
                );
                tries += 1;
            }
        }
    }

    Err(FetchError::Exhausted {
        url: url.to_string(),
        attempts: tries,
    })
}
