//! HTTP fetching for one collector
//!
//! A `Collector` owns everything about how one source is fetched:
//! - its own HTTP client (connection pool, timeouts, user agent)
//! - the set of domains it may visit
//! - the set of URLs it already visited
//! - a minimum delay between its requests
//!
//! Collectors are never shared between sources.

use crate::collector::document::Page;
use crate::config::CollectorConfig;
use crate::ScrapeError;
use reqwest::{Client, StatusCode};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

/// Errors from fetching a single page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("Domain not allowed for {url}")]
    DomainNotAllowed { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}")]
    Connect { url: String },

    #[error("HTTP error for {url}: {source}")]
    Request { url: String, source: reqwest::Error },
}

impl FetchError {
    /// Returns true for 404/410, pages that will not come back on retry
    pub fn is_dead_link(&self) -> bool {
        matches!(self, Self::Status { status: 404 | 410, .. })
    }

    /// Returns true if the server asked us to slow down (HTTP 429)
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Status { status: 429, .. })
    }

    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            Self::Connect {
                url: url.to_string(),
            }
        } else {
            Self::Request {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// Builds an HTTP client for one collector
///
/// # Example
///
/// ```no_run
/// use scene_scraper::collector::build_http_client;
/// use scene_scraper::config::CollectorConfig;
///
/// let client = build_http_client(&CollectorConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CollectorConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetch state scoped to one source
#[derive(Debug)]
pub struct Collector {
    client: Client,
    allowed_domains: Vec<String>,
    request_delay: Duration,
    visited: HashSet<String>,
    last_request: Option<Instant>,
    request_count: u32,
}

impl Collector {
    /// Creates a collector restricted to `allowed_domains`
    ///
    /// A domain also admits its subdomains. An empty list admits every host.
    pub fn new(config: &CollectorConfig, allowed_domains: &[&str]) -> Result<Self, ScrapeError> {
        let client = build_http_client(config)?;

        Ok(Self {
            client,
            allowed_domains: allowed_domains
                .iter()
                .map(|d| d.trim().trim_start_matches("www.").to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
            request_delay: Duration::from_millis(config.request_delay_ms),
            visited: HashSet::new(),
            last_request: None,
            request_count: 0,
        })
    }

    /// Creates a collector restricted to the host of `base_url`
    pub fn for_base_url(config: &CollectorConfig, base_url: &str) -> Result<Self, ScrapeError> {
        let url = Url::parse(base_url)?;
        let host = url.host_str().unwrap_or_default().to_string();
        Self::new(config, &[host.as_str()])
    }

    /// Returns true if `url` points at one of the allowed domains
    pub fn is_allowed(&self, url: &Url) -> bool {
        if self.allowed_domains.is_empty() {
            return true;
        }

        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_lowercase();
        let host = host.trim_start_matches("www.");

        self.allowed_domains
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{}", domain)))
    }

    /// Returns true if `url` was already requested by this collector
    pub fn has_visited(&self, url: &str) -> bool {
        match visit_key(url) {
            Ok(key) => self.visited.contains(&key),
            Err(_) => false,
        }
    }

    /// Number of requests sent so far
    pub fn request_count(&self) -> u32 {
        self.request_count
    }

    /// Fetches `url` unless it was already visited
    ///
    /// Returns `Ok(None)` for a repeat visit, so traversals never loop.
    pub async fn visit(&mut self, url: &str) -> Result<Option<Page>, FetchError> {
        let key = visit_key(url)?;
        if !self.visited.insert(key) {
            tracing::trace!("Skipping already visited {}", url);
            return Ok(None);
        }

        self.get(url).await.map(Some)
    }

    /// Fetches `url` regardless of earlier visits
    pub async fn fetch(&mut self, url: &str) -> Result<Page, FetchError> {
        let key = visit_key(url)?;
        self.visited.insert(key);
        self.get(url).await
    }

    async fn get(&mut self, url: &str) -> Result<Page, FetchError> {
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        if !self.is_allowed(&parsed) {
            return Err(FetchError::DomainNotAllowed {
                url: url.to_string(),
            });
        }

        self.wait_for_turn().await;
        self.request_count += 1;
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!("Rate limited while fetching {}", url);
            }
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        Ok(Page::new(final_url, status.as_u16(), body))
    }

    /// Sleeps until `request_delay` has passed since the previous request
    async fn wait_for_turn(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.request_delay {
                tokio::time::sleep(self.request_delay - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

/// Visit key: the absolute URL without its fragment
fn visit_key(url: &str) -> Result<String, FetchError> {
    let mut parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    parsed.set_fragment(None);
    Ok(parsed.to_string())
}
