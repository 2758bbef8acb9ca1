use serde::Deserialize;

/// Main configuration structure for scene-scraper
///
/// Every table is optional; an empty file yields the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub collector: CollectorConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub sites: SitesConfig,
    /// Extra VRPorn studios registered next to the built-in ones
    #[serde(default)]
    pub vrporn: Vec<VrPornEntry>,
}

/// Fetch behavior shared by every collector
///
/// Each extractor builds its own collectors from this template, so the
/// values are per source, never pooled.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum time between two requests of one collector (milliseconds)
    #[serde(rename = "request-delay-ms", default)]
    pub request_delay_ms: u64,

    /// Maximum listing pages walked per run, 0 for no limit
    #[serde(rename = "max-listing-pages", default)]
    pub max_listing_pages: u32,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            request_delay_ms: 0,
            max_listing_pages: 0,
        }
    }
}

/// Fan-in behavior
#[derive(Debug, Clone, Deserialize)]
pub struct OrchestratorConfig {
    /// Capacity of the shared output channel; producers wait when it is full
    #[serde(rename = "channel-capacity", default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Where "source refreshed" timestamps are kept
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateConfig {
    /// JSON file for last-update timestamps; in-memory only when absent
    #[serde(rename = "site-state-path")]
    pub site_state_path: Option<String>,
}

/// Built-in site settings
#[derive(Debug, Clone, Deserialize)]
pub struct SitesConfig {
    /// Register the bundled VRPorn studios
    #[serde(default = "default_true")]
    pub builtin: bool,

    #[serde(rename = "vrporn-base-url", default = "default_vrporn_base_url")]
    pub vrporn_base_url: String,

    #[serde(rename = "javlibrary-base-url", default = "default_javlibrary_base_url")]
    pub javlibrary_base_url: String,
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self {
            builtin: true,
            vrporn_base_url: default_vrporn_base_url(),
            javlibrary_base_url: default_javlibrary_base_url(),
        }
    }
}

/// A VRPorn studio page to scrape
#[derive(Debug, Clone, Deserialize)]
pub struct VrPornEntry {
    /// Studio slug on vrporn.com, also the source id
    pub id: String,

    /// Display name, also the site label on records
    pub name: String,

    /// Production company recorded as the studio
    pub company: String,

    #[serde(rename = "avatar-url", default)]
    pub avatar_url: String,
}

fn default_user_agent() -> String {
    format!("scene-scraper/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_channel_capacity() -> usize {
    64
}

fn default_true() -> bool {
    true
}

fn default_vrporn_base_url() -> String {
    "https://vrporn.com".to_string()
}

fn default_javlibrary_base_url() -> String {
    "https://www.javlibrary.com".to_string()
}
