//! Scene-Scraper: concurrent media metadata ingestion
//!
//! This crate runs many independent site extractors in parallel, normalizes
//! what they find into one canonical [`ScrapedScene`] shape and streams the
//! records to a single consumer. Extractors are registered in an explicit
//! [`Registry`] and driven by the [`Orchestrator`].

pub mod collector;
pub mod config;
pub mod extractor;
pub mod model;
pub mod orchestrator;
pub mod registry;
pub mod sites;
pub mod state;

use thiserror::Error;

/// Main error type for scene-scraper operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] collector::FetchError),

    #[error("Registry error: {0}")]
    Registry(#[from] registry::RegistryError),

    #[error("Output sink closed before {site} finished")]
    SinkClosed { site: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Site state error: {0}")]
    SiteState(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for scene-scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extractor::{ScrapeContext, SiteExtractor};
pub use model::{ScrapedScene, SceneType, TrailerScrape, TrailerType};
pub use orchestrator::{Orchestrator, ScrapeRun};
pub use registry::{Registration, Registry, ScraperInfo};
pub use state::{KnownScenes, SiteUpdater};
