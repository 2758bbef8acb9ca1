//! Configuration module for scene-scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use scene_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scene-scraper.toml")).unwrap();
//! println!("Output channel capacity: {}", config.orchestrator.channel_capacity);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CollectorConfig, Config, OrchestratorConfig, SitesConfig, StateConfig, VrPornEntry,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, config_hash, load_config, load_config_with_hash, parse_config,
};
