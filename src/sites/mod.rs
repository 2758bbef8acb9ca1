//! Bundled site extractors
//!
//! Sites are registered explicitly at startup: [`register_defaults`] adds the
//! built-in VRPorn studios, [`register_from_config`] adds those plus every
//! `[[vrporn]]` entry of the configuration. JavLibrary is query-driven and is
//! used directly through [`JavLibrary::search`].

mod javlibrary;
mod vrporn;

pub use javlibrary::{classify_page, parse_detail, JavLibrary, JavPage};
pub use vrporn::{default_studios, parse_scene, VrPornExtractor, VrPornStudio};

use crate::config::{Config, VrPornEntry};
use crate::registry::{Registry, RegistryError};
use std::sync::Arc;

impl From<&VrPornEntry> for VrPornStudio {
    fn from(entry: &VrPornEntry) -> Self {
        VrPornStudio::new(&entry.id, &entry.name, &entry.company, &entry.avatar_url)
    }
}

/// Registers one VRPorn studio under its slug
pub fn register_vrporn_studio(
    registry: &Registry,
    studio: VrPornStudio,
    config: &Config,
) -> Result<(), RegistryError> {
    let id = studio.id.clone();
    let name = studio.display_name();
    let avatar_url = studio.avatar_url.clone();
    let extractor = VrPornExtractor::new(
        studio,
        &config.sites.vrporn_base_url,
        config.collector.clone(),
    );
    registry.register(id, name, avatar_url, Arc::new(extractor))
}

/// Registers the built-in studios
pub fn register_defaults(registry: &Registry, config: &Config) -> Result<(), RegistryError> {
    for studio in default_studios() {
        register_vrporn_studio(registry, studio, config)?;
    }
    Ok(())
}

/// Registers everything the configuration asks for
///
/// Built-ins come first (unless `sites.builtin` is off), then configured
/// studios; a configured studio with a built-in id replaces it.
pub fn register_from_config(registry: &Registry, config: &Config) -> Result<(), RegistryError> {
    if config.sites.builtin {
        register_defaults(registry, config)?;
    }
    for entry in &config.vrporn {
        register_vrporn_studio(registry, VrPornStudio::from(entry), config)?;
    }
    tracing::debug!("{} sources registered", registry.len());
    Ok(())
}
