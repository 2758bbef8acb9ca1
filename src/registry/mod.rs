//! Scraper registry
//!
//! The registry maps a stable source id to its [`Registration`]. It is an
//! explicit object owned by the application root and shared with the
//! orchestrator through an `Arc`; sites are added during an explicit
//! initialization phase (see `sites::register_defaults`).
//!
//! # Duplicate ids
//!
//! Registering an id that already exists replaces the old entry in place:
//! the newest extractor wins and the entry keeps its original position in
//! [`Registry::list`]. The outcome therefore does not depend on how often a
//! source was registered, only on which registration came last.

use crate::extractor::SiteExtractor;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Errors from registering a source
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Source id cannot be empty")]
    EmptyId,
}

/// One registered source
#[derive(Clone)]
pub struct Registration {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
    pub extractor: Arc<dyn SiteExtractor>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("avatar_url", &self.avatar_url)
            .finish_non_exhaustive()
    }
}

impl Registration {
    pub fn info(&self) -> ScraperInfo {
        ScraperInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// Display data of a registered source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScraperInfo {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
}

/// Catalog of sources, in registration order
#[derive(Debug, Default)]
pub struct Registry {
    entries: RwLock<Vec<Registration>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source, replacing any entry with the same id
    ///
    /// The id is stored trimmed, matching how [`crate::Orchestrator::run`]
    /// selects sources.
    ///
    /// # Errors
    ///
    /// `RegistryError::EmptyId` if `id` is empty or whitespace.
    pub fn register(
        &self,
        id: impl Into<String>,
        name: impl Into<String>,
        avatar_url: impl Into<String>,
        extractor: Arc<dyn SiteExtractor>,
    ) -> Result<(), RegistryError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(RegistryError::EmptyId);
        }

        let registration = Registration {
            id,
            name: name.into(),
            avatar_url: avatar_url.into(),
            extractor,
        };

        let mut entries = self.write();
        match entries.iter_mut().find(|entry| entry.id == registration.id) {
            Some(existing) => {
                tracing::debug!("Replacing registration for source {}", registration.id);
                *existing = registration;
            }
            None => {
                tracing::debug!("Registered source {}", registration.id);
                entries.push(registration);
            }
        }

        Ok(())
    }

    /// All sources in registration order
    pub fn list(&self) -> Vec<ScraperInfo> {
        self.read().iter().map(Registration::info).collect()
    }

    /// Full registrations in registration order
    pub fn registrations(&self) -> Vec<Registration> {
        self.read().clone()
    }

    pub fn lookup(&self, id: &str) -> Option<Registration> {
        self.read().iter().find(|entry| entry.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().iter().any(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Removes every registration
    pub fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Registration>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Registration>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
