use crate::ScrapeError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Records that a source was just refreshed
///
/// Extractors call this (through `ScrapeContext::mark_site_updated`) at the
/// end of a run started with the update flag set.
pub trait SiteUpdater: Send + Sync {
    fn mark_updated(&self, site_id: &str) -> Result<(), ScrapeError>;
}

/// Updater that discards every refresh
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSiteUpdater;

impl SiteUpdater for NoopSiteUpdater {
    fn mark_updated(&self, _site_id: &str) -> Result<(), ScrapeError> {
        Ok(())
    }
}

/// Last-refresh timestamps per source, optionally persisted as JSON
///
/// The file holds a single object mapping source id to an RFC 3339
/// timestamp. It is rewritten after every update.
#[derive(Debug)]
pub struct SiteStateStore {
    path: Option<PathBuf>,
    last_updates: Mutex<BTreeMap<String, DateTime<Utc>>>,
}

impl SiteStateStore {
    /// Creates a store that lives only in memory
    pub fn in_memory() -> Self {
        Self {
            path: None,
            last_updates: Mutex::new(BTreeMap::new()),
        }
    }

    /// Opens (or starts) the store backed by `path`
    ///
    /// A missing file is treated as an empty store; it is created on the
    /// first update.
    pub fn open(path: &Path) -> Result<Self, ScrapeError> {
        let last_updates = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(
            "Loaded {} site timestamps from {}",
            last_updates.len(),
            path.display()
        );

        Ok(Self {
            path: Some(path.to_path_buf()),
            last_updates: Mutex::new(last_updates),
        })
    }

    /// Returns when `site_id` was last refreshed
    pub fn last_update(&self, site_id: &str) -> Option<DateTime<Utc>> {
        self.lock().get(site_id).copied()
    }

    /// Returns a snapshot of every recorded refresh
    pub fn snapshot(&self) -> BTreeMap<String, DateTime<Utc>> {
        self.lock().clone()
    }

    /// Records a refresh at an explicit time
    pub fn record(&self, site_id: &str, at: DateTime<Utc>) -> Result<(), ScrapeError> {
        if site_id.trim().is_empty() {
            return Err(ScrapeError::SiteState(
                "cannot record a refresh for an empty site id".to_string(),
            ));
        }

        let mut last_updates = self.lock();
        last_updates.insert(site_id.to_string(), at);

        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(&*last_updates)?;
            std::fs::write(path, json)?;
        }

        tracing::debug!("Marked {} as updated at {}", site_id, at.to_rfc3339());
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, DateTime<Utc>>> {
        self.last_updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl SiteUpdater for SiteStateStore {
    fn mark_updated(&self, site_id: &str) -> Result<(), ScrapeError> {
        self.record(site_id, Utc::now())
    }
}
