//! Site extractor contract
//!
//! Every source implements [`SiteExtractor`]. One invocation receives a
//! [`ScrapeContext`] by value, which bundles:
//!
//! - the completion guard the orchestrator waits on
//! - the update-site flag and the `SiteUpdater` to report refreshes to
//! - the known-scene skip-list
//! - the send-only output sink
//!
//! Because the context owns both the guard and the sink, an extractor cannot
//! forget to signal completion (dropping the context signals it) and cannot
//! emit after completion (the sink goes away with the guard).

mod completion;
mod sink;

pub use completion::{CompletionGuard, WaitGroup};
pub use sink::SceneSink;

use crate::model::ScrapedScene;
use crate::state::{KnownScenes, SiteUpdater};
use crate::ScrapeError;
use async_trait::async_trait;
use std::sync::Arc;

/// A source-specific scraper
///
/// Implementations should:
/// - skip detail pages whose key is in `ctx.known()`
/// - treat a failed detail fetch as "no record" and keep going
/// - call `ctx.mark_site_updated()` after a successful walk
///
/// Returning an error ends only this source's run.
#[async_trait]
pub trait SiteExtractor: Send + Sync {
    async fn scrape(&self, ctx: ScrapeContext) -> Result<(), ScrapeError>;
}

/// Everything one extractor invocation gets from the orchestrator
pub struct ScrapeContext {
    source_id: String,
    update_site: bool,
    known: Arc<KnownScenes>,
    sink: SceneSink,
    site_updater: Arc<dyn SiteUpdater>,
    guard: CompletionGuard,
}

impl std::fmt::Debug for ScrapeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrapeContext")
            .field("source_id", &self.source_id)
            .field("update_site", &self.update_site)
            .field("known", &self.known.len())
            .finish_non_exhaustive()
    }
}

impl ScrapeContext {
    pub fn new(
        source_id: impl Into<String>,
        update_site: bool,
        known: Arc<KnownScenes>,
        sink: SceneSink,
        site_updater: Arc<dyn SiteUpdater>,
        guard: CompletionGuard,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            update_site,
            known,
            sink,
            site_updater,
            guard,
        }
    }

    /// Registry id of the source being scraped
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Whether the caller asked for the refresh to be recorded
    pub fn update_site(&self) -> bool {
        self.update_site
    }

    pub fn known(&self) -> &KnownScenes {
        &self.known
    }

    /// Shorthand for `known().contains(key)`
    pub fn is_known(&self, key: &str) -> bool {
        self.known.contains(key)
    }

    /// Hands a scene to the consumer
    ///
    /// Waits while the shared channel is full. Fails only if the consumer
    /// went away, in which case the extractor should stop.
    pub async fn emit(&self, scene: ScrapedScene) -> Result<(), ScrapeError> {
        self.sink.send(scene).await
    }

    /// Number of scenes emitted through this context
    pub fn emitted(&self) -> usize {
        self.sink.sent()
    }

    /// Records "this source was just refreshed" if the update flag is set
    ///
    /// Returns whether a refresh was recorded.
    pub fn mark_site_updated(&self) -> Result<bool, ScrapeError> {
        if !self.update_site {
            return Ok(false);
        }
        self.site_updater.mark_updated(&self.source_id)?;
        tracing::debug!("Recorded refresh of {}", self.source_id);
        Ok(true)
    }

    /// Signals completion explicitly
    ///
    /// Consumes the context, so nothing can be emitted afterwards. Dropping
    /// the context has the same effect.
    pub fn finish(self) {
        let ScrapeContext { sink, guard, .. } = self;
        drop(sink);
        guard.done();
    }
}
