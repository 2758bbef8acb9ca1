//! Concurrent execution of registered extractors
//!
//! The orchestrator coordinates one scrape run:
//! - Resolving the selected source ids against the registry
//! - Spawning one task per source, each with its own `ScrapeContext`
//! - Fanning every task's output into a single `ScrapeRun` stream
//! - Closing the stream once every task has signalled completion
//!
//! Sources share nothing but the output channel and the completion counter,
//! so a slow or failing source never holds up the others.

mod run;

pub use run::ScrapeRun;

use crate::config::OrchestratorConfig;
use crate::extractor::{SceneSink, ScrapeContext, WaitGroup};
use crate::model::ScrapedScene;
use crate::registry::{Registration, Registry};
use crate::state::{KnownScenes, NoopSiteUpdater, SiteUpdater};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Runs registered extractors and merges their output
pub struct Orchestrator {
    registry: Arc<Registry>,
    site_updater: Arc<dyn SiteUpdater>,
    channel_capacity: usize,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("sources", &self.registry.len())
            .field("channel_capacity", &self.channel_capacity)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Creates an orchestrator over `registry`
    ///
    /// Refreshes are discarded until a real updater is supplied with
    /// [`Orchestrator::with_site_updater`].
    pub fn new(registry: Arc<Registry>, config: &OrchestratorConfig) -> Self {
        Self {
            registry,
            site_updater: Arc::new(NoopSiteUpdater),
            channel_capacity: config.channel_capacity.max(1),
        }
    }

    pub fn with_site_updater(mut self, site_updater: Arc<dyn SiteUpdater>) -> Self {
        self.site_updater = site_updater;
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Starts a scrape of the selected sources
    ///
    /// Unknown ids are logged and reported through
    /// [`ScrapeRun::unknown_sources`]; the remaining sources still run. Ids
    /// selected twice run once. Must be called inside a tokio runtime.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use scene_scraper::config::OrchestratorConfig;
    /// use scene_scraper::{KnownScenes, Orchestrator, Registry};
    /// use std::sync::Arc;
    ///
    /// # async fn example(registry: Arc<Registry>) {
    /// let orchestrator = Orchestrator::new(registry, &OrchestratorConfig::default());
    /// let mut run = orchestrator.run(["vrclubz", "realteensvr"], KnownScenes::new(), true);
    /// while let Some(scene) = run.recv().await {
    ///     println!("{} {}", scene.scene_id, scene.title);
    /// }
    /// # }
    /// ```
    pub fn run<I, S>(&self, ids: I, known: KnownScenes, update_site: bool) -> ScrapeRun
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut selected = Vec::new();
        let mut unknown_sources = Vec::new();

        for id in ids {
            let id = id.as_ref().trim();
            if !seen.insert(id.to_string()) {
                continue;
            }
            match self.registry.lookup(id) {
                Some(registration) => selected.push(registration),
                None => {
                    tracing::warn!("Unknown source '{}', skipping", id);
                    unknown_sources.push(id.to_string());
                }
            }
        }

        self.spawn_run(selected, unknown_sources, known, update_site)
    }

    /// Starts a scrape of every registered source
    pub fn run_all(&self, known: KnownScenes, update_site: bool) -> ScrapeRun {
        let selected = self.registry.registrations();
        self.spawn_run(selected, Vec::new(), known, update_site)
    }

    /// Runs the selected sources to completion and collects the scenes
    pub async fn scrape<I, S>(&self, ids: I, known: KnownScenes, update_site: bool) -> Vec<ScrapedScene>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.run(ids, known, update_site).collect_all().await
    }

    fn spawn_run(
        &self,
        selected: Vec<Registration>,
        unknown_sources: Vec<String>,
        known: KnownScenes,
        update_site: bool,
    ) -> ScrapeRun {
        let (sender, receiver) = mpsc::channel(self.channel_capacity);
        let known = Arc::new(known);
        let wait_group = WaitGroup::new();
        let mut started_sources = Vec::with_capacity(selected.len());
        let mut tasks = Vec::with_capacity(selected.len());

        tracing::info!(
            "Starting scrape of {} sources ({} known scenes)",
            selected.len(),
            known.len()
        );

        for registration in selected {
            // Counted before spawning so the supervisor cannot see zero early
            let guard = wait_group.add();
            let sent = Arc::new(AtomicUsize::new(0));
            let sink = SceneSink::new(registration.id.clone(), sender.clone(), sent.clone());
            let ctx = ScrapeContext::new(
                registration.id.clone(),
                update_site,
                known.clone(),
                sink,
                self.site_updater.clone(),
                guard,
            );

            started_sources.push(registration.id.clone());
            let handle = tokio::spawn(scrape_source(registration, ctx, sent));
            tasks.push(handle.abort_handle());
        }

        // The orchestrator's own sender is the last one to go
        tokio::spawn(async move {
            wait_group.wait().await;
            drop(sender);
            tracing::info!("All sources completed");
        });

        ScrapeRun::new(receiver, started_sources, unknown_sources, tasks)
    }
}

/// Body of one source's task
async fn scrape_source(registration: Registration, ctx: ScrapeContext, sent: Arc<AtomicUsize>) {
    let started = Instant::now();
    tracing::info!("Scraping {} ({})", registration.name, registration.id);

    let result = registration.extractor.scrape(ctx).await;
    let emitted = sent.load(Ordering::Relaxed);

    match result {
        Ok(()) => tracing::info!(
            "Finished {}: {} scenes in {:?}",
            registration.id,
            emitted,
            started.elapsed()
        ),
        Err(e) => tracing::warn!(
            "Source {} stopped after {} scenes: {}",
            registration.id,
            emitted,
            e
        ),
    }
}
