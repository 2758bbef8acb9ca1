use crate::model::ScrapedScene;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// A scrape in progress: the fan-in stream of every selected source
///
/// Yields scenes as they arrive, in no particular order across sources, and
/// ends once every started source has completed.
#[derive(Debug)]
pub struct ScrapeRun {
    receiver: mpsc::Receiver<ScrapedScene>,
    started_sources: Vec<String>,
    unknown_sources: Vec<String>,
    tasks: Vec<AbortHandle>,
}

impl ScrapeRun {
    pub(crate) fn new(
        receiver: mpsc::Receiver<ScrapedScene>,
        started_sources: Vec<String>,
        unknown_sources: Vec<String>,
        tasks: Vec<AbortHandle>,
    ) -> Self {
        Self {
            receiver,
            started_sources,
            unknown_sources,
            tasks,
        }
    }

    /// Sources that were found in the registry and started
    pub fn started_sources(&self) -> &[String] {
        &self.started_sources
    }

    /// Requested ids with no registration; they were skipped
    pub fn unknown_sources(&self) -> &[String] {
        &self.unknown_sources
    }

    /// Receives the next scene, or `None` once every source has completed
    pub async fn recv(&mut self) -> Option<ScrapedScene> {
        self.receiver.recv().await
    }

    /// Drains the run into a vector
    pub async fn collect_all(mut self) -> Vec<ScrapedScene> {
        let mut scenes = Vec::new();
        while let Some(scene) = self.receiver.recv().await {
            scenes.push(scene);
        }
        scenes
    }

    /// Cancels every source still running
    ///
    /// Aborted sources release their completion guards, so the stream still
    /// terminates after yielding whatever was already queued.
    pub fn abort(&self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

impl Stream for ScrapeRun {
    type Item = ScrapedScene;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}
