use crate::model::ScrapedScene;
use crate::ScrapeError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Send-only handle on the shared output channel
///
/// Not `Clone`: each extractor invocation owns exactly one sink, and the
/// channel closes once the orchestrator and every sink have let go of it.
#[derive(Debug)]
pub struct SceneSink {
    site: String,
    sender: mpsc::Sender<ScrapedScene>,
    sent: Arc<AtomicUsize>,
}

impl SceneSink {
    /// Wraps a sender; `sent` is bumped for every delivered scene
    pub fn new(
        site: impl Into<String>,
        sender: mpsc::Sender<ScrapedScene>,
        sent: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            site: site.into(),
            sender,
            sent,
        }
    }

    /// Creates a sink with a fresh bounded channel, for driving an
    /// extractor outside the orchestrator
    pub fn channel(
        site: impl Into<String>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<ScrapedScene>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (
            Self::new(site, sender, Arc::new(AtomicUsize::new(0))),
            receiver,
        )
    }

    pub async fn send(&self, scene: ScrapedScene) -> Result<(), ScrapeError> {
        self.sender
            .send(scene)
            .await
            .map_err(|_| ScrapeError::SinkClosed {
                site: self.site.clone(),
            })?;
        self.sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::Relaxed)
    }
}
