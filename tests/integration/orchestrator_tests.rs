//! Orchestrator behavior with fake extractors

use async_trait::async_trait;
use futures::StreamExt;
use scene_scraper::config::OrchestratorConfig;
use scene_scraper::{
    KnownScenes, Orchestrator, Registry, ScrapeContext, ScrapeError, ScrapedScene, SiteExtractor,
};
use std::sync::Arc;
use std::time::Duration;

/// Emits `count` scenes named after its source
struct Producer {
    count: usize,
}

#[async_trait]
impl SiteExtractor for Producer {
    async fn scrape(&self, ctx: ScrapeContext) -> Result<(), ScrapeError> {
        for i in 0..self.count {
            let id = format!("{}-{}", ctx.source_id(), i);
            if ctx.is_known(&id) {
                continue;
            }
            ctx.emit(ScrapedScene {
                scene_id: id,
                site: ctx.source_id().to_string(),
                title: format!("Scene {}", i),
                ..Default::default()
            })
            .await?;
        }
        ctx.finish();
        Ok(())
    }
}

/// Fails before producing anything
struct Failing;

#[async_trait]
impl SiteExtractor for Failing {
    async fn scrape(&self, _ctx: ScrapeContext) -> Result<(), ScrapeError> {
        Err(ScrapeError::Io(std::io::Error::other("listing unavailable")))
    }
}

/// Emits one scene, then panics
struct Panicking;

#[async_trait]
impl SiteExtractor for Panicking {
    async fn scrape(&self, ctx: ScrapeContext) -> Result<(), ScrapeError> {
        ctx.emit(ScrapedScene {
            scene_id: "panicking-0".to_string(),
            ..Default::default()
        })
        .await?;
        panic!("parser bug");
    }
}

/// Emits one scene, then never finishes
struct Stalled;

#[async_trait]
impl SiteExtractor for Stalled {
    async fn scrape(&self, ctx: ScrapeContext) -> Result<(), ScrapeError> {
        ctx.emit(ScrapedScene {
            scene_id: "stalled-0".to_string(),
            ..Default::default()
        })
        .await?;
        std::future::pending::<()>().await;
        Ok(())
    }
}

fn orchestrator(sources: Vec<(&str, Arc<dyn SiteExtractor>)>) -> Orchestrator {
    let registry = Arc::new(Registry::new());
    for (id, extractor) in sources {
        registry
            .register(id, id.to_uppercase(), "", extractor)
            .expect("register source");
    }
    Orchestrator::new(registry, &OrchestratorConfig { channel_capacity: 2 })
}

fn sorted_ids(scenes: &[ScrapedScene]) -> Vec<String> {
    let mut ids: Vec<String> = scenes.iter().map(|s| s.scene_id.clone()).collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn test_run_terminates_with_many_sources() {
    let ids: Vec<String> = (0..20).map(|i| format!("site{}", i)).collect();
    let o = orchestrator(
        ids.iter()
            .map(|id| (id.as_str(), Arc::new(Producer { count: 5 }) as Arc<dyn SiteExtractor>))
            .collect(),
    );

    let scenes = tokio::time::timeout(
        Duration::from_secs(10),
        o.scrape(&ids, KnownScenes::new(), false),
    )
    .await
    .expect("run should terminate");

    assert_eq!(scenes.len(), 100);
}

#[tokio::test]
async fn test_failing_source_does_not_affect_others() {
    let o = orchestrator(vec![
        ("broken", Arc::new(Failing)),
        ("good", Arc::new(Producer { count: 3 })),
    ]);

    let scenes = tokio::time::timeout(
        Duration::from_secs(10),
        o.scrape(["broken", "good"], KnownScenes::new(), false),
    )
    .await
    .expect("run should terminate");

    assert_eq!(sorted_ids(&scenes), vec!["good-0", "good-1", "good-2"]);
    assert!(scenes.iter().all(|s| s.site == "good"));
}

#[tokio::test]
async fn test_panicking_source_still_completes() {
    let o = orchestrator(vec![
        ("panicking", Arc::new(Panicking)),
        ("good", Arc::new(Producer { count: 2 })),
    ]);

    let scenes = tokio::time::timeout(
        Duration::from_secs(10),
        o.scrape(["panicking", "good"], KnownScenes::new(), false),
    )
    .await
    .expect("run should terminate despite the panic");

    assert_eq!(sorted_ids(&scenes), vec!["good-0", "good-1", "panicking-0"]);
}

#[tokio::test]
async fn test_known_set_only_skips_work() {
    let o = orchestrator(vec![("a", Arc::new(Producer { count: 4 }))]);

    let all = o.scrape(["a"], KnownScenes::new(), false).await;
    let known: KnownScenes = ["a-1", "a-3"].into_iter().collect();
    let partial = o.scrape(["a"], known, false).await;

    assert_eq!(sorted_ids(&partial), vec!["a-0", "a-2"]);
    for scene in &partial {
        let same = all
            .iter()
            .find(|s| s.scene_id == scene.scene_id)
            .expect("scene present in full run");
        assert_eq!(same, scene);
    }
}

#[tokio::test]
async fn test_abort_ends_stream() {
    let o = orchestrator(vec![("stalled", Arc::new(Stalled))]);
    let mut run = o.run(["stalled"], KnownScenes::new(), false);

    let first = run.recv().await.expect("first scene");
    assert_eq!(first.scene_id, "stalled-0");

    run.abort();
    let rest = tokio::time::timeout(Duration::from_secs(10), run.recv())
        .await
        .expect("stream should close after abort");
    assert!(rest.is_none());
}

#[tokio::test]
async fn test_run_is_a_stream() {
    let o = orchestrator(vec![
        ("a", Arc::new(Producer { count: 2 })),
        ("b", Arc::new(Producer { count: 1 })),
    ]);

    let run = o.run(["a", "b", "unknown"], KnownScenes::new(), false);
    assert_eq!(run.unknown_sources(), ["unknown"]);

    let scenes: Vec<ScrapedScene> = run.collect().await;
    assert_eq!(sorted_ids(&scenes), vec!["a-0", "a-1", "b-0"]);
}
