//! VRPorn studio extractor against a mock server

use scene_scraper::config::{CollectorConfig, OrchestratorConfig};
use scene_scraper::sites::{VrPornExtractor, VrPornStudio};
use scene_scraper::state::SiteStateStore;
use scene_scraper::{KnownScenes, Orchestrator, Registry, ScrapedScene, TrailerType};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listing_page(links: &[&str], next: Option<&str>) -> String {
    let posts: String = links
        .iter()
        .map(|href| {
            format!(
                r#"<article class="post"><div class="tube-post"><a href="{}">scene</a></div></article>"#,
                href
            )
        })
        .collect();
    let next = next
        .map(|href| format!(r#"<div class="pagination"><a class="next" href="{}">Next</a></div>"#, href))
        .unwrap_or_default();
    format!(
        r#"<html><body class="tax-studio">{}{}</body></html>"#,
        posts, next
    )
}

fn scene_page(post_id: u32, title: &str) -> String {
    format!(
        r#"<html><body>
<article class="post-{id} post type-post">
  <h1 class="content-title">{title}</h1>
  <dl8-video poster="/covers/{id}.jpg"><source src="/trailer/{id}.mp4" quality="4K"></dl8-video>
  <div class="tag-box"><a rel="tag" href="/tag/hd">HD</a><a rel="tag" href="/tag/pov">POV</a></div>
  <div class="content-box posted-by-box posted-by-box-sub"><span class="footer-titles">Video</span><span class="footer-titles">Posted on March 07, 2021</span></div>
</article>
</body></html>"#,
        id = post_id,
        title = title
    )
}

async fn mount_studio(server: &MockServer, detail_expectation: u64) {
    Mock::given(method("GET"))
        .and(path("/studio/vrclubz/"))
        .and(query_param("sort", "newest"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &["/scene-one/", "/scene-two/"],
            Some("/studio/vrclubz/page/2/?sort=newest"),
        )))
        .expect(1)
        .mount(server)
        .await;

    // Page 2 repeats scene-two and has no next link
    Mock::given(method("GET"))
        .and(path("/studio/vrclubz/page/2/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing_page(&["/scene-two/"], None)),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/scene-one/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(scene_page(101, "Scene One")))
        .expect(detail_expectation)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/scene-two/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(scene_page(102, "Scene Two")))
        .expect(1)
        .mount(server)
        .await;
}

fn orchestrator(base_url: &str) -> Orchestrator {
    orchestrator_with(base_url, CollectorConfig::default())
}

fn orchestrator_with(base_url: &str, collector_config: CollectorConfig) -> Orchestrator {
    let registry = Arc::new(Registry::new());
    let studio = VrPornStudio::new("vrclubz", "VRClubz", "VixenVR", "");
    registry
        .register(
            "vrclubz",
            studio.display_name(),
            "",
            Arc::new(VrPornExtractor::new(studio, base_url, collector_config)),
        )
        .expect("register studio");
    Orchestrator::new(registry, &OrchestratorConfig::default())
}

fn by_id(mut scenes: Vec<ScrapedScene>) -> Vec<ScrapedScene> {
    scenes.sort_by(|a, b| a.scene_id.cmp(&b.scene_id));
    scenes
}

#[tokio::test]
async fn test_listing_walk_visits_each_scene_once() {
    let server = MockServer::start().await;
    mount_studio(&server, 1).await;

    let scenes = by_id(
        orchestrator(&server.uri())
            .scrape(["vrclubz"], KnownScenes::new(), false)
            .await,
    );

    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0].scene_id, "vrclubz-101");
    assert_eq!(scenes[0].title, "Scene One");
    assert_eq!(scenes[0].site, "VRClubz");
    assert_eq!(scenes[0].studio, "VixenVR");
    assert_eq!(scenes[0].tags, vec!["POV"]);
    assert_eq!(scenes[0].released, "2021-03-07");
    assert_eq!(scenes[0].homepage_url, format!("{}/scene-one/", server.uri()));
    assert_eq!(scenes[0].trailer_type, TrailerType::ScrapeHtml);

    let trailer = scenes[0]
        .trailer_scrape()
        .expect("trailer descriptor")
        .expect("valid descriptor json");
    assert_eq!(trailer.scene_url, format!("{}/scene-one/", server.uri()));
    assert_eq!(trailer.html_element, "dl8-video source");

    assert_eq!(scenes[1].scene_id, "vrclubz-102");
}

#[tokio::test]
async fn test_known_scene_is_not_fetched() {
    let server = MockServer::start().await;
    mount_studio(&server, 0).await;

    let known: KnownScenes = [format!("{}/scene-one/", server.uri())].into_iter().collect();
    let scenes = orchestrator(&server.uri())
        .scrape(["vrclubz"], known, false)
        .await;

    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].scene_id, "vrclubz-102");
}

#[tokio::test]
async fn test_update_site_is_recorded_after_walk() {
    let server = MockServer::start().await;
    mount_studio(&server, 1).await;

    let dir = tempfile::tempdir().expect("temp dir");
    let state_path = dir.path().join("site_state.json");
    let store = Arc::new(SiteStateStore::open(&state_path).expect("open store"));

    let scenes = orchestrator(&server.uri())
        .with_site_updater(store.clone())
        .scrape(["vrclubz"], KnownScenes::new(), true)
        .await;
    assert_eq!(scenes.len(), 2);
    assert!(store.last_update("vrclubz").is_some());

    let reopened = SiteStateStore::open(&state_path).expect("reopen store");
    assert!(reopened.last_update("vrclubz").is_some());
}

#[tokio::test]
async fn test_unreachable_listing_ends_source_without_update() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/studio/vrclubz/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = Arc::new(SiteStateStore::in_memory());
    let scenes = orchestrator(&server.uri())
        .with_site_updater(store.clone())
        .scrape(["vrclubz"], KnownScenes::new(), true)
        .await;

    assert!(scenes.is_empty());
    assert!(store.last_update("vrclubz").is_none());
}

#[tokio::test]
async fn test_failed_detail_is_skipped_and_walk_ends_on_visited_next_link() {
    let server = MockServer::start().await;

    // The next link points back at the page itself
    Mock::given(method("GET"))
        .and(path("/studio/vrclubz/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &["/broken/", "/scene-two/"],
            Some("/studio/vrclubz/?sort=newest"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/scene-two/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(scene_page(102, "Scene Two")))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(SiteStateStore::in_memory());
    let scenes = tokio::time::timeout(
        Duration::from_secs(10),
        orchestrator(&server.uri())
            .with_site_updater(store.clone())
            .scrape(["vrclubz"], KnownScenes::new(), true),
    )
    .await
    .expect("walk should end");

    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].scene_id, "vrclubz-102");
    assert!(store.last_update("vrclubz").is_some());
}

#[tokio::test]
async fn test_max_listing_pages_caps_the_walk() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/studio/vrclubz/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &["/scene-one/"],
            Some("/studio/vrclubz/page/2/?sort=newest"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/studio/vrclubz/page/2/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing_page(&["/scene-two/"], None)),
        )
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/scene-one/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(scene_page(101, "Scene One")))
        .expect(1)
        .mount(&server)
        .await;

    let config = CollectorConfig {
        max_listing_pages: 1,
        ..CollectorConfig::default()
    };
    let scenes = orchestrator_with(&server.uri(), config)
        .scrape(["vrclubz"], KnownScenes::new(), false)
        .await;

    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].scene_id, "vrclubz-101");
}
