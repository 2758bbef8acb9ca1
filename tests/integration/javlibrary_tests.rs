//! JavLibrary search against a mock server

use scene_scraper::config::CollectorConfig;
use scene_scraper::sites::JavLibrary;
use scene_scraper::KnownScenes;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS_PAGE: &str = r#"<html><body>
<div class="boxtitle">"VRKM-821" ID Search Result</div>
<div class="videos">
  <div class="video"><a href="./?v=other"><div class="id">VRKM-8210</div></a></div>
  <div class="video"><a href="./?v=javme123"><div class="id">VRKM-821</div></a></div>
</div>
</body></html>"#;

fn detail_page(dvd_id: &str, maker: &str) -> String {
    format!(
        r#"<html><body>
<div id="video_title"><h3>{id} Title</h3></div>
<div id="video_id"><table><tr><td class="text">{id}</td></tr></table></div>
<div id="video_date"><table><tr><td class="text">2022-08-05</td></tr></table></div>
<span class="genre"><a>Solowork</a></span>
<span class="maker"><a>{maker}</a></span>
</body></html>"#,
        id = dvd_id,
        maker = maker
    )
}

#[tokio::test]
async fn test_search_follows_exact_result_and_direct_hits() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/en/vl_searchbyid.php"))
        .and(query_param("keyword", "vrkm-821"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/en/"))
        .and(query_param("v", "javme123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page("VRKM-821", "KMP VR")))
        .expect(1)
        .mount(&server)
        .await;

    // The search redirects straight to the detail page for this one
    Mock::given(method("GET"))
        .and(path("/en/vl_searchbyid.php"))
        .and(query_param("keyword", "dsvr-100"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page("dsvr-100", "Das")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/en/vl_searchbyid.php"))
        .and(query_param("keyword", "known-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page("KNOWN-1", "X")))
        .expect(0)
        .mount(&server)
        .await;

    let jav = JavLibrary::new(&server.uri(), CollectorConfig::default());
    let known: KnownScenes = ["KNOWN-1"].into_iter().collect();
    let scenes = jav
        .search(&known, "VRKM-821, dsvr-100 ,known-1")
        .await
        .expect("search");

    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0].scene_id, "VRKM-821");
    assert_eq!(scenes[0].studio, "KMP VR");
    assert_eq!(scenes[0].tags, vec!["javr", "solowork"]);
    assert_eq!(scenes[1].scene_id, "DSVR-100");
    assert_eq!(scenes[1].site, "DSVR");
}

#[tokio::test]
async fn test_search_without_match_returns_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/en/vl_searchbyid.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><div class=\"boxtitle\">\"ABC-1\" ID Search Result</div></body></html>"),
        )
        .mount(&server)
        .await;

    let jav = JavLibrary::new(&server.uri(), CollectorConfig::default());
    let scenes = jav.search(&KnownScenes::new(), "ABC-1").await.expect("search");
    assert!(scenes.is_empty());
}
