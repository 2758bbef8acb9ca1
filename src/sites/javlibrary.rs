//! JavLibrary search-by-id
//!
//! Unlike the studio extractors this source is queried, not walked: each
//! requested DVD id is looked up through the site search. The search either
//! redirects straight to the detail page or returns a result list, in which
//! case the exact id match is followed (one extra fetch).

use crate::collector::{element_text, Collector, Document};
use crate::config::CollectorConfig;
use crate::model::{normalize_release_date, SceneType, ScrapedScene};
use crate::state::KnownScenes;
use crate::ScrapeError;
use regex::Regex;
use std::sync::OnceLock;

/// Genre labels that carry no information for JAV VR releases
const SKIPPED_TAGS: &[&str] = &[
    "featured actress",
    "vr exclusive",
    "high-quality vr",
    "high quality vr",
    "vr",
    "hi-def",
];

/// What a fetched JavLibrary page turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum JavPage {
    /// A search result list; holds the link of the exact id match, if any
    SearchResults { exact_match: Option<String> },
    Detail(Box<ScrapedScene>),
    /// Neither a result list nor a recognizable detail page
    Unrecognized,
}

/// JavLibrary scraper
#[derive(Debug, Clone)]
pub struct JavLibrary {
    base_url: String,
    collector_config: CollectorConfig,
}

impl JavLibrary {
    pub fn new(base_url: &str, collector_config: CollectorConfig) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            collector_config,
        }
    }

    pub fn search_url(&self, dvd_id: &str) -> String {
        format!(
            "{}/en/vl_searchbyid.php?keyword={}",
            self.base_url,
            dvd_id.trim().to_lowercase()
        )
    }

    /// Looks up a comma-separated list of DVD ids
    ///
    /// Ids whose upper-cased form is in `known` are not fetched. Failed
    /// lookups are logged and skipped.
    pub async fn search(
        &self,
        known: &KnownScenes,
        query: &str,
    ) -> Result<Vec<ScrapedScene>, ScrapeError> {
        let mut collector = Collector::for_base_url(&self.collector_config, &self.base_url)?;
        let mut scenes = Vec::new();

        for dvd_id in query.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            if known.contains(&dvd_id.to_uppercase()) {
                tracing::debug!("{} already known, skipping", dvd_id);
                continue;
            }

            match self.lookup(&mut collector, dvd_id).await {
                Some(scene) => scenes.push(scene),
                None => tracing::info!("No JavLibrary entry found for {}", dvd_id),
            }
        }

        Ok(scenes)
    }

    async fn lookup(&self, collector: &mut Collector, dvd_id: &str) -> Option<ScrapedScene> {
        let first = match collector.visit(&self.search_url(dvd_id)).await {
            Ok(page) => page?,
            Err(e) => {
                tracing::warn!("JavLibrary search failed: {}", e);
                return None;
            }
        };

        let follow = match classify_page(&first.document()) {
            JavPage::Detail(scene) => return Some(*scene),
            JavPage::SearchResults { exact_match } => exact_match?,
            JavPage::Unrecognized => return None,
        };

        tracing::debug!("Following search result {} for {}", follow, dvd_id);
        let page = match collector.visit(&follow).await {
            Ok(page) => page?,
            Err(e) => {
                tracing::warn!("JavLibrary detail fetch failed: {}", e);
                return None;
            }
        };

        match classify_page(&page.document()) {
            JavPage::Detail(scene) => Some(*scene),
            _ => None,
        }
    }
}

fn search_title_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([^"]+)" ID Search Result"#).expect("valid search regex"))
}

fn content_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"//pics\.dmm\.co\.jp/digital/video/([^/]+)/").expect("valid content id regex")
    })
}

fn low_res_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"//pics\.dmm\.co\.jp/digital/video/([^/]+)/(.+[0-9])-([0-9]+)\.jpg")
            .expect("valid gallery regex")
    })
}

/// Decides whether `doc` is a search result list or a detail page
pub fn classify_page(doc: &Document) -> JavPage {
    let box_title = doc.text("div.boxtitle");
    if let Some(caps) = search_title_regex().captures(&box_title) {
        let query = caps[1].to_lowercase();
        let exact_match = doc.select("div.videos div.video a").into_iter().find_map(|link| {
            let id = link
                .select(&scraper::Selector::parse("div.id").ok()?)
                .next()
                .map(|el| element_text(&el))?;
            if id.to_lowercase() != query {
                return None;
            }
            link.value().attr("href").and_then(|href| doc.absolute_url(href))
        });
        return JavPage::SearchResults { exact_match };
    }

    match parse_detail(doc) {
        Some(scene) => JavPage::Detail(Box::new(scene)),
        None => JavPage::Unrecognized,
    }
}

/// Parses a JavLibrary detail page
///
/// The DVD id doubles as title, site id and internal id; the label before
/// the dash becomes the site.
pub fn parse_detail(doc: &Document) -> Option<ScrapedScene> {
    let dvd_id = doc.text("div#video_id td.text").to_uppercase();
    if dvd_id.is_empty() {
        return None;
    }

    let mut sc = ScrapedScene {
        scene_type: SceneType::Vr,
        title: dvd_id.clone(),
        site_id: dvd_id.clone(),
        scene_id: dvd_id.clone(),
        site: dvd_id.split('-').next().unwrap_or_default().to_string(),
        tags: vec!["javr".to_string()],
        ..Default::default()
    };

    let mut content_id = None;

    if let Some(cover) = doc.attr("img#video_jacket_img", "src") {
        let cover = with_scheme(&cover);
        content_id = extract_content_id(&cover);
        sc.covers.push(cover);
    }

    for src in doc.attrs("div.previewthumbs img", "src") {
        let src = with_scheme(&src);
        if content_id.is_none() {
            content_id = extract_content_id(&src);
        }
        let hi_res = low_res_regex()
            .replace(&src, "//pics.dmm.co.jp/digital/video/${1}/${2}jp-${3}.jpg")
            .into_owned();
        sc.gallery.push(hi_res);
    }

    if let Some(content_id) = content_id {
        sc.homepage_url = format!(
            "https://www.dmm.co.jp/digital/videoa/-/detail/=/cid={}/",
            content_id
        );
    }

    sc.released = normalize_release_date(&doc.text("div#video_date td.text"), "%Y-%m-%d");
    sc.cast = doc.texts("span.star");

    sc.tags.extend(
        doc.texts("span.genre")
            .into_iter()
            .map(|tag| tag.to_lowercase())
            .filter(|tag| !SKIPPED_TAGS.contains(&tag.as_str())),
    );

    sc.synopsis = doc.text("div#video_title h3");
    sc.studio = doc.text("span.maker");

    Some(sc)
}

/// Adds `https:` to protocol-relative image URLs
fn with_scheme(src: &str) -> String {
    if src.starts_with("//") {
        format!("https:{}", src)
    } else {
        src.to_string()
    }
}

fn extract_content_id(src: &str) -> Option<String> {
    content_id_regex()
        .captures(src)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    const DETAIL_HTML: &str = r#"
<html><body>
<div id="video_title"><h3>VRKM-821 A Very Long Title</h3></div>
<div id="video_id"><table><tr><td class="header">ID:</td><td class="text">vrkm-821</td></tr></table></div>
<div id="video_date"><table><tr><td class="text">2022-08-05</td></tr></table></div>
<img id="video_jacket_img" src="//pics.dmm.co.jp/digital/video/vrkm00821/vrkm00821pl.jpg">
<div class="previewthumbs">
  <img src="//pics.dmm.co.jp/digital/video/vrkm00821/vrkm00821-1.jpg">
  <img src="https://example.com/other.jpg">
</div>
<span class="star"><a href="/star/aoi">Aoi Sora</a></span>
<span class="genre"><a>Featured Actress</a></span>
<span class="genre"><a>Beautiful Girl</a></span>
<span class="genre"><a>VR</a></span>
<span class="maker"><a>KMP VR</a></span>
</body></html>
"#;

    const RESULTS_HTML: &str = r#"
<html><body>
<div class="boxtitle">"VRKM-821" ID Search Result</div>
<div class="videos">
  <div class="video"><a href="./?v=other"><div class="id">VRKM-8210</div></a></div>
  <div class="video"><a href="./?v=javme123"><div class="id">VRKM-821</div></a></div>
</div>
</body></html>
"#;

    fn doc(html: &str) -> Document {
        Document::parse(
            html,
            Url::parse("https://www.javlibrary.com/en/vl_searchbyid.php?keyword=vrkm-821").unwrap(),
        )
    }

    #[test]
    fn test_parse_detail() {
        let sc = parse_detail(&doc(DETAIL_HTML)).unwrap();

        assert_eq!(sc.scene_id, "VRKM-821");
        assert_eq!(sc.site_id, "VRKM-821");
        assert_eq!(sc.title, "VRKM-821");
        assert_eq!(sc.site, "VRKM");
        assert_eq!(sc.scene_type, SceneType::Vr);
        assert_eq!(
            sc.covers,
            vec!["https://pics.dmm.co.jp/digital/video/vrkm00821/vrkm00821pl.jpg"]
        );
        assert_eq!(
            sc.gallery,
            vec![
                "https://pics.dmm.co.jp/digital/video/vrkm00821/vrkm00821jp-1.jpg",
                "https://example.com/other.jpg"
            ]
        );
        assert_eq!(
            sc.homepage_url,
            "https://www.dmm.co.jp/digital/videoa/-/detail/=/cid=vrkm00821/"
        );
        assert_eq!(sc.released, "2022-08-05");
        assert_eq!(sc.cast, vec!["Aoi Sora"]);
        assert_eq!(sc.tags, vec!["javr", "beautiful girl"]);
        assert_eq!(sc.synopsis, "VRKM-821 A Very Long Title");
        assert_eq!(sc.studio, "KMP VR");
    }

    #[test]
    fn test_classify_search_results_picks_exact_match() {
        match classify_page(&doc(RESULTS_HTML)) {
            JavPage::SearchResults { exact_match } => assert_eq!(
                exact_match.as_deref(),
                Some("https://www.javlibrary.com/en/?v=javme123")
            ),
            other => panic!("expected search results, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_detail() {
        assert!(matches!(classify_page(&doc(DETAIL_HTML)), JavPage::Detail(_)));
    }

    #[test]
    fn test_classify_unrecognized() {
        assert_eq!(
            classify_page(&doc("<html><body>Nothing here</body></html>")),
            JavPage::Unrecognized
        );
    }

    #[test]
    fn test_search_url() {
        let jav = JavLibrary::new("https://www.javlibrary.com/", CollectorConfig::default());
        assert_eq!(
            jav.search_url(" VRKM-821 "),
            "https://www.javlibrary.com/en/vl_searchbyid.php?keyword=vrkm-821"
        );
    }
}
