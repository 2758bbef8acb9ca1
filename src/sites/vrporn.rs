//! VRPorn studio pages
//!
//! One generic extractor serves every studio hosted on vrporn.com; each
//! studio is a [`VrPornStudio`] value. The listing at
//! `/studio/<id>/?sort=newest` is walked newest-first and every unknown
//! scene page is parsed into a record.

use crate::collector::{Collector, Document, ListingRules, ListingWalker};
use crate::config::CollectorConfig;
use crate::extractor::{ScrapeContext, SiteExtractor};
use crate::model::{
    normalize_release_date, scene_id, SceneType, ScrapedScene, TrailerScrape, TrailerType,
};
use crate::ScrapeError;
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

const POSTED_SELECTOR: &str = "div.content-box.posted-by-box.posted-by-box-sub span.footer-titles";
const SCENE_LINK_SELECTOR: &str = "body.tax-studio article.post div.tube-post a";
const NEXT_PAGE_SELECTOR: &str = "div.pagination a.next";

/// Generic tags that say nothing about a scene
const SKIPPED_TAGS: &[&str] = &["3D", "60 FPS", "HD"];

/// One studio hosted on vrporn.com
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VrPornStudio {
    /// Studio slug, also the registry id
    pub id: String,
    /// Studio name, recorded as the site label
    pub name: String,
    /// Production company, recorded as the studio
    pub company: String,
    pub avatar_url: String,
}

impl VrPornStudio {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        company: impl Into<String>,
        avatar_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            company: company.into(),
            avatar_url: avatar_url.into(),
        }
    }

    /// Name shown in source listings
    pub fn display_name(&self) -> String {
        format!("{} (VRPorn)", self.name)
    }
}

/// Studios registered out of the box
pub fn default_studios() -> Vec<VrPornStudio> {
    vec![
        VrPornStudio::new(
            "randysroadstop",
            "Randy's Road Stop",
            "NaughtyAmerica",
            "https://mcdn.vrporn.com/files/20170718073527/randysroadstop-vr-porn-studio-vrporn.com-virtual-reality.png",
        ),
        VrPornStudio::new(
            "realteensvr",
            "Real Teens VR",
            "NaughtyAmerica",
            "https://mcdn.vrporn.com/files/20170718063811/realteensvr-vr-porn-studio-vrporn.com-virtual-reality.png",
        ),
        VrPornStudio::new(
            "vrclubz",
            "VRClubz",
            "VixenVR",
            "https://mcdn.vrporn.com/files/20200421094123/vrclubz_logo_NEW-400x400_webwhite.png",
        ),
    ]
}

/// Extractor for one VRPorn studio
#[derive(Debug, Clone)]
pub struct VrPornExtractor {
    studio: VrPornStudio,
    base_url: String,
    collector_config: CollectorConfig,
}

impl VrPornExtractor {
    pub fn new(studio: VrPornStudio, base_url: &str, collector_config: CollectorConfig) -> Self {
        Self {
            studio,
            base_url: base_url.trim_end_matches('/').to_string(),
            collector_config,
        }
    }

    pub fn studio(&self) -> &VrPornStudio {
        &self.studio
    }

    /// First listing page of the studio, newest scenes first
    pub fn listing_url(&self) -> String {
        format!("{}/studio/{}/?sort=newest", self.base_url, self.studio.id)
    }
}

#[async_trait]
impl SiteExtractor for VrPornExtractor {
    async fn scrape(&self, ctx: ScrapeContext) -> Result<(), ScrapeError> {
        let mut site_collector = Collector::for_base_url(&self.collector_config, &self.base_url)?;
        let mut scene_collector = Collector::for_base_url(&self.collector_config, &self.base_url)?;

        let rules = ListingRules::new(SCENE_LINK_SELECTOR, NEXT_PAGE_SELECTOR)
            .with_max_pages(self.collector_config.max_listing_pages);
        let mut walker = ListingWalker::new(&mut site_collector, self.listing_url(), rules);

        while let Some(page) = walker.next_page().await? {
            for scene_url in page.detail_urls {
                if ctx.is_known(&scene_url) {
                    continue;
                }

                let scene = scene_collector
                    .visit_detail(&scene_url, |doc| parse_scene(doc, &self.studio))
                    .await;
                if let Some(scene) = scene {
                    ctx.emit(scene).await?;
                }
            }
        }

        tracing::debug!(
            "{}: walked {} listing pages",
            self.studio.id,
            walker.pages_walked()
        );

        ctx.mark_site_updated()?;
        ctx.finish();
        Ok(())
    }
}

fn posted_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^VideoPosted (?:on Premium )?on (.+)$").expect("valid posted regex")
    })
}

fn post_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^post-(\d+)").expect("valid post id regex"))
}

fn duration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"var timeAfter="(?:(\d+):)?(\d+):(\d+)";"#).expect("valid duration regex")
    })
}

/// Parses a VRPorn scene page
///
/// Returns `None` for pages that are not scenes (vrporn.com also hosts VR
/// games, which lack the "posted on" footer) or that carry no post id.
pub fn parse_scene(doc: &Document, studio: &VrPornStudio) -> Option<ScrapedScene> {
    let posted = doc.text(POSTED_SELECTOR);
    let posted_date = posted_regex()
        .captures(&posted)?
        .get(1)
        .map(|m| m.as_str().trim().to_string())?;

    let article_class = doc.attr("article.post", "class").unwrap_or_default();
    let site_id = post_id_regex()
        .captures(article_class.trim())?
        .get(1)?
        .as_str()
        .to_string();

    let mut sc = ScrapedScene {
        scene_type: SceneType::Vr,
        studio: studio.company.clone(),
        site: studio.name.clone(),
        homepage_url: doc.url_without_query(),
        scene_id: scene_id(&studio.name, &site_id),
        site_id,
        ..Default::default()
    };

    if let Some(title) = doc.texts("h1.content-title").pop() {
        sc.title = title;
    }

    if let Some(cover) = doc.attr("#dl8videoplayer", "poster").filter(|c| !c.is_empty()) {
        sc.covers.push(cover);
    }

    sc.gallery = doc.links(".vrp-gallery-pro a");

    if let Some(synopsis) = doc.texts(".entry-content.post-video-description").pop() {
        sc.synopsis = synopsis;
    }

    sc.tags = doc
        .texts(r#".tag-box a[rel="tag"]"#)
        .into_iter()
        .filter(|tag| !SKIPPED_TAGS.contains(&tag.as_str()))
        .collect();

    sc.cast = doc.texts(".name_pornstar");

    let trailer = TrailerScrape {
        scene_url: sc.homepage_url.clone(),
        html_element: "dl8-video source".to_string(),
        content_path: "src".to_string(),
        quality_path: "quality".to_string(),
        ..Default::default()
    };
    if let Err(e) = sc.set_trailer(TrailerType::ScrapeHtml, &trailer) {
        tracing::warn!("Could not encode trailer for {}: {}", sc.homepage_url, e);
    }

    sc.released = normalize_release_date(&posted_date, "%B %d, %Y");
    sc.duration = parse_duration(doc);

    Some(sc)
}

/// Minutes from the first script declaring a non-zero `timeAfter`
fn parse_duration(doc: &Document) -> u32 {
    doc.select("script")
        .iter()
        .filter_map(|script| {
            let text = script.text().collect::<String>();
            let caps = duration_regex().captures(&text)?;
            let hours: u32 = caps.get(1).map_or(Some(0), |m| m.as_str().parse().ok())?;
            let minutes: u32 = caps.get(2)?.as_str().parse().ok()?;
            Some(hours * 60 + minutes)
        })
        .find(|minutes| *minutes > 0)
        .unwrap_or(0)
}
