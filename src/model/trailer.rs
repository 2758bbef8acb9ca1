use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Strategy a downstream resolver uses to turn `trailer_source` into a
/// playable URL
///
/// Serialized as its wire name. Unrecognized names survive a round trip in
/// [`TrailerType::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrailerType {
    /// No trailer known
    #[default]
    None,
    /// `trailer_source` is a direct URL
    Url,
    /// `trailer_source` is a JSON list of direct URLs
    Urls,
    /// Descriptor applied to the detail page HTML
    ScrapeHtml,
    /// Descriptor applied to a JSON document embedded in the page
    ScrapeJson,
    /// Descriptor applied to a JSON document fetched from `scene_url`
    LoadJson,
    Deovr,
    Heresphere,
    Slr,
    Vrporn,
    Other(String),
}

impl TrailerType {
    /// Wire name of the strategy
    pub fn as_str(&self) -> &str {
        match self {
            TrailerType::None => "",
            TrailerType::Url => "url",
            TrailerType::Urls => "urls",
            TrailerType::ScrapeHtml => "scrape_html",
            TrailerType::ScrapeJson => "scrape_json",
            TrailerType::LoadJson => "load_json",
            TrailerType::Deovr => "deovr",
            TrailerType::Heresphere => "heresphere",
            TrailerType::Slr => "slr",
            TrailerType::Vrporn => "vrporn",
            TrailerType::Other(name) => name,
        }
    }

    /// Returns true if `trailer_source` holds a JSON [`TrailerScrape`]
    pub fn carries_descriptor(&self) -> bool {
        matches!(
            self,
            TrailerType::ScrapeHtml | TrailerType::ScrapeJson | TrailerType::LoadJson
        )
    }
}

impl From<String> for TrailerType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "" => TrailerType::None,
            "url" => TrailerType::Url,
            "urls" => TrailerType::Urls,
            "scrape_html" => TrailerType::ScrapeHtml,
            "scrape_json" => TrailerType::ScrapeJson,
            "load_json" => TrailerType::LoadJson,
            "deovr" => TrailerType::Deovr,
            "heresphere" => TrailerType::Heresphere,
            "slr" => TrailerType::Slr,
            "vrporn" => TrailerType::Vrporn,
            _ => TrailerType::Other(value),
        }
    }
}

impl From<TrailerType> for String {
    fn from(value: TrailerType) -> Self {
        match value {
            TrailerType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for TrailerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative recipe for resolving a playable trailer from a detail page
///
/// Nothing in this crate interprets the recipe. Path fields use a
/// JSONPath-like syntax so a single resolver can serve every source; empty
/// strings mean "not used".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailerScrape {
    /// Page to fetch
    pub scene_url: String,

    /// Selector for the element holding the sources
    pub html_element: String,

    /// Regex pulling a JSON literal out of an inline script
    pub extract_regex: String,

    /// Prefix for relative content URLs
    pub content_base_url: String,

    /// Path to the array of candidate sources
    pub record_path: String,

    /// Path to the content URL inside each candidate
    pub content_path: String,

    /// Path to the codec label (h264, h265, ...)
    pub encoding_path: String,

    /// Path to the quality label (1440p, 5k, ...)
    pub quality_path: String,
}

impl TrailerScrape {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// External capability that turns a trailer descriptor into a playable URL
///
/// Implemented by the playback layer, never by the scraping core.
#[async_trait]
pub trait TrailerResolver: Send + Sync {
    type Error: Send;

    /// Resolves `source` according to `kind`; `None` when nothing playable
    /// was found
    async fn resolve(&self, kind: &TrailerType, source: &str)
        -> Result<Option<String>, Self::Error>;
}
