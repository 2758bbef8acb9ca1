use crate::model::trailer::{TrailerScrape, TrailerType};
use serde::{Deserialize, Deserializer, Serialize};

/// Kind of media a scene describes
///
/// Serialized as the plain string used on the wire (`"VR"`, `"2D"`). Any
/// other string is preserved verbatim in [`SceneType::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SceneType {
    /// No kind reported (empty string)
    #[default]
    Unknown,
    /// Virtual-reality scene
    Vr,
    /// Flat (2D) scene
    Flat,
    /// Any other label a source reports
    Other(String),
}

impl From<String> for SceneType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "" => SceneType::Unknown,
            "VR" => SceneType::Vr,
            "2D" => SceneType::Flat,
            _ => SceneType::Other(value),
        }
    }
}

impl From<SceneType> for String {
    fn from(value: SceneType) -> Self {
        match value {
            SceneType::Unknown => String::new(),
            SceneType::Vr => "VR".to_string(),
            SceneType::Flat => "2D".to_string(),
            SceneType::Other(label) => label,
        }
    }
}

/// One media item discovered on one source
///
/// Field names follow the persisted JSON contract (`_id`, `scene_id`,
/// `homepage_url`, ...). Every field is optional on input; absent values and
/// `null` lists come back as their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapedScene {
    /// Internal id, `<slug(site)>-<site-local id>`
    #[serde(rename = "_id")]
    pub scene_id: String,

    /// The id as the source names it
    #[serde(rename = "scene_id")]
    pub site_id: String,

    pub scene_type: SceneType,
    pub title: String,
    pub studio: String,
    pub site: String,

    #[serde(deserialize_with = "null_as_empty")]
    pub covers: Vec<String>,

    #[serde(deserialize_with = "null_as_empty")]
    pub gallery: Vec<String>,

    /// Tags in source order; only the extractor removes duplicates
    #[serde(deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,

    #[serde(deserialize_with = "null_as_empty")]
    pub cast: Vec<String>,

    #[serde(rename = "filename", deserialize_with = "null_as_empty")]
    pub filenames: Vec<String>,

    /// Duration in minutes, 0 when unknown
    pub duration: u32,

    pub synopsis: String,

    /// Release date as `YYYY-MM-DD`, empty when unknown
    pub released: String,

    /// Canonical detail-page URL
    pub homepage_url: String,

    pub members_url: String,

    pub trailer_type: TrailerType,

    /// Trailer payload; a JSON-encoded [`TrailerScrape`] for the scrape
    /// strategies, a plain URL for [`TrailerType::Url`]
    #[serde(rename = "trailer_source")]
    pub trailer_src: String,
}

impl ScrapedScene {
    /// Serializes the scene to its compact JSON wire form
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parses a scene from its JSON wire form
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Writes the scene as pretty JSON to the debug log
    pub fn log(&self) -> serde_json::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tracing::debug!("\n{}", json);
        Ok(())
    }

    /// Attaches a trailer descriptor, nesting it as a JSON string in
    /// `trailer_source`
    pub fn set_trailer(
        &mut self,
        kind: TrailerType,
        descriptor: &TrailerScrape,
    ) -> serde_json::Result<()> {
        self.trailer_src = descriptor.to_json()?;
        self.trailer_type = kind;
        Ok(())
    }

    /// Parses the nested trailer descriptor back out of `trailer_source`
    ///
    /// Returns `None` when the trailer strategy does not carry a descriptor.
    pub fn trailer_scrape(&self) -> Option<serde_json::Result<TrailerScrape>> {
        if !self.trailer_type.carries_descriptor() || self.trailer_src.is_empty() {
            return None;
        }
        Some(TrailerScrape::from_json(&self.trailer_src))
    }

    /// The key downstream stores de-duplicate on: internal id plus homepage
    pub fn natural_key(&self) -> (&str, &str) {
        (&self.scene_id, &self.homepage_url)
    }
}

/// Accepts `null` where a list is expected
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
