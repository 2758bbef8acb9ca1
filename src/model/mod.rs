//! Canonical record model
//!
//! Every extractor normalizes what it finds into a [`ScrapedScene`]. The
//! scene carries an optional trailer descriptor ([`TrailerScrape`]) that
//! tells a downstream resolver how to find a playable source later on.

mod ids;
mod scene;
mod trailer;

pub use ids::{normalize_release_date, scene_id, slugify};
pub use scene::{SceneType, ScrapedScene};
pub use trailer::{TrailerResolver, TrailerScrape, TrailerType};
