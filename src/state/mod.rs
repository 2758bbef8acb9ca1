//! State shared across scrape runs
//!
//! This module holds the two halves of the incremental-crawl protocol:
//!
//! - `KnownScenes`: keys the caller already persisted, used by extractors as
//!   an advisory skip-list for detail pages
//! - `SiteUpdater`: the "this source was just refreshed" side effect, with a
//!   JSON-file-backed `SiteStateStore` and a no-op implementation

mod known;
mod site_state;

// Re-export main types
pub use known::KnownScenes;
pub use site_state::{NoopSiteUpdater, SiteStateStore, SiteUpdater};
