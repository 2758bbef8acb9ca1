//! Fetch/traverse collector
//!
//! This module contains everything an extractor needs to read a site:
//! - HTTP fetching scoped to one source (`Collector`)
//! - HTML parsing with CSS-selector and regex helpers (`Document`)
//! - Paginated listing traversal (`ListingWalker`)
//! - Detail page traversal (`Collector::visit_detail`)

mod document;
mod fetcher;
mod listing;

pub use document::{element_text, resolve_link, Document, Page};
pub use fetcher::{build_http_client, Collector, FetchError};
pub use listing::{ListingPage, ListingRules, ListingWalker};
