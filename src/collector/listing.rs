//! Listing and detail traversal
//!
//! A listing traversal walks paginated index pages and yields the detail
//! URLs found on each page. A detail traversal fetches one detail page and
//! turns it into at most one scene.

use crate::collector::document::Document;
use crate::collector::fetcher::{Collector, FetchError};
use crate::model::ScrapedScene;
use std::collections::HashSet;

/// Selectors describing one site's listing pages
#[derive(Debug, Clone)]
pub struct ListingRules {
    /// Elements whose `href` points at a detail page
    pub item_selector: String,

    /// Element whose `href` points at the next listing page
    pub next_selector: String,

    /// Maximum pages walked, 0 for no limit
    pub max_pages: u32,
}

impl ListingRules {
    pub fn new(item_selector: impl Into<String>, next_selector: impl Into<String>) -> Self {
        Self {
            item_selector: item_selector.into(),
            next_selector: next_selector.into(),
            max_pages: 0,
        }
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }
}

/// One walked listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub url: String,

    /// Detail URLs first seen on this page, in document order
    pub detail_urls: Vec<String>,

    pub next_url: Option<String>,
}

/// Walks listing pages one at a time
///
/// Detail URLs are de-duplicated across the whole walk. The walk ends when
/// a page has no next link, the next link was already visited, or the page
/// limit is hit.
#[derive(Debug)]
pub struct ListingWalker<'c> {
    collector: &'c mut Collector,
    rules: ListingRules,
    next: Option<String>,
    seen_items: HashSet<String>,
    pages: u32,
}

impl<'c> ListingWalker<'c> {
    pub fn new(collector: &'c mut Collector, start_url: impl Into<String>, rules: ListingRules) -> Self {
        Self {
            collector,
            rules,
            next: Some(start_url.into()),
            seen_items: HashSet::new(),
            pages: 0,
        }
    }

    /// Number of listing pages fetched so far
    pub fn pages_walked(&self) -> u32 {
        self.pages
    }

    /// Fetches the next listing page
    ///
    /// Returns `Ok(None)` once the walk is over. A fetch failure is returned
    /// as is; the walk cannot continue past a page it could not read.
    pub async fn next_page(&mut self) -> Result<Option<ListingPage>, FetchError> {
        let Some(url) = self.next.take() else {
            return Ok(None);
        };

        if self.rules.max_pages > 0 && self.pages >= self.rules.max_pages {
            tracing::debug!("Listing page limit {} reached", self.rules.max_pages);
            return Ok(None);
        }

        let Some(page) = self.collector.visit(&url).await? else {
            tracing::debug!("Listing page {} already visited, stopping", url);
            return Ok(None);
        };
        self.pages += 1;

        let (links, next_url) = {
            let doc = page.document();
            let links = doc.links(&self.rules.item_selector);
            let next_url = doc.links(&self.rules.next_selector).into_iter().next();
            (links, next_url)
        };

        let detail_urls: Vec<String> = links
            .into_iter()
            .filter(|link| self.seen_items.insert(link.clone()))
            .collect();

        tracing::debug!(
            "Listing page {} yielded {} new detail links",
            url,
            detail_urls.len()
        );

        self.next = next_url.clone();
        Ok(Some(ListingPage {
            url,
            detail_urls,
            next_url,
        }))
    }
}

impl Collector {
    /// Fetches one detail page and parses it into at most one scene
    ///
    /// Fetch failures and repeat visits are logged and yield `None`; they
    /// never abort the surrounding listing traversal.
    pub async fn visit_detail<F>(&mut self, url: &str, parse: F) -> Option<ScrapedScene>
    where
        F: FnOnce(&Document) -> Option<ScrapedScene>,
    {
        let page = match self.visit(url).await {
            Ok(Some(page)) => page,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Skipping detail page: {}", e);
                return None;
            }
        };

        let doc = page.document();
        let scene = parse(&doc);
        if scene.is_none() {
            tracing::debug!("No scene found on {}", url);
        }
        scene
    }
}
