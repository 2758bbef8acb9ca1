//! Structural queries over a fetched page
//!
//! A `Page` is what the fetcher returns; it is `Send` and can be held across
//! awaits. `Page::document` parses it into a `Document`, which offers CSS
//! selector and regex helpers. A `Document` is not `Send`: parse, extract
//! what you need, and drop it before the next `.await`.
//!
//! Missing elements and invalid selectors never fail; they produce empty
//! values so extractors leave the corresponding field at its zero value.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A fetched page body with its final URL
#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    status: u16,
    body: String,
}

impl Page {
    pub fn new(url: Url, status: u16, body: String) -> Self {
        Self { url, status, body }
    }

    /// Final URL after redirects
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the body as HTML
    pub fn document(&self) -> Document {
        Document::parse(&self.body, self.url.clone())
    }
}

/// Parsed HTML with query helpers
pub struct Document {
    html: Html,
    url: Url,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").field("url", &self.url.as_str()).finish()
    }
}

impl Document {
    /// Parses `html`; relative links resolve against `url`
    ///
    /// # Example
    ///
    /// ```
    /// use scene_scraper::collector::Document;
    /// use url::Url;
    ///
    /// let html = r#"<html><body><h1 class="title"> Hello </h1><a href="/next">n</a></body></html>"#;
    /// let doc = Document::parse(html, Url::parse("https://example.com/list").unwrap());
    /// assert_eq!(doc.text("h1.title"), "Hello");
    /// assert_eq!(doc.links("a"), vec!["https://example.com/next".to_string()]);
    /// ```
    pub fn parse(html: &str, url: Url) -> Self {
        Self {
            html: Html::parse_document(html),
            url,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The URL without its query string and fragment
    pub fn url_without_query(&self) -> String {
        let mut url = self.url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.to_string()
    }

    /// All elements matching `css`, in document order
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(e) => {
                tracing::debug!("Invalid selector '{}': {:?}", css, e);
                Vec::new()
            }
        }
    }

    /// Trimmed text of every element matching `css`, concatenated
    pub fn text(&self, css: &str) -> String {
        self.select(css)
            .iter()
            .map(|el| el.text().collect::<String>())
            .collect::<String>()
            .trim()
            .to_string()
    }

    /// Trimmed text of each element matching `css`
    pub fn texts(&self, css: &str) -> Vec<String> {
        self.select(css).iter().map(element_text).collect()
    }

    /// Attribute of the first element matching `css` that has it
    pub fn attr(&self, css: &str, name: &str) -> Option<String> {
        self.select(css)
            .iter()
            .find_map(|el| el.value().attr(name))
            .map(|value| value.trim().to_string())
    }

    /// Attribute of every element matching `css` that has it
    pub fn attrs(&self, css: &str, name: &str) -> Vec<String> {
        self.select(css)
            .iter()
            .filter_map(|el| el.value().attr(name))
            .map(|value| value.trim().to_string())
            .collect()
    }

    /// Absolute `href` of every element matching `css`
    pub fn links(&self, css: &str) -> Vec<String> {
        self.attrs(css, "href")
            .iter()
            .filter_map(|href| resolve_link(href, &self.url))
            .collect()
    }

    /// Resolves `href` against the page URL
    pub fn absolute_url(&self, href: &str) -> Option<String> {
        resolve_link(href, &self.url)
    }

    /// Capture groups of the first match of `regex` in the text of any
    /// element matching `css`
    pub fn find_captures(&self, css: &str, regex: &Regex) -> Option<Vec<String>> {
        self.select(css).iter().find_map(|el| {
            let text = el.text().collect::<String>();
            regex.captures(&text).map(|caps| {
                caps.iter()
                    .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                    .collect()
            })
        })
    }
}

/// Trimmed text content of one element
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolves a link href to an absolute HTTP(S) URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url.to_string())
    } else {
        None
    }
}
