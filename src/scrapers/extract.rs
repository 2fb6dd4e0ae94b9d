//! Headline extraction from a rendered page.
//!
//! Extraction runs against the [`Dom`] trait rather than a concrete parser so
//! it can be fed from fixtures. [`HtmlPage`] is the production DOM: the HTML
//! returned by the browser, parsed with `scraper`, with relative URLs resolved
//! against the page's final address.

use crate::error::ExtractError;
use crate::models::{ExtractionRule, ScrapedItem};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, instrument};
use url::Url;

/// Read-only DOM queries needed by [`extract`].
pub trait Dom {
    /// A handle to an element, borrowed from the DOM.
    type Node<'a>: Copy
    where
        Self: 'a;

    /// All elements in the document matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Result<Vec<Self::Node<'_>>, ExtractError>;

    /// First descendant of `scope` matching `selector`.
    fn query_first<'a>(
        &'a self,
        scope: Self::Node<'a>,
        selector: &str,
    ) -> Result<Option<Self::Node<'a>>, ExtractError>;

    /// Raw attribute value.
    fn attribute<'a>(&'a self, node: Self::Node<'a>, name: &str) -> Option<String>;

    /// Concatenated text content of `node` and its descendants.
    fn text<'a>(&'a self, node: Self::Node<'a>) -> String;

    /// Attribute value resolved to an absolute URL against the page address.
    fn absolute_attribute<'a>(&'a self, node: Self::Node<'a>, name: &str) -> Option<String>;

    fn absolute_href<'a>(&'a self, node: Self::Node<'a>) -> Option<String> {
        self.absolute_attribute(node, "href")
    }
}

/// A parsed HTML document plus the URL it was loaded from.
pub struct HtmlPage {
    document: Html,
    base: Url,
}

impl HtmlPage {
    pub fn parse(html: &str, page_url: &str) -> Result<Self, ExtractError> {
        let base = Url::parse(page_url).map_err(|source| ExtractError::InvalidBaseUrl {
            url: page_url.to_string(),
            source,
        })?;
        Ok(Self {
            document: Html::parse_document(html),
            base,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

impl Dom for HtmlPage {
    type Node<'a> = ElementRef<'a>;

    fn query_all(&self, selector: &str) -> Result<Vec<ElementRef<'_>>, ExtractError> {
        let selector = parse_selector(selector)?;
        Ok(self.document.select(&selector).collect())
    }

    fn query_first<'a>(
        &'a self,
        scope: ElementRef<'a>,
        selector: &str,
    ) -> Result<Option<ElementRef<'a>>, ExtractError> {
        let selector = parse_selector(selector)?;
        Ok(scope.select(&selector).next())
    }

    fn attribute<'a>(&'a self, node: ElementRef<'a>, name: &str) -> Option<String> {
        node.value().attr(name).map(str::to_string)
    }

    fn text<'a>(&'a self, node: ElementRef<'a>) -> String {
        node.text().collect()
    }

    fn absolute_attribute<'a>(&'a self, node: ElementRef<'a>, name: &str) -> Option<String> {
        let raw = node.value().attr(name)?;
        match self.base.join(raw) {
            Ok(resolved) => Some(resolved.to_string()),
            Err(_) => Some(raw.to_string()),
        }
    }
}

/// Image source for a container: `data-src` (lazy-loaded images) wins over
/// `src`. Only `src` is resolved, `data-src` is kept as written.
fn image_source<'a, D: Dom>(
    dom: &'a D,
    container: D::Node<'a>,
) -> Result<Option<String>, ExtractError> {
    let Some(img) = dom.query_first(container, "img")? else {
        return Ok(None);
    };
    if let Some(data_src) = dom.attribute(img, "data-src").filter(|s| !s.is_empty()) {
        return Ok(Some(data_src));
    }
    Ok(dom.absolute_attribute(img, "src").filter(|s| !s.is_empty()))
}

/// Extract headlines for one source.
///
/// Items are produced in rule order, then document order. Items sharing a
/// link keep only the first occurrence across all rules; items without a link
/// are all kept. An invalid selector fails the whole source.
#[instrument(level = "debug", skip(dom, rules), fields(rules = rules.len()))]
pub fn extract<D: Dom>(
    dom: &D,
    rules: &[ExtractionRule],
    source_id: &str,
) -> Result<Vec<ScrapedItem>, ExtractError> {
    let mut items = Vec::new();
    let mut seen_links = HashSet::new();

    for rule in rules {
        let containers = dom.query_all(rule.container_selector)?;
        debug!(
            container = rule.container_selector,
            matched = containers.len(),
            "Matched containers"
        );

        for container in containers {
            let img_src = image_source(dom, container)?;

            let (text, href) = match dom.query_first(container, rule.content_selector)? {
                Some(content) => {
                    let text = dom.text(content).trim().to_string();
                    let href = match dom.query_first(content, "a")? {
                        Some(anchor) => dom.absolute_href(anchor).filter(|h| !h.is_empty()),
                        None => None,
                    };
                    (Some(text), href)
                }
                None => (None, None),
            };

            if let Some(ref link) = href {
                if !seen_links.insert(link.clone()) {
                    continue;
                }
            }

            items.push(ScrapedItem {
                source: source_id.to_string(),
                text,
                href,
                img_src,
            });
        }
    }

    debug!(count = items.len(), "Extracted items");
    Ok(items)
}

/// Parse rendered HTML and extract headlines in one step.
///
/// The parsed document never outlives this call, so callers in async code do
/// not hold it across an await point.
pub fn extract_from_html(
    html: &str,
    page_url: &str,
    rules: &[ExtractionRule],
    source_id: &str,
) -> Result<Vec<ScrapedItem>, ExtractError> {
    let page = HtmlPage::parse(html, page_url)?;
    extract(&page, rules, source_id)
}
