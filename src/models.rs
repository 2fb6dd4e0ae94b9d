//! Data models for scraped headlines and their persisted representation.
//!
//! - [`SiteConfig`] / [`ExtractionRule`]: static description of a news source
//! - [`ScrapedItem`]: one headline as pulled off a rendered page
//! - [`NewArticle`]: the insert payload derived from a linked [`ScrapedItem`]
//! - [`Article`]: a row of the `articles` table
//! - [`ScrapeSummary`]: per-site outcome of one scrape pass
//!
//! `Article` keeps the column name `imgSrc` on the wire so API consumers see
//! the same field names the table uses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pair of CSS selectors describing where headlines live on a page.
///
/// The container selector picks the repeated article blocks; the content
/// selector is evaluated inside each block to find the headline element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionRule {
    pub container_selector: &'static str,
    pub content_selector: &'static str,
}

impl ExtractionRule {
    pub const fn new(container_selector: &'static str, content_selector: &'static str) -> Self {
        Self {
            container_selector,
            content_selector,
        }
    }
}

/// A configured news source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteConfig {
    /// Short source identifier stored with every article (e.g. `"hotnews"`).
    pub id: &'static str,
    /// Front page to render.
    pub url: &'static str,
    /// Extraction rules, applied in order.
    pub rules: Vec<ExtractionRule>,
}

/// A headline extracted from a page, before persistence.
///
/// `text` and `href` are `None` when the container had no element matching
/// the content selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedItem {
    pub source: String,
    pub text: Option<String>,
    pub href: Option<String>,
    pub img_src: Option<String>,
}

impl ScrapedItem {
    /// Convert into an insert payload. Items without a link are never stored.
    pub fn to_new_article(&self) -> Option<NewArticle> {
        let href = self.href.clone()?;
        Some(NewArticle {
            source: self.source.clone(),
            text: self.text.clone().unwrap_or_default(),
            href,
            img_src: self.img_src.clone(),
        })
    }
}

/// Row payload for an insert; `id` and `date` are assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub source: String,
    pub text: String,
    pub href: String,
    pub img_src: Option<String>,
}

/// A persisted headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: i32,
    pub source: String,
    pub text: String,
    pub href: String,
    #[serde(rename = "imgSrc")]
    #[sqlx(rename = "imgSrc")]
    pub img_src: Option<String>,
    pub date: DateTime<Utc>,
}

/// What happened to a single source during a scrape pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SiteStatus {
    Scraped {
        /// Items produced by the extractor after deduplication.
        found: usize,
        inserted: usize,
        skipped_existing: usize,
        skipped_without_link: usize,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteOutcome {
    pub source: String,
    #[serde(flatten)]
    pub status: SiteStatus,
}

/// Result of one full pass over the site registry, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScrapeSummary {
    pub sites: Vec<SiteOutcome>,
}

impl ScrapeSummary {
    pub fn articles_inserted(&self) -> usize {
        self.sites
            .iter()
            .map(|site| match site.status {
                SiteStatus::Scraped { inserted, .. } => inserted,
                SiteStatus::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn sites_failed(&self) -> usize {
        self.sites
            .iter()
            .filter(|site| matches!(site.status, SiteStatus::Failed { .. }))
            .count()
    }
}
