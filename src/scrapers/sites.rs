//! The static registry of news sources.
//!
//! Iteration order is the order sources are scraped and logged in; nothing
//! depends on it for correctness since each source is scraped independently.

use crate::models::{ExtractionRule, SiteConfig};
use once_cell::sync::Lazy;

static SITES: Lazy<Vec<SiteConfig>> = Lazy::new(|| {
    vec![
        SiteConfig {
            id: "g4media",
            url: "https://g4media.ro",
            rules: vec![ExtractionRule::new("div.post-review", "h3")],
        },
        SiteConfig {
            id: "hotnews",
            url: "https://hotnews.ro",
            rules: vec![ExtractionRule::new("article", "h2")],
        },
        SiteConfig {
            id: "spotmedia",
            url: "https://spotmedia.ro",
            rules: vec![ExtractionRule::new(
                "div.jet-smart-listing__post",
                "div.mbm-h6",
            )],
        },
        SiteConfig {
            id: "ziare",
            url: "https://ziare.com",
            rules: vec![
                ExtractionRule::new("div.spotlight__article", "h1.spotlight__article__title"),
                ExtractionRule::new("div.spotlight__article", "h2.spotlight__article__title"),
                ExtractionRule::new("div.news__article", "h3.news__article__title"),
            ],
        },
        SiteConfig {
            id: "digi24",
            url: "https://digi24.ro",
            rules: vec![
                ExtractionRule::new("article.article-alt", "h3.article-title"),
                ExtractionRule::new("article", "h4.article-title"),
            ],
        },
        SiteConfig {
            id: "libertatea",
            url: "https://libertatea.ro",
            rules: vec![
                ExtractionRule::new("div.news-item", "h3.article-title"),
                ExtractionRule::new("div.news-item", "h2.article-title"),
            ],
        },
        SiteConfig {
            id: "stirileprotv",
            url: "https://stirileprotv.ro",
            rules: vec![ExtractionRule::new("article.article", "h3.article-title-daily")],
        },
        SiteConfig {
            id: "news",
            url: "https://news.ro",
            rules: vec![ExtractionRule::new("article.article", "h2")],
        },
        SiteConfig {
            id: "gsp",
            url: "https://gsp.ro",
            rules: vec![ExtractionRule::new("div.news-item", "h2")],
        },
        SiteConfig {
            id: "prosport",
            url: "https://prosport.ro",
            rules: vec![ExtractionRule::new("div.article--wide", "h2.article__title")],
        },
    ]
});

/// All configured sources, in scrape order.
pub fn all() -> &'static [SiteConfig] {
    &SITES
}

/// Look up a source by id.
pub fn find(id: &str) -> Option<&'static SiteConfig> {
    SITES.iter().find(|site| site.id == id)
}
