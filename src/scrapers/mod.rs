//! Scraping of the configured news sources.
//!
//! - [`sites`]: the static source registry
//! - [`extract`]: headline extraction from a rendered page
//!
//! [`run_scrape_all`] ties them together: one browser per pass, sources
//! visited one after another, each in its own tab. A failing source is logged
//! and recorded in the summary without stopping the pass; only a failure to
//! launch the browser aborts it.

pub mod extract;
pub mod sites;

use crate::error::ScrapeError;
use crate::models::{ScrapeSummary, SiteConfig, SiteOutcome, SiteStatus};
use crate::renderer::{RenderSession, Renderer};
use crate::store::ArticleStore;
use crate::utils::truncate_for_log;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Counters for one successfully scraped source.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct SiteReport {
    found: usize,
    inserted: usize,
    skipped_existing: usize,
    skipped_without_link: usize,
}

/// Scrape every source in `sites` and store articles not seen before.
#[instrument(level = "info", skip_all, fields(sites = sites.len()))]
pub async fn run_scrape_all(
    renderer: &dyn Renderer,
    store: &dyn ArticleStore,
    sites: &[SiteConfig],
    page_timeout: Duration,
) -> Result<ScrapeSummary, ScrapeError> {
    let start_time = Instant::now();
    let session = renderer.launch().await.map_err(ScrapeError::Launch)?;

    let mut summary = ScrapeSummary::default();
    for site in sites {
        let status = match scrape_site(session.as_ref(), store, site, page_timeout).await {
            Ok(report) => {
                info!(
                    source = site.id,
                    found = report.found,
                    inserted = report.inserted,
                    skipped_existing = report.skipped_existing,
                    "Scraped source"
                );
                SiteStatus::Scraped {
                    found: report.found,
                    inserted: report.inserted,
                    skipped_existing: report.skipped_existing,
                    skipped_without_link: report.skipped_without_link,
                }
            }
            Err(e) => {
                error!(source = site.id, url = site.url, error = %e, "Failed to scrape source");
                SiteStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };
        summary.sites.push(SiteOutcome {
            source: site.id.to_string(),
            status,
        });
    }

    if let Err(e) = session.close().await {
        warn!(error = %e, "Failed to close browser");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        inserted = summary.articles_inserted(),
        failed = summary.sites_failed(),
        "Scrape pass complete"
    );
    Ok(summary)
}

/// Render, extract and persist one source. The tab is closed whether or not
/// the scrape succeeded.
#[instrument(level = "info", skip_all, fields(source = site.id))]
async fn scrape_site(
    session: &dyn RenderSession,
    store: &dyn ArticleStore,
    site: &SiteConfig,
    page_timeout: Duration,
) -> Result<SiteReport, ScrapeError> {
    let mut context = session.new_context().await?;
    let loaded = context.load(site.url, page_timeout).await;
    if let Err(e) = context.close().await {
        warn!(error = %e, "Failed to close tab");
    }
    let page = loaded?;

    let items = extract::extract_from_html(&page.html, &page.url, &site.rules, site.id)?;

    let mut report = SiteReport {
        found: items.len(),
        ..SiteReport::default()
    };
    for item in &items {
        let Some(article) = item.to_new_article() else {
            report.skipped_without_link += 1;
            continue;
        };
        if store.exists(&article.href).await? {
            report.skipped_existing += 1;
            continue;
        }
        debug!(text = %truncate_for_log(&article.text, 120), href = %article.href, "Inserting article");
        store.insert(&article).await?;
        report.inserted += 1;
    }
    Ok(report)
}
