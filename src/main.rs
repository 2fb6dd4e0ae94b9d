//! # Headline Scraper
//!
//! Scrapes headline articles (text, link, image) from a fixed set of Romanian
//! news sites with headless Chromium, stores articles not seen before in
//! MySQL, and serves them over a small HTTP API.
//!
//! ## Usage
//!
//! ```sh
//! headline_scraper            # serve GET /scrape-all and GET /articles
//! headline_scraper scrape     # one scrape pass, JSON summary on stdout
//! headline_scraper articles   # dump stored articles as JSON
//! ```
//!
//! ## Architecture
//!
//! 1. **Registry**: static list of sources and their CSS selector rules
//! 2. **Rendering**: each source's front page is loaded in its own tab
//! 3. **Extraction**: headlines are pulled from the parsed DOM and deduplicated
//! 4. **Storage**: links not already in the `articles` table are inserted

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod error;
mod models;
mod renderer;
mod scrapers;
mod store;
#[cfg(test)]
mod testing;
mod utils;

use cli::{Cli, Command};
use renderer::chromium::ChromiumRenderer;
use store::{ArticleStore, MySqlArticleStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real environment variables take precedence.
    let _ = dotenvy::dotenv();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,chromiumoxide=warn"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args.command, mysql_host = %args.mysql_host, "Parsed CLI arguments");

    let store = Arc::new(MySqlArticleStore::connect_lazy(&args.mysql_settings()));
    let renderer = Arc::new(ChromiumRenderer::new(args.chrome_executable.clone()));
    let sites = scrapers::sites::all();

    match args.command() {
        Command::Serve => {
            // The API stays up without a schema; `/articles` reports the failure.
            if let Err(e) = store.ensure_schema().await {
                error!(error = %e, "Failed to initialize database");
            }
            let state = api::AppState::new(store, renderer, sites, args.page_timeout());
            api::serve(args.listen, state).await?;
        }
        Command::Scrape => {
            store
                .ensure_schema()
                .await
                .context("Failed to initialize database")?;
            let summary =
                scrapers::run_scrape_all(renderer.as_ref(), store.as_ref(), sites, args.page_timeout())
                    .await
                    .context("Scraping failed")?;
            info!(
                inserted = summary.articles_inserted(),
                failed = summary.sites_failed(),
                "Scrape finished"
            );
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Articles => {
            let articles = store
                .list_all()
                .await
                .context("Failed to fetch articles")?;
            println!("{}", serde_json::to_string_pretty(&articles)?);
        }
    }

    Ok(())
}
