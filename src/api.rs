//! HTTP API.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /scrape-all` | runs one scrape pass; `{ message, summary }` or 500 `{ error }` |
//! | `GET /articles` | `{ data: [Article] }` newest first, or 500 `{ error }` |
//!
//! A scrape request holds the connection open until the pass finishes.
//! Passes are serialized: a second `/scrape-all` waits for the first, which
//! keeps the exists-then-insert check from racing inside this process.

use crate::models::{Article, ScrapeSummary, SiteConfig};
use crate::renderer::Renderer;
use crate::scrapers::run_scrape_all;
use crate::store::ArticleStore;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub const SCRAPE_COMPLETED: &str = "Scraping completed and data saved to MySQL";

/// Process-scoped dependencies shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ArticleStore>,
    pub renderer: Arc<dyn Renderer>,
    pub sites: &'static [SiteConfig],
    pub page_timeout: Duration,
    scrape_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ArticleStore>,
        renderer: Arc<dyn Renderer>,
        sites: &'static [SiteConfig],
        page_timeout: Duration,
    ) -> Self {
        Self {
            store,
            renderer,
            sites,
            page_timeout,
            scrape_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub message: &'static str,
    pub summary: ScrapeSummary,
}

#[derive(Debug, Serialize)]
pub struct ArticlesResponse {
    pub data: Vec<Article>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

fn server_error(message: &'static str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: message }),
    )
        .into_response()
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/scrape-all", get(scrape_all))
        .route("/articles", get(list_articles))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP API listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn scrape_all(State(state): State<AppState>) -> Response {
    info!("Scrape-all endpoint accessed");
    let _guard = state.scrape_lock.lock().await;

    match run_scrape_all(
        state.renderer.as_ref(),
        state.store.as_ref(),
        state.sites,
        state.page_timeout,
    )
    .await
    {
        Ok(summary) => Json(ScrapeResponse {
            message: SCRAPE_COMPLETED,
            summary,
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, "Error in scrape-all");
            server_error("Scraping failed")
        }
    }
}

async fn list_articles(State(state): State<AppState>) -> Response {
    match state.store.list_all().await {
        Ok(data) => Json(ArticlesResponse { data }).into_response(),
        Err(e) => {
            error!(error = %e, "Error fetching articles");
            server_error("Failed to fetch articles")
        }
    }
}
