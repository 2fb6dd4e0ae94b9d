//! Test doubles: an in-memory article store and a fixture renderer.

use crate::error::{RenderError, StoreError};
use crate::models::{Article, NewArticle};
use crate::renderer::{RenderContext, RenderSession, RenderedPage, Renderer};
use crate::store::ArticleStore;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Article store backed by a `Vec`. Each insert is stamped one second after
/// the previous one so ordering by date is deterministic.
#[derive(Default)]
pub struct MemoryArticleStore {
    rows: Mutex<Vec<Article>>,
    fail: AtomicBool,
}

impl MemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a database error.
    pub fn fail_all(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<Article> {
        self.rows.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(StoreError::Database(sqlx::Error::PoolClosed))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn exists(&self, href: &str) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().iter().any(|a| a.href == href))
    }

    async fn insert(&self, article: &NewArticle) -> Result<(), StoreError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i32 + 1;
        let epoch = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        rows.push(Article {
            id,
            source: article.source.clone(),
            text: article.text.clone(),
            href: article.href.clone(),
            img_src: article.img_src.clone(),
            date: epoch + ChronoDuration::seconds(id as i64),
        });
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Article>, StoreError> {
        self.check()?;
        let mut rows = self.rows();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }
}

/// How the fixture renderer answers a URL.
#[derive(Clone)]
pub enum Fixture {
    Html(String),
    NavigationError(String),
}

/// Renderer serving canned HTML per URL. Unknown URLs fail navigation.
#[derive(Clone, Default)]
pub struct FixtureRenderer {
    pages: Arc<Mutex<HashMap<String, Fixture>>>,
    fail_launch: Arc<AtomicBool>,
    open_contexts: Arc<AtomicUsize>,
    launches: Arc<AtomicUsize>,
}

impl FixtureRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.set_page(url, html);
        self
    }

    pub fn with_navigation_error(self, url: &str, reason: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), Fixture::NavigationError(reason.to_string()));
        self
    }

    pub fn failing_launch(self) -> Self {
        self.fail_launch.store(true, Ordering::SeqCst);
        self
    }

    /// Replace a page's content between runs.
    pub fn set_page(&self, url: &str, html: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), Fixture::Html(html.to_string()));
    }

    /// Contexts opened but not yet closed.
    pub fn open_contexts(&self) -> usize {
        self.open_contexts.load(Ordering::SeqCst)
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for FixtureRenderer {
    async fn launch(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        if self.fail_launch.load(Ordering::SeqCst) {
            return Err(RenderError::Launch("no browser in test".to_string()));
        }
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl RenderSession for FixtureRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>, RenderError> {
        self.open_contexts.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FixtureContext {
            renderer: self.clone(),
        }))
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        Ok(())
    }
}

struct FixtureContext {
    renderer: FixtureRenderer,
}

#[async_trait]
impl RenderContext for FixtureContext {
    async fn load(&mut self, url: &str, _timeout: Duration) -> Result<RenderedPage, RenderError> {
        let fixture = self.renderer.pages.lock().unwrap().get(url).cloned();
        match fixture {
            Some(Fixture::Html(html)) => Ok(RenderedPage {
                url: url.to_string(),
                html,
            }),
            Some(Fixture::NavigationError(reason)) => Err(RenderError::Navigation {
                url: url.to_string(),
                reason,
            }),
            None => Err(RenderError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            }),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        self.renderer.open_contexts.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}
