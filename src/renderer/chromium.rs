//! Chromium renderer using chromiumoxide.

use super::{RenderContext, RenderSession, RenderedPage, Renderer};
use crate::error::RenderError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{EventDomContentEventFired, NavigateParams};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Launches headless Chromium. Without an explicit executable, chromiumoxide
/// looks for an installed Chrome/Chromium on its own.
#[derive(Debug, Clone, Default)]
pub struct ChromiumRenderer {
    executable: Option<PathBuf>,
}

impl ChromiumRenderer {
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self { executable }
    }

    fn config(&self) -> Result<BrowserConfig, RenderError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(RenderError::Launch)
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    #[instrument(level = "info", skip_all)]
    async fn launch(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        let config = self.config()?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        // The handler drives the CDP connection and must be polled for the
        // browser to make progress.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "Browser handler event error");
                }
            }
        });

        info!("Launched headless Chromium");
        Ok(Box::new(ChromiumSession {
            browser,
            handler_task,
        }))
    }
}

pub struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl RenderSession for ChromiumSession {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>, RenderError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::Protocol(e.to_string()))?;
        Ok(Box::new(ChromiumContext { page }))
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        let ChromiumSession {
            mut browser,
            handler_task,
        } = *self;
        let closed = browser
            .close()
            .await
            .map_err(|e| RenderError::Protocol(e.to_string()));
        if closed.is_ok() {
            if let Err(e) = browser.wait().await {
                warn!(error = %e, "Browser process did not exit cleanly");
            }
        }
        handler_task.abort();
        closed.map(|_| ())
    }
}

pub struct ChromiumContext {
    page: Page,
}

impl ChromiumContext {
    /// Navigate and wait for `DOMContentLoaded`.
    async fn navigate(&self, url: &str) -> Result<(), RenderError> {
        let protocol = |e: chromiumoxide::error::CdpError| RenderError::Protocol(e.to_string());

        // Subscribe before navigating so the event cannot be missed.
        let mut dom_ready = self
            .page
            .event_listener::<EventDomContentEventFired>()
            .await
            .map_err(protocol)?;

        let response = self
            .page
            .execute(NavigateParams::new(url))
            .await
            .map_err(|e| RenderError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        if let Some(reason) = response.result.error_text.clone() {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                reason,
            });
        }

        match dom_ready.next().await {
            Some(_) => Ok(()),
            None => Err(RenderError::Navigation {
                url: url.to_string(),
                reason: "page closed before DOMContentLoaded".to_string(),
            }),
        }
    }
}

#[async_trait]
impl RenderContext for ChromiumContext {
    #[instrument(level = "info", skip(self, timeout), fields(timeout_secs = timeout.as_secs()))]
    async fn load(&mut self, url: &str, timeout: Duration) -> Result<RenderedPage, RenderError> {
        let start = Instant::now();

        tokio::time::timeout(timeout, self.navigate(url))
            .await
            .map_err(|_| RenderError::Timeout {
                url: url.to_string(),
                secs: timeout.as_secs(),
            })??;

        let html = self
            .page
            .content()
            .await
            .map_err(|e| RenderError::Protocol(e.to_string()))?;
        let final_url = self
            .page
            .url()
            .await
            .map_err(|e| RenderError::Protocol(e.to_string()))?
            .unwrap_or_else(|| url.to_string());

        debug!(
            final_url = %final_url,
            bytes = html.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "DOM loaded"
        );
        Ok(RenderedPage {
            url: final_url,
            html,
        })
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        self.page
            .close()
            .await
            .map_err(|e| RenderError::Protocol(e.to_string()))
    }
}
