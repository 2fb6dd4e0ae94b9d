//! Headless-browser abstraction.
//!
//! A [`Renderer`] launches a [`RenderSession`] (one browser process per scrape
//! pass); a session opens [`RenderContext`]s (tabs), each of which loads one
//! URL and hands back the DOM as HTML once it has been parsed.

pub mod chromium;

use crate::error::RenderError;
use async_trait::async_trait;
use std::time::Duration;

/// The DOM of a loaded page, serialized back to HTML.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Address after redirects; relative links resolve against it.
    pub url: String,
    pub html: String,
}

/// Launches browser sessions.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn RenderSession>, RenderError>;
}

/// A running browser.
#[async_trait]
pub trait RenderSession: Send + Sync {
    /// Open a fresh browsing context.
    async fn new_context(&self) -> Result<Box<dyn RenderContext>, RenderError>;

    /// Shut the browser down.
    async fn close(self: Box<Self>) -> Result<(), RenderError>;
}

/// A single tab.
#[async_trait]
pub trait RenderContext: Send {
    /// Navigate to `url` and wait until the DOM has been parsed (not until
    /// every subresource has loaded), bounded by `timeout`.
    async fn load(&mut self, url: &str, timeout: Duration) -> Result<RenderedPage, RenderError>;

    async fn close(self: Box<Self>) -> Result<(), RenderError>;
}
