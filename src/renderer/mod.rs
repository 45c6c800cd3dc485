//! Renderer abstraction for browser-based page rendering.
//!
//! Defines the `Renderer` and `RenderContext` traits that abstract over the
//! browser engine (currently Chromium via chromiumoxide). Tests implement
//! `RenderContext` with in-memory fakes.

pub mod chromium;

use crate::error::SessionError;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// How to locate an element on a page.
///
/// Closed set of locator kinds: CSS class/attribute match, element id, exact
/// link text, and structural XPath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    XPath(String),
    Id(String),
    LinkText(String),
}

impl Locator {
    pub fn css(s: &str) -> Self {
        Locator::Css(s.to_string())
    }

    pub fn xpath(s: &str) -> Self {
        Locator::XPath(s.to_string())
    }

    pub fn id(s: &str) -> Self {
        Locator::Id(s.to_string())
    }

    pub fn link_text(s: &str) -> Self {
        Locator::LinkText(s.to_string())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css `{s}`"),
            Locator::XPath(s) => write!(f, "xpath `{s}`"),
            Locator::Id(s) => write!(f, "id `{s}`"),
            Locator::LinkText(s) => write!(f, "link text `{s}`"),
        }
    }
}

/// A browser engine that can create rendering contexts.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Create a new browser context (tab).
    async fn new_context(&self) -> Result<Box<dyn RenderContext>, SessionError>;
    /// Shut down the browser engine.
    async fn shutdown(&self) -> Result<(), SessionError>;
    /// Number of currently active contexts.
    fn active_contexts(&self) -> usize;
}

/// A single browser context (tab) for driving and rendering one page.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to a URL, waiting up to `timeout` for the load.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), SessionError>;

    /// Block until the element is present and clickable, or time out.
    async fn wait_clickable(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<(), SessionError>;

    /// Resolve the element via `wait_clickable`, then pointer move-and-click.
    async fn click(&self, locator: &Locator, timeout: Duration) -> Result<(), SessionError>;

    /// Resolve the element via `wait_clickable`, focus it, send keystrokes.
    async fn type_text(
        &self,
        locator: &Locator,
        text: &str,
        timeout: Duration,
    ) -> Result<(), SessionError>;

    /// Execute JavaScript in the page context and return the result.
    async fn execute_js(&self, script: &str) -> Result<serde_json::Value, SessionError>;

    /// Get the current rendered document source.
    async fn content(&self) -> Result<String, SessionError>;

    /// Close this context.
    async fn close(self: Box<Self>) -> Result<(), SessionError>;
}
