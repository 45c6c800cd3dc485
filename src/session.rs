//! Interactive session controller.
//!
//! A `Session` wraps one exclusively-owned browser context bound to one site
//! and exposes the interaction vocabulary the site flows are written in:
//! wait-for-clickable, click, type-text, script injection, a one-shot cookie
//! acceptance, and a named settle delay. Every step is debug-logged.

use crate::error::SessionError;
use crate::renderer::{Locator, RenderContext};
use crate::sites::SiteFlow;
use std::time::Duration;
use tracing::debug;

/// One controlled browser instance bound to one site.
pub struct Session {
    context: Box<dyn RenderContext>,
    base_url: String,
    /// Maximum wait for any single interaction step.
    timeout: Duration,
    /// Fixed delay used where a page has no observable completion signal.
    /// A heuristic, not a guarantee; tunable so tests can shrink it.
    settle_delay: Duration,
    /// One-shot flag: cookie acceptance is attempted at most once per session.
    cookies_accepted: bool,
}

impl Session {
    pub fn new(
        context: Box<dyn RenderContext>,
        base_url: impl Into<String>,
        timeout: Duration,
        settle_delay: Duration,
    ) -> Self {
        Self {
            context,
            base_url: base_url.into(),
            timeout,
            settle_delay,
            cookies_accepted: false,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Block until the element is present and clickable.
    pub async fn wait_clickable(&self, locator: &Locator) -> Result<(), SessionError> {
        self.context.wait_clickable(locator, self.timeout).await
    }

    /// Click an element once it becomes clickable.
    pub async fn click(&self, locator: &Locator, hint: &str) -> Result<(), SessionError> {
        debug!(step = hint, %locator, "click");
        self.context.click(locator, self.timeout).await
    }

    /// Type into an element once it becomes clickable.
    pub async fn type_text(
        &self,
        locator: &Locator,
        text: &str,
        hint: &str,
    ) -> Result<(), SessionError> {
        debug!(step = hint, %locator, text, "type");
        self.context.type_text(locator, text, self.timeout).await
    }

    /// Attempt to click the cookie-consent control, at most once per session.
    ///
    /// An `InteractionTimeout` here is expected (consent already stored, or a
    /// site variant without the banner) and is swallowed after logging. Any
    /// other error propagates. Subsequent calls are no-ops.
    pub async fn accept_cookies_once(&mut self, locator: &Locator) -> Result<(), SessionError> {
        if self.cookies_accepted {
            debug!("cookies already handled for this session");
            return Ok(());
        }
        self.cookies_accepted = true;

        debug!(%locator, "accept cookies");
        match self.context.click(locator, self.timeout).await {
            Ok(()) => Ok(()),
            Err(SessionError::InteractionTimeout { locator, waited }) => {
                debug!(%locator, ?waited, "cookie banner absent; continuing");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Execute an injected script in the page.
    pub async fn execute_js(
        &self,
        script: &str,
        hint: &str,
    ) -> Result<serde_json::Value, SessionError> {
        debug!(step = hint, "execute script");
        self.context.execute_js(script).await
    }

    /// Sleep the configured settle delay.
    ///
    /// Used after interactions whose effects populate the DOM asynchronously
    /// with no completion signal to wait on.
    pub async fn settle(&self) {
        debug!(delay = ?self.settle_delay, "settling");
        tokio::time::sleep(self.settle_delay).await;
    }

    /// Navigate to the session's base URL, run the site flow's preparation
    /// sequence, and return the rendered document source.
    ///
    /// A failure partway through preparation leaves the page in an unknown
    /// state; it is reported as a whole-navigation failure, never resumed.
    pub async fn fetch_rendered_content(
        &mut self,
        flow: &dyn SiteFlow,
    ) -> Result<String, SessionError> {
        let url = self.base_url.clone();
        debug!(%url, "navigate");
        self.context.navigate(&url, self.timeout).await?;
        flow.prepare_page_content(self).await?;
        self.context.content().await
    }

    /// Close the session, releasing the browser context.
    pub async fn close(self) -> Result<(), SessionError> {
        self.context.close().await
    }
}
