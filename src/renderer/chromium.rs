//! Chromium-based renderer using chromiumoxide.

use super::{Locator, RenderContext, Renderer};
use crate::error::SessionError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often `wait_clickable` re-polls the page for the element.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. ODDSWATCH_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("ODDSWATCH_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. ~/.oddswatch/chromium/
    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".oddswatch/chromium/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".oddswatch/chromium/chrome"),
            ]
        } else {
            vec![
                home.join(".oddswatch/chromium/chrome-linux64/chrome"),
                home.join(".oddswatch/chromium/chrome"),
            ]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 3. System PATH
    if let Ok(path) = which::which("google-chrome") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium-browser") {
        return Some(path);
    }

    // 4. Common macOS locations
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Quote a string as an XPath 1.0 literal.
///
/// XPath 1.0 string literals have no escape sequences, so text containing an
/// apostrophe has to be assembled with `concat()` instead.
fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    let parts: Vec<String> = text.split('\'').map(|p| format!("'{p}'")).collect();
    format!("concat({})", parts.join(r#", "'", "#))
}

/// Chromium-based renderer.
pub struct ChromiumRenderer {
    browser: Browser,
    active_count: Arc<AtomicUsize>,
}

impl ChromiumRenderer {
    /// Create a new ChromiumRenderer, launching a headless Chromium instance.
    pub async fn new() -> Result<Self> {
        let chrome_path = find_chromium()
            .context("Chromium not found. Set ODDSWATCH_CHROMIUM_PATH or install Chrome.")?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        // Spawn the handler task
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser,
            active_count: Arc::new(AtomicUsize::new(0)),
        })
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>, SessionError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| SessionError::Browser(format!("failed to create new page: {e}")))?;

        self.active_count.fetch_add(1, Ordering::Relaxed);

        Ok(Box::new(ChromiumContext {
            page,
            active_count: Arc::clone(&self.active_count),
        }))
    }

    async fn shutdown(&self) -> Result<(), SessionError> {
        // Browser is dropped when ChromiumRenderer is dropped
        Ok(())
    }

    fn active_contexts(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }
}

/// A single Chromium page context.
pub struct ChromiumContext {
    page: Page,
    active_count: Arc<AtomicUsize>,
}

impl ChromiumContext {
    /// Resolve a locator to an element, if one currently exists.
    async fn find(&self, locator: &Locator) -> Result<Element, SessionError> {
        let result = match locator {
            Locator::Css(sel) => self.page.find_element(sel.as_str()).await,
            Locator::Id(id) => self.page.find_element(format!("#{id}")).await,
            Locator::XPath(xp) => self.page.find_xpath(xp.as_str()).await,
            Locator::LinkText(text) => {
                self.page
                    .find_xpath(format!(
                        "//a[normalize-space(text())={}]",
                        xpath_literal(text)
                    ))
                    .await
            }
        };
        result.map_err(|e| SessionError::Browser(format!("lookup failed for {locator}: {e}")))
    }

    /// Poll for the element until it exists and has a clickable point.
    async fn wait_for(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Element, SessionError> {
        let start = Instant::now();
        loop {
            if let Ok(el) = self.find(locator).await {
                if el.clickable_point().await.is_ok() {
                    return Ok(el);
                }
            }
            if start.elapsed() >= timeout {
                return Err(SessionError::InteractionTimeout {
                    locator: locator.to_string(),
                    waited: start.elapsed(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), SessionError> {
        let result = tokio::time::timeout(timeout, self.page.goto(url)).await;

        match result {
            Ok(Ok(_)) => {
                // Let the initial document settle before interaction starts
                let _ = self.page.wait_for_navigation().await;
                Ok(())
            }
            Ok(Err(e)) => Err(SessionError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(SessionError::Navigation {
                url: url.to_string(),
                reason: format!("timed out after {timeout:?}"),
            }),
        }
    }

    async fn wait_clickable(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        self.wait_for(locator, timeout).await.map(|_| ())
    }

    async fn click(&self, locator: &Locator, timeout: Duration) -> Result<(), SessionError> {
        let el = self.wait_for(locator, timeout).await?;
        el.scroll_into_view()
            .await
            .map_err(|e| SessionError::Browser(format!("scroll failed for {locator}: {e}")))?
            .click()
            .await
            .map_err(|e| SessionError::Browser(format!("click failed for {locator}: {e}")))?;
        Ok(())
    }

    async fn type_text(
        &self,
        locator: &Locator,
        text: &str,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        let el = self.wait_for(locator, timeout).await?;
        el.click()
            .await
            .map_err(|e| SessionError::Browser(format!("focus failed for {locator}: {e}")))?
            .type_str(text)
            .await
            .map_err(|e| SessionError::Browser(format!("typing failed for {locator}: {e}")))?;
        Ok(())
    }

    async fn execute_js(&self, script: &str) -> Result<serde_json::Value, SessionError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| SessionError::Script(e.to_string()))?;

        result
            .into_value()
            .map_err(|e| SessionError::Script(format!("failed to convert JS result: {e:?}")))
    }

    async fn content(&self) -> Result<String, SessionError> {
        let result = self
            .page
            .evaluate("document.documentElement.outerHTML")
            .await
            .map_err(|e| SessionError::Browser(format!("failed to get HTML: {e}")))?;

        result
            .into_value()
            .map_err(|e| SessionError::Browser(format!("failed to convert HTML result: {e:?}")))
    }

    async fn close(self: Box<Self>) -> Result<(), SessionError> {
        self.active_count.fetch_sub(1, Ordering::Relaxed);
        let _ = self.page.close().await;
        Ok(())
    }
}
