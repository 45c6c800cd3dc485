//! Cycle-level behavior against fake browser contexts: cookie-timeout
//! tolerance, failure propagation, and per-source isolation in the loop.

use async_trait::async_trait;
use oddswatch::error::SessionError;
use oddswatch::poller::run_cycle;
use oddswatch::renderer::{Locator, RenderContext};
use oddswatch::session::Session;
use oddswatch::sites::{SiteFlow, SiteOdds, Source};
use std::time::Duration;

/// Fake context: clicks either all succeed or all time out immediately;
/// `content` returns a fixed document.
struct FakeContext {
    clicks_fail: bool,
    html: &'static str,
}

impl FakeContext {
    fn timeout(&self, locator: &Locator) -> SessionError {
        SessionError::InteractionTimeout {
            locator: locator.to_string(),
            waited: Duration::ZERO,
        }
    }
}

#[async_trait]
impl RenderContext for FakeContext {
    async fn navigate(&mut self, _url: &str, _timeout: Duration) -> Result<(), SessionError> {
        Ok(())
    }

    async fn wait_clickable(
        &self,
        locator: &Locator,
        _timeout: Duration,
    ) -> Result<(), SessionError> {
        if self.clicks_fail {
            Err(self.timeout(locator))
        } else {
            Ok(())
        }
    }

    async fn click(&self, locator: &Locator, _timeout: Duration) -> Result<(), SessionError> {
        if self.clicks_fail {
            Err(self.timeout(locator))
        } else {
            Ok(())
        }
    }

    async fn type_text(
        &self,
        locator: &Locator,
        _text: &str,
        _timeout: Duration,
    ) -> Result<(), SessionError> {
        if self.clicks_fail {
            Err(self.timeout(locator))
        } else {
            Ok(())
        }
    }

    async fn execute_js(&self, _script: &str) -> Result<serde_json::Value, SessionError> {
        Ok(serde_json::Value::Null)
    }

    async fn content(&self) -> Result<String, SessionError> {
        Ok(self.html.to_string())
    }

    async fn close(self: Box<Self>) -> Result<(), SessionError> {
        Ok(())
    }
}

fn session(clicks_fail: bool, html: &'static str) -> Session {
    Session::new(
        Box::new(FakeContext { clicks_fail, html }),
        "https://example.test",
        Duration::from_millis(10),
        Duration::ZERO,
    )
}

/// Flow that accepts cookies, then performs one ordinary click.
struct CookieThenClickFlow;

#[async_trait]
impl SiteFlow for CookieThenClickFlow {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn base_url(&self) -> &'static str {
        "https://example.test"
    }

    async fn prepare_page_content(&self, session: &mut Session) -> Result<(), SessionError> {
        session
            .accept_cookies_once(&Locator::id("accept-cookies"))
            .await?;
        session.click(&Locator::css("button.expand"), "expand").await
    }
}

/// Flow that only accepts cookies.
struct CookieOnlyFlow;

#[async_trait]
impl SiteFlow for CookieOnlyFlow {
    fn name(&self) -> &'static str {
        "cookie-only"
    }

    fn base_url(&self) -> &'static str {
        "https://example.test"
    }

    async fn prepare_page_content(&self, session: &mut Session) -> Result<(), SessionError> {
        session
            .accept_cookies_once(&Locator::id("accept-cookies"))
            .await
    }
}

/// Extractor returning fixed pairs, ignoring the document.
struct FixedOdds(&'static [(&'static str, &'static str)]);

impl SiteOdds for FixedOdds {
    fn transform(&self, _content: &str) -> (Vec<String>, Vec<String>) {
        (
            self.0.iter().map(|(t, _)| t.to_string()).collect(),
            self.0.iter().map(|(_, o)| o.to_string()).collect(),
        )
    }
}

#[tokio::test]
async fn cookie_timeout_is_swallowed() {
    let mut s = session(true, "<html></html>");
    // Every click on this context times out, but cookie acceptance tolerates it.
    s.accept_cookies_once(&Locator::id("accept-cookies"))
        .await
        .expect("cookie timeout must not propagate");
    // Second call is a no-op either way.
    s.accept_cookies_once(&Locator::id("accept-cookies"))
        .await
        .unwrap();
}

#[tokio::test]
async fn non_cookie_timeout_propagates() {
    let mut s = session(true, "<html></html>");
    let err = s
        .fetch_rendered_content(&CookieThenClickFlow)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::InteractionTimeout { .. }));
}

#[tokio::test]
async fn prepared_session_returns_rendered_content() {
    let mut s = session(false, "<html><p>rendered</p></html>");
    let content = s.fetch_rendered_content(&CookieOnlyFlow).await.unwrap();
    assert!(content.contains("rendered"));
}

#[tokio::test]
async fn one_failing_source_does_not_block_the_cycle() {
    let good = Source::new(
        Box::new(CookieOnlyFlow),
        Box::new(FixedOdds(&[("Spain", "15/2"), ("England", "6/1")])),
        session(false, "<html></html>"),
    );
    // Same flow, but every interaction on this context times out.
    let bad = Source::new(
        Box::new(CookieThenClickFlow),
        Box::new(FixedOdds(&[("France", "5/1")])),
        session(true, "<html></html>"),
    );

    let mut sources = vec![good, bad];
    let table = run_cycle(&mut sources).await;

    assert_eq!(table.sources(), ["cookie-only", "fake"]);
    assert_eq!(table.cell("Spain", "cookie-only"), Some("15/2"));
    assert_eq!(table.cell("England", "cookie-only"), Some("6/1"));
    // The failed source degrades to an empty column, nothing more.
    assert_eq!(table.cell("Spain", "fake"), None);
    assert_eq!(table.cell("France", "fake"), None);
}

#[tokio::test]
async fn cycle_reports_every_configured_source_exactly_once() {
    let a = Source::new(
        Box::new(CookieOnlyFlow),
        Box::new(FixedOdds(&[("Spain", "15/2")])),
        session(false, "<html></html>"),
    );
    let mut sources = vec![a];

    let first = run_cycle(&mut sources).await;
    let second = run_cycle(&mut sources).await;

    // Results are rebuilt fresh each cycle, never carried over.
    assert_eq!(first.cell("Spain", "cookie-only"), Some("15/2"));
    assert_eq!(second.cell("Spain", "cookie-only"), Some("15/2"));
    assert_eq!(first.sources().len(), 1);
}
