//! Per-site navigation flows and odds extractors.
//!
//! Each supported site pairs a `SiteFlow` (the scripted interaction sequence
//! that forces its dynamic odds content to render) with a `SiteOdds` (the
//! structural queries that pull (team, odds) pairs out of the result). The
//! set is closed: sources are registered in [`all_sources`].

pub mod betfair;
pub mod paddypower;

use crate::error::{SessionError, SourceError};
use crate::extract::{self, ExtractionResult};
use crate::session::Session;
use async_trait::async_trait;
use tracing::debug;

/// The interaction sequence that makes a site's odds content materialize.
///
/// Sequences are strictly ordered and non-idempotent mid-sequence: a failure
/// partway through leaves the page in an unknown intermediate state and is
/// treated as a whole-navigation failure, never resumed.
#[async_trait]
pub trait SiteFlow: Send + Sync {
    /// Source name used as the report column header.
    fn name(&self) -> &'static str;

    /// The URL the session navigates to before preparation starts.
    fn base_url(&self) -> &'static str;

    /// Drive the session through the site's UI until the odds are rendered.
    async fn prepare_page_content(&self, session: &mut Session) -> Result<(), SessionError>;
}

/// The structural extraction hook for one site's rendered markup.
pub trait SiteOdds: Send + Sync {
    /// Produce the team-name and odds-string node texts, in document order.
    ///
    /// The two sequences are paired positionally: the i-th name is assumed to
    /// correspond to the i-th odds value. Nothing in the markup keys them
    /// together, so a missing odds node silently shifts the pairing — a known
    /// fragility of both target sites. Zero matches yields two empty vecs.
    fn transform(&self, content: &str) -> (Vec<String>, Vec<String>);
}

/// One configured odds source: a session exclusively bound to a site, plus
/// that site's flow and extractor.
pub struct Source {
    flow: Box<dyn SiteFlow>,
    odds: Box<dyn SiteOdds>,
    session: Session,
}

impl Source {
    pub fn new(flow: Box<dyn SiteFlow>, odds: Box<dyn SiteOdds>, session: Session) -> Self {
        Self {
            flow,
            odds,
            session,
        }
    }

    pub fn name(&self) -> &'static str {
        self.flow.name()
    }

    /// Run the full fetch-and-extract pipeline for one cycle.
    pub async fn fetch(&mut self) -> Result<ExtractionResult, SourceError> {
        let content = self.session.fetch_rendered_content(self.flow.as_ref()).await?;
        let result = extract::extract(self.odds.as_ref(), &content)?;
        debug!(source = self.name(), teams = result.len(), "extracted");
        Ok(result)
    }

    /// Release the session's browser context.
    pub async fn close(self) -> Result<(), SessionError> {
        self.session.close().await
    }
}

/// The flow/extractor pairs for every supported source, in report column order.
pub fn all_sources() -> Vec<(Box<dyn SiteFlow>, Box<dyn SiteOdds>)> {
    vec![
        (
            Box::new(paddypower::PaddyPowerFlow),
            Box::new(paddypower::PaddyPowerOdds),
        ),
        (
            Box::new(betfair::BetfairFlow),
            Box::new(betfair::BetfairOdds),
        ),
    ]
}
