//! Shared extraction pass over rendered markup.
//!
//! Each site supplies a `transform` hook producing two index-aligned node
//! text sequences; this module enforces the length invariant and applies
//! alias normalization before anything downstream sees the names.

use crate::alias;
use crate::error::ExtractError;
use crate::sites::SiteOdds;

/// Teams and odds extracted from one rendered page, paired by index.
///
/// Odds are opaque fractional-string tokens (e.g. "15/2"); display fidelity
/// is the reporting contract, so they are never parsed as ratios.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    pub teams: Vec<String>,
    pub odds: Vec<String>,
}

impl ExtractionResult {
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Iterate (team, odds) pairs in document order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.teams
            .iter()
            .map(String::as_str)
            .zip(self.odds.iter().map(String::as_str))
    }
}

/// Run a site's `transform` hook over rendered markup, enforce the
/// equal-length invariant, and canonicalize every team name.
///
/// Zero matches is not an error: an empty result simply contributes an empty
/// column. Unequal lengths mean the positional pairing is already broken and
/// are surfaced as `ExtractError::LengthMismatch`, never silently truncated.
pub fn extract(site: &dyn SiteOdds, content: &str) -> Result<ExtractionResult, ExtractError> {
    let (teams, odds) = site.transform(content);
    if teams.len() != odds.len() {
        return Err(ExtractError::LengthMismatch {
            teams: teams.len(),
            odds: odds.len(),
        });
    }
    let teams = teams.iter().map(|t| alias::canonical(t)).collect();
    Ok(ExtractionResult { teams, odds })
}
