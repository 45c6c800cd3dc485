//! Error taxonomy for the fetch-and-extract pipeline.
//!
//! `SessionError` covers browser interaction, `ExtractError` covers markup
//! extraction, and `SourceError` wraps either for per-source fault isolation
//! in the polling loop. Configuration and sink errors are reported with
//! `anyhow` at the binary boundary and are fatal.

use std::time::Duration;
use thiserror::Error;

/// Errors raised by browser interaction steps.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An element never became clickable within the configured timeout.
    ///
    /// Tolerated (swallowed and logged) only for cookie acceptance; fatal to
    /// the current cycle for every other interaction step.
    #[error("timed out after {waited:?} waiting for {locator}")]
    InteractionTimeout { locator: String, waited: Duration },

    /// Navigation to a URL failed or timed out.
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// An injected script failed to execute.
    #[error("script execution failed: {0}")]
    Script(String),

    /// The underlying browser engine reported an error.
    #[error("browser error: {0}")]
    Browser(String),
}

/// Errors raised while turning rendered markup into an extraction result.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The team and odds node sets came back with different lengths.
    ///
    /// Surfaced explicitly rather than silently zip-truncated: a mismatch
    /// means the positional pairing contract is already broken.
    #[error("extracted {teams} team names but {odds} odds values")]
    LengthMismatch { teams: usize, odds: usize },
}

/// Any failure of one source's fetch-and-extract pipeline for one cycle.
///
/// Caught per-source inside the polling loop; degrades that source's column
/// to empty for the cycle but never aborts other sources or the loop.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}
