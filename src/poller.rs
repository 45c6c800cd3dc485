//! Aggregation loop: fetch all sources concurrently, merge, report, sleep.
//!
//! One cooperative task per source per cycle, gathered before any result is
//! consumed. A source's failure is captured as that source's `Err` and logged;
//! it never aborts the other sources or the loop. Sink write failures are
//! fatal.

use crate::error::SourceError;
use crate::extract::ExtractionResult;
use crate::report::CombinedTable;
use crate::sites::Source;
use anyhow::{Context, Result};
use chrono::Utc;
use futures::future::join_all;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Where cycle reports are appended.
pub enum Sink {
    Stdout,
    File(File),
}

impl Sink {
    /// Open the configured sink; `None` means standard output.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Sink::Stdout),
            Some(p) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(p)
                    .with_context(|| format!("failed to open output file: {}", p.display()))?;
                Ok(Sink::File(file))
            }
        }
    }

    fn write_all(&mut self, text: &str) -> io::Result<()> {
        match self {
            Sink::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(text.as_bytes())?;
                out.flush()
            }
            Sink::File(f) => {
                f.write_all(text.as_bytes())?;
                f.flush()
            }
        }
    }
}

/// Remaining inter-cycle wait; an overrunning cycle starts the next one
/// immediately rather than sleeping a negative duration.
pub fn remaining_wait(period: Duration, elapsed: Duration) -> Duration {
    period.saturating_sub(elapsed)
}

/// Run one FETCHING + MERGING pass over all sources.
///
/// All source tasks are issued up front; each one's outcome is captured as a
/// `Result` so a failing site degrades to an empty column instead of taking
/// the cycle down.
pub async fn run_cycle(sources: &mut [Source]) -> CombinedTable {
    let outcomes: Vec<(&str, Result<ExtractionResult, SourceError>)> = join_all(
        sources
            .iter_mut()
            .map(|source| async move { (source.name(), source.fetch().await) }),
    )
    .await;

    let mut columns: Vec<(&str, Option<&ExtractionResult>)> = Vec::with_capacity(outcomes.len());
    for (name, outcome) in &outcomes {
        match outcome {
            Ok(result) => columns.push((*name, Some(result))),
            Err(e) => {
                warn!(source = *name, error = %e, "source failed this cycle");
                columns.push((*name, None));
            }
        }
    }

    CombinedTable::merge(&columns)
}

/// The periodic aggregation loop over a fixed set of sources.
pub struct Poller {
    sources: Vec<Source>,
    period: Duration,
    sink: Sink,
}

impl Poller {
    pub fn new(sources: Vec<Source>, period: Duration, sink: Sink) -> Self {
        Self {
            sources,
            period,
            sink,
        }
    }

    /// Loop forever: fetch, merge, report, sleep. Returns only on a fatal
    /// (sink) error; otherwise runs until the process is interrupted.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let started = Instant::now();

            let table = run_cycle(&mut self.sources).await;
            self.emit(&table)?;

            let elapsed = started.elapsed();
            let wait = remaining_wait(self.period, elapsed);
            debug!(?elapsed, sleep = ?wait, "cycle complete");
            tokio::time::sleep(wait).await;
        }
    }

    /// Append one cycle's table to the sink.
    fn emit(&mut self, table: &CombinedTable) -> Result<()> {
        let report = format!(
            "odds at {}\n{}\n",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            table.render()
        );
        self.sink
            .write_all(&report)
            .context("failed to write report to sink")?;
        info!(sources = table.sources().len(), "reported cycle");
        Ok(())
    }

    /// Close every source's browser session.
    ///
    /// Called on shutdown regardless of where in a cycle the loop future was
    /// dropped.
    pub async fn close_sessions(self) {
        for source in self.sources {
            let name = source.name();
            if let Err(e) = source.close().await {
                warn!(source = name, error = %e, "failed to close session");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_is_period_minus_elapsed() {
        assert_eq!(
            remaining_wait(Duration::from_secs(300), Duration::from_secs(20)),
            Duration::from_secs(280)
        );
    }

    #[test]
    fn wait_never_goes_negative() {
        assert_eq!(
            remaining_wait(Duration::from_secs(300), Duration::from_secs(301)),
            Duration::ZERO
        );
        assert_eq!(
            remaining_wait(Duration::ZERO, Duration::from_secs(1)),
            Duration::ZERO
        );
    }

    #[test]
    fn sink_appends_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odds.txt");

        let mut sink = Sink::open(Some(&path)).unwrap();
        sink.write_all("first\n").unwrap();
        drop(sink);

        let mut sink = Sink::open(Some(&path)).unwrap();
        sink.write_all("second\n").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }
}
