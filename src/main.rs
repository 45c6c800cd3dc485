// Copyright 2026 Oddswatch Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use clap::Parser;
use oddswatch::poller::{Poller, Sink};
use oddswatch::renderer::chromium::ChromiumRenderer;
use oddswatch::renderer::Renderer;
use oddswatch::session::Session;
use oddswatch::sites::{self, Source};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "oddswatch",
    about = "Oddswatch — periodic national-team odds watcher",
    version
)]
struct Cli {
    /// Write cycle reports to this file (default: standard output)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Polling period in minutes
    #[arg(short = 't', long = "period", default_value = "5")]
    period_minutes: u64,

    /// Maximum wait for any single interaction step, in seconds
    #[arg(long, default_value = "15")]
    wait_secs: u64,

    /// Settle delay after hover injection, in milliseconds
    #[arg(long, default_value = "5000")]
    settle_ms: u64,
}

/// Log to an append-only file named after the invoked program.
fn init_logging() -> Result<()> {
    let program = std::env::args()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "oddswatch".to_string());

    let log_path = format!("{program}.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file: {log_path}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("oddswatch=debug".parse().unwrap()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    info!("starting oddswatch v{}", env!("CARGO_PKG_VERSION"));

    let sink = Sink::open(cli.output.as_deref())?;
    let period = Duration::from_secs(cli.period_minutes * 60);
    let wait = Duration::from_secs(cli.wait_secs);
    let settle = Duration::from_millis(cli.settle_ms);

    let renderer = ChromiumRenderer::new().await?;
    info!("Chromium renderer initialized");

    // One exclusively-owned session per site, alive for the whole process.
    let mut sources = Vec::new();
    for (flow, odds) in sites::all_sources() {
        let context = renderer.new_context().await?;
        let session = Session::new(context, flow.base_url(), wait, settle);
        info!(source = flow.name(), url = flow.base_url(), "session ready");
        sources.push(Source::new(flow, odds, session));
    }

    let mut poller = Poller::new(sources, period, sink);

    let result = tokio::select! {
        res = poller.run() => res,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted; shutting down");
            Ok(())
        }
    };

    // Sessions are released even when the loop future was dropped mid-cycle.
    poller.close_sessions().await;
    renderer.shutdown().await?;

    result
}
