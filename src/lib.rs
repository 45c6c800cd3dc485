// Copyright 2026 Oddswatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! Oddswatch library — browser-driven odds watcher.
//!
//! Renders JavaScript-heavy betting pages through a controlled headless
//! browser, extracts (team, fractional-odds) pairs from the rendered markup,
//! and periodically reports a combined table across sources.

#![allow(dead_code, clippy::new_without_default)]

pub mod alias;
pub mod error;
pub mod extract;
pub mod poller;
pub mod renderer;
pub mod report;
pub mod session;
pub mod sites;
