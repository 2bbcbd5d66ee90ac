// ABOUTME: Production logging bootstrap built on tracing-subscriber
// ABOUTME: Env-filtered structured output, initialized once by the server binary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber
///
/// Respects `RUST_LOG` when set; defaults to `info` for this crate and `warn`
/// for dependencies. Calling this twice is a caller bug and the second call's
/// registration error is ignored on purpose so tests can share a process.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,fitplanhub=info,tower_http=info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
