// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, registry::Registry};

/// Initializes the global `tracing` subscriber with a non-blocking stderr
/// writer. The returned guard must stay alive for the process lifetime —
/// dropping it flushes and tears down the background writer thread.
///
/// Default filter is `info`; `debug` raises this crate's own target to
/// `debug` while leaving dependency crates at `warn`, overridable at any
/// time via `RUST_LOG`.
pub fn init_logger(debug: bool) -> Result<WorkerGuard> {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let default_filter = if debug {
        "warn,zabbix_agent_bench=debug"
    } else {
        "info"
    };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .context("failed to build log filter")?;

    let fmt_layer = fmt::layer().with_writer(writer).with_target(true);

    let subscriber = Registry::default().with(env_filter).with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set global default subscriber")?;

    Ok(guard)
}
