// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Awaits `ctrl_c` in a loop. The first interrupt cancels `cancel` and
/// prints a one-line cleanup notice; a second interrupt received while
/// cleanup is still draining aborts the process immediately with exit code
/// 1, bypassing normal shutdown.
pub async fn watch_interrupts(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_err() {
        return;
    }
    cancel.cancel();
    info!("interrupt received, draining in-flight requests (press Ctrl-C again to abort)");

    if tokio::signal::ctrl_c().await.is_ok() {
        eprintln!("second interrupt received, aborting");
        std::process::exit(1);
    }
}
