// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::Arc;

use anyhow::{Context, Error};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use zabbix_agent_bench::{
    bench,
    cfg::{cli::Cli, logger::init_logger},
    discovery, report,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let _logger_guard = match init_logger(cli.debug) {
        Ok(guard) => guard,
        Err(err) => {
            print_error_chain(&err);
            std::process::exit(1);
        },
    };

    match run(cli).await {
        Ok(code) => std::process::exit(code.into()),
        Err(err) => {
            print_error_chain(&err);
            std::process::exit(1);
        },
    }
}

async fn run(cli: Cli) -> Result<u8, Error> {
    let cfg = Arc::new(cli.to_bench_config());
    let keys = cli.load_keys().context("failed to assemble key list")?;

    let expanded = discovery::expand(&keys, &cfg.host, cfg.port, cfg.timeout)
        .await
        .context("discovery expansion failed")?;

    let cancel = CancellationToken::new();
    let signal_task = tokio::spawn(bench::watch_interrupts(cancel.clone()));

    let start = std::time::Instant::now();
    let tally = bench::run(Arc::new(expanded), Arc::clone(&cfg), cancel.clone()).await;
    let elapsed = start.elapsed();

    cancel.cancel();
    signal_task.abort();

    report::print(&tally, elapsed);

    Ok(report::exit_code(&tally, cfg.strict))
}

fn print_error_chain(err: &Error) {
    eprintln!("{err}");
    for cause in err.chain().skip(1) {
        eprintln!("  -> {cause}");
    }
}
