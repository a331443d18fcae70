// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use zabbix_agent_bench::{
    bench, discovery,
    keys::{self, Key},
    report,
};

use crate::integration_tests::common::{spawn_fake_agent, spawn_scripted_agent};

fn bench_config(
    host: String,
    port: u16,
    threads: usize,
    iterations: u64,
    strict: bool,
) -> Arc<zabbix_agent_bench::cfg::config::BenchConfig> {
    Arc::new(zabbix_agent_bench::cfg::config::BenchConfig {
        host,
        port,
        timeout: Duration::from_secs(2),
        offset: Duration::ZERO,
        threads,
        timelimit: None,
        iterations,
        strict,
        verbose: false,
        debug: false,
    })
}

#[tokio::test]
async fn single_static_key_one_iteration() -> Result<()> {
    let (host, port) = spawn_fake_agent("42", 1).await?;
    let keys = vec![Key::item(keys::build_key_from_arg(
        "system.cpu.load[all,avg1]",
    ))];
    let cfg = bench_config(host, port, 1, 1, false);

    let tally = bench::run(Arc::new(keys), cfg.clone(), CancellationToken::new()).await;

    assert_eq!(tally.per_key["system.cpu.load[all,avg1]"].success, 1);
    assert_eq!(tally.total_values, 1);
    assert_eq!(report::exit_code(&tally, cfg.strict), 0);
    Ok(())
}

#[tokio::test]
async fn unsupported_value_with_strict_exits_nonzero() -> Result<()> {
    let (host, port) = spawn_fake_agent("ZBX_NOTSUPPORTED\0Unknown metric", 1).await?;
    let keys = vec![Key::item("bogus")];
    let cfg = bench_config(host, port, 1, 1, true);

    let tally = bench::run(Arc::new(keys), cfg.clone(), CancellationToken::new()).await;

    assert_eq!(tally.unsupported_values, 1);
    assert_eq!(report::exit_code(&tally, cfg.strict), 1);
    Ok(())
}

#[tokio::test]
async fn connection_refused_counts_an_error_and_exits_nonzero() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let keys = vec![Key::item("x")];
    let cfg = bench_config(addr.ip().to_string(), addr.port(), 1, 1, false);

    let tally = bench::run(Arc::new(keys), cfg.clone(), CancellationToken::new()).await;

    assert_eq!(tally.error_count, 1);
    assert_eq!(report::exit_code(&tally, cfg.strict), 1);
    Ok(())
}

#[tokio::test]
async fn discovery_expansion_yields_three_distinct_keys() -> Result<()> {
    let (host, port) = spawn_scripted_agent(vec![
        (
            "vfs.fs.discovery",
            r#"{"data":[{"{#FSNAME}":"/"},{"{#FSNAME}":"/home"}]}"#,
        ),
        ("vfs.fs.size[/,used]", "123"),
        ("vfs.fs.size[/home,used]", "123"),
    ])
    .await?;

    let file_keys =
        keys::parse("vfs.fs.discovery\n    vfs.fs.size[{#FSNAME},used]\n")?;
    let expanded = discovery::expand(&file_keys, &host, port, Duration::from_secs(2))
        .await?;
    assert_eq!(expanded.len(), 3);

    let cfg = bench_config(host, port, 1, 1, false);
    let tally = bench::run(Arc::new(expanded), cfg.clone(), CancellationToken::new()).await;

    assert_eq!(tally.per_key.len(), 3);
    assert_eq!(tally.total_values, 3);
    Ok(())
}

#[tokio::test]
async fn environment_substitution_matches_spec_example() {
    // SAFETY: this test owns these variable names for its duration; no
    // other test in this binary reads them.
    unsafe {
        std::env::set_var("VAR1", "Atom Eve");
        std::env::set_var("VAR2", "Black Samson");
        std::env::remove_var("Var3");
        std::env::remove_var("var4");
        std::env::remove_var("VAR5");
    }

    let built = keys::build_key_from_arg(
        "  some.key[{%VAR1},{%VAR2},{%Var3},{%var4},{%VAR5}]",
    );
    assert_eq!(built, "some.key[Atom Eve,Black Samson,,,]");
}

#[tokio::test]
async fn graceful_stop_still_produces_a_report() -> Result<()> {
    let (host, port) = spawn_fake_agent("1", 1).await?;
    let keys = vec![Key::item("system.cpu.load[all,avg1]")];
    let cfg = bench_config(host, port, 1, 0, false);

    let cancel = CancellationToken::new();
    cancel.cancel(); // simulates a deadline/signal firing before the first pass completes

    let tally = bench::run(Arc::new(keys), cfg.clone(), cancel).await;

    // The producer observed cancellation and closed without necessarily
    // emitting any work; the pipeline still drains cleanly and yields a
    // well-formed (possibly empty) report with a deterministic exit code.
    let code = report::exit_code(&tally, cfg.strict);
    assert_eq!(code, tally.error_count.min(u8::MAX as u64) as u8);
    Ok(())
}
