// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    cfg::config::BenchConfig,
    keys::Key,
    stats::{Outcome, WorkerTally},
    wire,
};

type WorkItem = Arc<str>;

/// Runs the full producer/N-consumer/aggregator pipeline to completion and
/// returns the merged statistics.
///
/// `cancel` is expected to already be wired to the deadline timer and the
/// signal handler by the caller; this function additionally spawns the
/// deadline timer itself when `cfg.timelimit` is set, since the timer's
/// lifetime is naturally scoped to one benchmark run.
pub async fn run(
    keys: Arc<Vec<Key>>,
    cfg: Arc<BenchConfig>,
    cancel: CancellationToken,
) -> WorkerTally {
    if let Some(timelimit) = cfg.timelimit {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timelimit).await;
            cancel.cancel();
        });
    }

    // Bounded to capacity 1: the closest tokio analogue of an unbuffered Go
    // channel, preserving the producer/consumer backpressure contract.
    let (work_tx, work_rx) = mpsc::channel::<WorkItem>(1);
    let work_rx = Arc::new(Mutex::new(work_rx));

    let (agg_tx, mut agg_rx) = mpsc::channel::<WorkerTally>(cfg.threads + 1);

    tokio::spawn(producer(
        Arc::clone(&keys),
        Arc::clone(&cfg),
        work_tx,
        cancel,
        agg_tx.clone(),
    ));

    for _ in 0..cfg.threads {
        if !cfg.offset.is_zero() {
            tokio::time::sleep(cfg.offset).await;
        }
        tokio::spawn(consumer(
            Arc::clone(&work_rx),
            Arc::clone(&cfg),
            agg_tx.clone(),
        ));
    }
    drop(agg_tx);

    let mut total = WorkerTally::default();
    let expected = cfg.threads + 1;
    for _ in 0..expected {
        match agg_rx.recv().await {
            Some(tally) => total.merge(tally),
            None => break,
        }
    }
    total
}

async fn producer(
    keys: Arc<Vec<Key>>,
    cfg: Arc<BenchConfig>,
    tx: mpsc::Sender<WorkItem>,
    cancel: CancellationToken,
    agg_tx: mpsc::Sender<WorkerTally>,
) {
    let mut iterations = 0u64;

    'passes: loop {
        for key in keys.iter() {
            if cancel.is_cancelled() {
                break 'passes;
            }
            let item: WorkItem = Arc::from(key.key.as_str());
            if tx.send(item).await.is_err() {
                break 'passes;
            }
        }
        iterations += 1;
        if cfg.iterations > 0 && iterations >= cfg.iterations {
            break;
        }
        if cancel.is_cancelled() {
            break;
        }
    }

    drop(tx);

    let mut tally = WorkerTally::default();
    tally.iterations = iterations;
    let _ = agg_tx.send(tally).await;
}

async fn consumer(
    rx: Arc<Mutex<mpsc::Receiver<WorkItem>>>,
    cfg: Arc<BenchConfig>,
    agg_tx: mpsc::Sender<WorkerTally>,
) {
    let mut tally = WorkerTally::default();

    loop {
        let item = {
            let mut guard = rx.lock().await;
            guard.recv().await
        };
        let Some(key) = item else { break };

        match wire::get(&cfg.host, &key, cfg.timeout, cfg.port).await {
            Ok(value) if value.starts_with("ZBX_NOTSUPPORTED") => {
                if cfg.verbose {
                    debug!(%key, %value, "not supported");
                }
                tally.record(&key, Outcome::NotSupported);
            },
            Ok(value) => {
                if cfg.verbose {
                    debug!(%key, %value, "success");
                }
                tally.record(&key, Outcome::Success);
            },
            Err(err) => {
                if cfg.debug {
                    debug!(%key, %err, "request failed");
                }
                tally.record(&key, Outcome::Error);
            },
        }
    }

    let _ = agg_tx.send(tally).await;
}
