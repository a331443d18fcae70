// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Per-key and per-worker tallies, with a fan-in merge operation.

use std::collections::HashMap;

/// The outcome of a single wire-client call, used to route a tally update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    NotSupported,
    Error,
}

/// Non-negative counters for one item key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PerKeyTally {
    pub success: u64,
    pub not_supported: u64,
    pub error: u64,
}

impl PerKeyTally {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Success => self.success += 1,
            Outcome::NotSupported => self.not_supported += 1,
            Outcome::Error => self.error += 1,
        }
    }

    fn merge(&mut self, other: PerKeyTally) {
        self.success += other.success;
        self.not_supported += other.not_supported;
        self.error += other.error;
    }
}

/// The private tally owned by one worker (producer or consumer) until it is
/// sent over the aggregation channel.
///
/// Invariant: `total_values == Σ success + Σ not_supported` and
/// `error_count == Σ error` across `per_key`, maintained on every mutation.
#[derive(Debug, Default, Clone)]
pub struct WorkerTally {
    pub iterations: u64,
    pub total_values: u64,
    pub unsupported_values: u64,
    pub error_count: u64,
    pub per_key: HashMap<String, PerKeyTally>,
}

impl WorkerTally {
    pub fn record(&mut self, key: &str, outcome: Outcome) {
        self.per_key.entry(key.to_string()).or_default().record(outcome);
        match outcome {
            Outcome::Success => self.total_values += 1,
            Outcome::NotSupported => {
                self.total_values += 1;
                self.unsupported_values += 1;
            },
            Outcome::Error => self.error_count += 1,
        }
    }

    /// Folds `other` into `self`, field-wise for the totals and by
    /// key-string union for `per_key`.
    pub fn merge(&mut self, other: WorkerTally) {
        self.iterations += other.iterations;
        self.total_values += other.total_values;
        self.unsupported_values += other.unsupported_values;
        self.error_count += other.error_count;
        for (key, tally) in other.per_key {
            self.per_key.entry(key).or_default().merge(tally);
        }
    }
}
