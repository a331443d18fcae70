// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Deterministic, operator-readable rendering of a finished benchmark run:
//! sorted per-key table, totals block, NVPS line, and exit-code policy.

use std::time::Duration;

use colored::{ColoredString, Colorize};

use crate::stats::WorkerTally;

const COUNT_WIDTH: usize = 8;

/// Prints the full report (per-key table, totals, NVPS line) to stdout.
pub fn print(tally: &WorkerTally, elapsed: Duration) {
    let mut names: Vec<&String> = tally.per_key.keys().collect();
    names.sort();

    let width = names.iter().map(|n| n.len()).max().unwrap_or(0);

    for name in &names {
        let counts = &tally.per_key[*name];

        let success = colorize(counts.success, Colorize::green);
        let not_supported = colorize(counts.not_supported, Colorize::yellow);
        let error = colorize(counts.error, Colorize::red);

        println!("{name:width$}  {success}  {not_supported}  {error}");
    }

    println!();
    println!("total values:       {}", tally.total_values);
    println!("unsupported values: {}", tally.unsupported_values);
    println!("errors:             {}", tally.error_count);
    println!("iterations:         {}", tally.iterations);

    let seconds = elapsed.as_secs_f64();
    let nvps = if seconds > 0.0 {
        tally.total_values as f64 / seconds
    } else {
        0.0
    };
    println!("\nelapsed {seconds:.3}s, {nvps:.2} NVPS");
}

/// Right-pads `n` to `COUNT_WIDTH` before coloring it, so alignment is fixed
/// in the plain text rather than relying on ANSI-wrapped output to honor a
/// `{:>N}` format width.
fn colorize(n: u64, color: impl Fn(&str) -> ColoredString) -> ColoredString {
    let text = format!("{n:>COUNT_WIDTH$}");
    if n > 0 { color(&text) } else { text.normal() }
}

/// Computes the process exit code from the final tally.
///
/// Default policy counts only `error_count`; `--strict` additionally counts
/// unsupported values. Both are clamped to a byte, the widest exit-code
/// range a POSIX shell can actually observe.
pub fn exit_code(tally: &WorkerTally, strict: bool) -> u8 {
    let raw = if strict {
        tally.unsupported_values + tally.error_count
    } else {
        tally.error_count
    };
    raw.min(u8::MAX as u64) as u8
}
