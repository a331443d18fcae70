// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use thiserror::Error;

use crate::{
    cfg::config::BenchConfig,
    keys::{self, Key, ParseError},
};

const DEFAULT_PORT: u16 = 10050;

/// Load-generation and correctness probe for a Zabbix monitoring agent.
#[derive(Debug, Parser)]
#[command(name = "zabbix-agent-bench", version, about)]
pub struct Cli {
    /// Agent address (host or host:port).
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Default port used when --host has none.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Per-request timeout, in milliseconds.
    #[arg(long, default_value_t = 3000)]
    pub timeout: u64,

    /// Stagger between worker starts, in milliseconds.
    #[arg(long, default_value_t = 0)]
    pub offset: u64,

    /// Concurrent worker count. Defaults to the visible CPU count.
    #[arg(long)]
    pub threads: Option<usize>,

    /// Global deadline, in seconds. 0 means no deadline.
    #[arg(long, default_value_t = 0)]
    pub timelimit: u64,

    /// Cap on full-list passes by the producer. 0 means no cap.
    #[arg(long, default_value_t = 0)]
    pub iterations: u64,

    /// Path to a key file.
    #[arg(long)]
    pub keys: Option<PathBuf>,

    /// Single key (may be combined with --keys).
    #[arg(long)]
    pub key: Option<String>,

    /// Include unsupported count in the exit code.
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Print each response as it arrives.
    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    /// Emit internal diagnostics via tracing at debug level.
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

/// Configuration-layer failures: surfaced to stderr and exit code 1, before
/// any benchmarking starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no keys supplied: pass --key and/or --keys")]
    NoKeysSupplied,

    #[error("failed to read key file {path}: {source}")]
    KeyFileNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed key file {path}: {source}")]
    MalformedKeyFile {
        path: String,
        #[source]
        source: ParseError,
    },
}

impl Cli {
    pub fn to_bench_config(&self) -> BenchConfig {
        BenchConfig {
            host: self.host.clone(),
            port: self.port,
            timeout: Duration::from_millis(self.timeout),
            offset: Duration::from_millis(self.offset),
            threads: self.threads.unwrap_or_else(num_cpus::get),
            timelimit: (self.timelimit > 0)
                .then(|| Duration::from_secs(self.timelimit)),
            iterations: self.iterations,
            strict: self.strict,
            verbose: self.verbose,
            debug: self.debug,
        }
    }

    /// Assembles the combined key list: the key file (if any), followed by
    /// the single `--key` argument (if any). The single argument receives
    /// `{%VAR}` environment substitution; key-file lines do not (see
    /// `crate::keys::parser`).
    pub fn load_keys(&self) -> Result<Vec<Key>, ConfigError> {
        let mut out = Vec::new();

        if let Some(path) = &self.keys {
            let text = std::fs::read_to_string(path).map_err(|source| {
                ConfigError::KeyFileNotFound {
                    path: path.display().to_string(),
                    source,
                }
            })?;
            let mut file_keys =
                keys::parse(&text).map_err(|source| ConfigError::MalformedKeyFile {
                    path: path.display().to_string(),
                    source,
                })?;
            out.append(&mut file_keys);
        }

        if let Some(raw) = &self.key {
            out.push(Key::item(keys::build_key_from_arg(raw)));
        }

        if out.is_empty() {
            return Err(ConfigError::NoKeysSupplied);
        }

        Ok(out)
    }
}
