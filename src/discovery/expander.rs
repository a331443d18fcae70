// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::{discovery::error::DiscoveryError, keys::Key, wire};

const NOT_SUPPORTED: &str = "ZBX_NOTSUPPORTED";

#[derive(Debug, Deserialize)]
struct DiscoveryPayload {
    data: Vec<Map<String, Value>>,
}

/// Expands every discovery-rule key in `keys` into its materialized
/// prototype-derived keys, appended after the rule in the output list.
///
/// The full combined key list is expanded regardless of whether a rule came
/// from a key file or the standalone `--key` argument: §4.4's contract is
/// defined over "a key list" with no restriction on provenance, so a
/// discovery rule supplied via `--key` is expanded exactly like one loaded
/// from a file (a deliberate fix over the historical Go driver, which only
/// ever called `Expand` on file-sourced keys).
pub async fn expand(
    keys: &[Key],
    host: &str,
    port: u16,
    timeout: Duration,
) -> Result<Vec<Key>, DiscoveryError> {
    let mut out = Vec::with_capacity(keys.len());

    for key in keys {
        out.push(key.clone());

        if !key.is_discovery_rule {
            continue;
        }

        let response =
            wire::get(host, &key.key, timeout, port)
                .await
                .map_err(|source| DiscoveryError::Wire {
                    key: key.key.clone(),
                    source,
                })?;

        if response.starts_with(NOT_SUPPORTED) {
            warn!(key = %key.key, "discovery rule not supported by agent, skipping expansion");
            continue;
        }

        let payload: DiscoveryPayload =
            serde_json::from_str(&response).map_err(|source| DiscoveryError::Json {
                key: key.key.clone(),
                payload: response.clone(),
                source,
            })?;

        for instance in &payload.data {
            for prototype in &key.children {
                let mut materialized = prototype.key.clone();
                for (macro_name, value) in instance {
                    let value = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
                    materialized = materialized.replace(macro_name.as_str(), &value);
                }
                out.push(Key::materialized(materialized));
            }
        }
    }

    Ok(out)
}
