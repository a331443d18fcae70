// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use thiserror::Error;

use crate::wire::WireError;

/// Failure expanding a discovery rule. Any variant aborts the whole
/// expansion before benchmarking starts — `ZBX_NOTSUPPORTED` is handled
/// separately and is not an error.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("discovery rule {key:?}: agent query failed: {source}")]
    Wire {
        key: String,
        #[source]
        source: WireError,
    },

    #[error("discovery rule {key:?}: invalid JSON payload {payload:?}: {source}")]
    Json {
        key: String,
        payload: String,
        #[source]
        source: serde_json::Error,
    },
}
