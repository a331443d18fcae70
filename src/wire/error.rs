// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::io;

use thiserror::Error;

/// Failure modes of a single `get` call against a Zabbix agent.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("connect failed: {0}")]
    Connect(#[source] io::Error),

    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    #[error("request timed out")]
    Timeout,

    #[error("response header too short: got {got} of 5 bytes")]
    ShortHeader { got: usize },

    #[error("response declared invalid version byte 0x{0:02x}")]
    InvalidVersion(u8),

    #[error("response payload truncated: got {got} of {expected} bytes")]
    ShortPayload { got: u64, expected: u64 },
}
