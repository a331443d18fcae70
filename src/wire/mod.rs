// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The Zabbix agent wire protocol client: framing, length-prefixed binary
//! reads, legacy plain-text fallback, per-request timeout enforcement.

mod client;
mod error;
mod frame;

pub use client::get;
pub use error::WireError;
