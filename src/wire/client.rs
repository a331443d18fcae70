// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use tokio::{net::TcpStream, time};

use crate::wire::{
    error::WireError,
    frame::{read_response, write_request},
};

/// Queries a Zabbix agent for a single item key over the native wire
/// protocol.
///
/// Opens a fresh TCP connection (no pooling), enforces a single absolute
/// deadline covering connect, write, and all subsequent reads, and drops the
/// connection unconditionally on every exit path.
pub async fn get(
    address: &str,
    key: &str,
    timeout: Duration,
    default_port: u16,
) -> Result<String, WireError> {
    let addr = resolve_address(address, default_port);

    time::timeout(timeout, query(&addr, key))
        .await
        .map_err(|_| WireError::Timeout)?
}

async fn query(addr: &str, key: &str) -> Result<String, WireError> {
    let mut stream = TcpStream::connect(addr).await.map_err(WireError::Connect)?;
    write_request(&mut stream, key).await?;
    read_response(&mut stream).await
}

/// Appends `default_port` to `address` unless it already carries a valid
/// port specifier.
fn resolve_address(address: &str, default_port: u16) -> String {
    match address.rsplit_once(':') {
        Some((host, port)) if port.parse::<u16>().is_ok() => format!("{host}:{port}"),
        _ => format!("{address}:{default_port}"),
    }
}
