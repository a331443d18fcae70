// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

/// Spawns a fake Zabbix agent that accepts `connections` connections in
/// sequence and replies to each with `response`, framed in the binary wire
/// protocol. Returns the address it is listening on.
pub async fn spawn_fake_agent(
    response: &'static str,
    connections: usize,
) -> Result<(String, u16)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        for _ in 0..connections {
            let Ok((mut sock, _)) = listener.accept().await else {
                break;
            };
            let mut buf = vec![0u8; 4096];
            let _ = sock.read(&mut buf).await;

            let mut frame = Vec::new();
            frame.extend_from_slice(b"ZBXD\x01");
            frame.extend_from_slice(&(response.len() as i64).to_le_bytes());
            frame.extend_from_slice(response.as_bytes());
            let _ = sock.write_all(&frame).await;
        }
    });

    Ok((addr.ip().to_string(), addr.port()))
}

/// Spawns a fake agent that replies differently depending on the key it is
/// asked about, keyed by an exact match against the request payload.
pub async fn spawn_scripted_agent(
    responses: Vec<(&'static str, &'static str)>,
) -> Result<(String, u16)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        for _ in 0..responses.len() {
            let Ok((mut sock, _)) = listener.accept().await else {
                break;
            };

            let mut header = [0u8; 13];
            if sock.read_exact(&mut header).await.is_err() {
                continue;
            }
            let key_len = i64::from_le_bytes(header[5..13].try_into().unwrap_or_default())
                as usize;
            let mut key_buf = vec![0u8; key_len];
            if sock.read_exact(&mut key_buf).await.is_err() {
                continue;
            }
            let requested_key = String::from_utf8_lossy(&key_buf).into_owned();

            let reply = responses
                .iter()
                .find(|(key, _)| *key == requested_key)
                .map(|(_, value)| *value)
                .unwrap_or("");

            let mut frame = Vec::new();
            frame.extend_from_slice(b"ZBXD\x01");
            frame.extend_from_slice(&(reply.len() as i64).to_le_bytes());
            frame.extend_from_slice(reply.as_bytes());
            let _ = sock.write_all(&frame).await;
        }
    });

    Ok((addr.ip().to_string(), addr.port()))
}
