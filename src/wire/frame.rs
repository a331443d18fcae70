// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Request/response framing for the Zabbix agent wire protocol.
//!
//! Header layout: `"ZBXD"` (4 bytes) · version byte `0x01` · 8-byte
//! little-endian unsigned data length · `data_length` bytes of payload.
//! Agents that predate this framing reply with a bare newline-terminated
//! string instead (the "legacy" form).

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::wire::error::WireError;

pub const MAGIC: &[u8; 4] = b"ZBXD";
pub const VERSION: u8 = 0x01;
const HEADER_LEN: usize = 5;
const LEN_FIELD_LEN: usize = 8;

/// Writes one request frame: magic, version, little-endian i64 key length,
/// raw key bytes.
pub async fn write_request<W: AsyncWrite + Unpin>(
    w: &mut W,
    key: &str,
) -> Result<(), WireError> {
    let mut buf = Vec::with_capacity(HEADER_LEN + LEN_FIELD_LEN + key.len());
    buf.extend_from_slice(MAGIC);
    buf.push(VERSION);
    buf.extend_from_slice(&(key.len() as i64).to_le_bytes());
    buf.extend_from_slice(key.as_bytes());
    w.write_all(&buf).await.map_err(WireError::Write)
}

/// Reads one response frame and returns its payload, UTF-8 lossily decoded.
///
/// A response beginning with the exact magic `"ZBXD"` is parsed as a
/// length-prefixed binary frame; a `"ZBXD"`-prefixed response with any other
/// version byte is a protocol error rather than a legacy fallback, since a
/// genuinely pre-protocol agent never emits the magic at all. Anything else
/// is read as legacy newline-terminated plain text, with the bytes already
/// consumed while probing for the magic treated as the start of that
/// payload.
pub async fn read_response<R: AsyncRead + Unpin>(r: &mut R) -> Result<String, WireError> {
    let mut header = [0u8; HEADER_LEN];
    let got = read_fill(r, &mut header).await?;
    if got < HEADER_LEN {
        // The stream hit EOF before a full header arrived. If what we have
        // could still be the start of the binary magic, the connection was
        // cut mid-frame: that is corruption, not a legacy reply. Otherwise
        // it is the entirety of a short legacy response (possibly empty).
        if got > 0 && MAGIC.starts_with(&header[..got]) {
            return Err(WireError::ShortHeader { got });
        }
        return Ok(decode_legacy(&header[..got]));
    }

    if &header[..4] == MAGIC {
        if header[4] != VERSION {
            return Err(WireError::InvalidVersion(header[4]));
        }
        return read_binary_payload(r).await;
    }

    read_legacy_payload(r, &header).await
}

async fn read_binary_payload<R: AsyncRead + Unpin>(
    r: &mut R,
) -> Result<String, WireError> {
    let mut len_buf = [0u8; LEN_FIELD_LEN];
    let got = read_fill(r, &mut len_buf).await?;
    if got < LEN_FIELD_LEN {
        return Err(WireError::ShortHeader {
            got: HEADER_LEN + got,
        });
    }
    let data_length = u64::from_le_bytes(len_buf);

    let mut payload = vec![0u8; data_length as usize];
    let got = read_fill(r, &mut payload).await? as u64;
    if got < data_length {
        return Err(WireError::ShortPayload {
            got,
            expected: data_length,
        });
    }

    Ok(String::from_utf8_lossy(&payload).into_owned())
}

async fn read_legacy_payload<R: AsyncRead + Unpin>(
    r: &mut R,
    already_read: &[u8],
) -> Result<String, WireError> {
    // The newline may fall anywhere within the bytes already consumed while
    // probing for the binary magic, not just at the very end of them.
    if let Some(pos) = already_read.iter().position(|&b| b == b'\n') {
        return Ok(decode_legacy(&already_read[..=pos]));
    }

    let mut payload = already_read.to_vec();
    let mut byte = [0u8; 1];
    loop {
        let n = r.read(&mut byte).await.map_err(WireError::Read)?;
        if n == 0 {
            break;
        }
        payload.push(byte[0]);
        if byte[0] == b'\n' {
            break;
        }
    }
    Ok(decode_legacy(&payload))
}

fn decode_legacy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Reads into `buf` until it is full or EOF is reached, looping over short
/// reads. Returns the number of bytes actually read.
async fn read_fill<R: AsyncRead + Unpin>(
    r: &mut R,
    buf: &mut [u8],
) -> Result<usize, WireError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = r.read(&mut buf[filled..]).await.map_err(WireError::Read)?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
