// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

//! In-process mock SMSC: a one-connection TCP server whose behavior each
//! test scripts explicitly.

use std::{net::SocketAddr, time::Duration};

use anyhow::{Context, Result, bail};
use smpp_client_rs::{
    cfg::{config::Config, enums::BindType},
    models::{
        bind::BindResponse,
        command_id::CommandId,
        header::{HEADER_LEN, PduHeader},
        link::{EnquireLinkResp, UnbindResp},
        pdu::{Pdu, PduBody},
        status::CommandStatus,
    },
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    time::timeout,
};

/// Binds an ephemeral listener and runs `handler` on the first connection.
pub async fn spawn_smsc<F, Fut>(handler: F) -> Result<SocketAddr>
where
    F: FnOnce(TcpStream) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind mock SMSC")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            handler(stream).await;
        }
    });
    Ok(addr)
}

/// Reads one PDU off the stream, failing the test after 5 seconds.
pub async fn read_pdu(stream: &mut TcpStream) -> Result<Pdu> {
    let mut header_buf = [0u8; HEADER_LEN];
    timeout(Duration::from_secs(5), stream.read_exact(&mut header_buf))
        .await
        .context("timed out waiting for a PDU")??;
    let header = PduHeader::from_bytes(&header_buf);
    let body_len = header.body_len().context("bad command_length")?;
    let mut body = vec![0u8; body_len];
    if body_len > 0 {
        timeout(Duration::from_secs(5), stream.read_exact(&mut body))
            .await
            .context("timed out reading PDU body")??;
    }
    let Some(command) = CommandId::from_u32(header.command_id.get()) else {
        bail!("mock SMSC got unknown command_id {:#010x}", header.command_id.get());
    };
    Ok(Pdu::decode(command, &header, body.into())?)
}

pub async fn write_pdu(stream: &mut TcpStream, pdu: &Pdu) -> Result<()> {
    let frame = pdu.encode()?;
    stream.write_all(&frame).await?;
    Ok(())
}

/// Answers the opening bind with an OK response carrying system_id "SMSC".
/// Returns the bind's sequence number.
pub async fn accept_bind(stream: &mut TcpStream) -> Result<u32> {
    let pdu = read_pdu(stream).await?;
    let PduBody::Bind(request) = &pdu.body else {
        bail!("expected a bind request, got {}", pdu.command_id());
    };
    let resp = BindResponse::new(request.bind_type, "SMSC");
    write_pdu(
        stream,
        &Pdu::response(pdu.sequence_number, CommandStatus::Ok, resp),
    )
    .await?;
    Ok(pdu.sequence_number)
}

/// Keeps answering enquire_link and unbind until the peer hangs up. Useful
/// as a tail for handlers that are done with their scripted part.
pub async fn serve_link_management(stream: &mut TcpStream) {
    while let Ok(pdu) = read_pdu(stream).await {
        let seq = pdu.sequence_number;
        let reply = match pdu.body {
            PduBody::EnquireLink(_) => Pdu::response(seq, CommandStatus::Ok, EnquireLinkResp),
            PduBody::Unbind(_) => Pdu::response(seq, CommandStatus::Ok, UnbindResp),
            _ => continue,
        };
        if write_pdu(stream, &reply).await.is_err() {
            break;
        }
    }
}

/// Config pointed at the mock, with test-friendly timers.
pub fn test_config(addr: SocketAddr, bind_type: BindType) -> Config {
    let mut cfg = Config::for_target(addr.to_string(), bind_type, "ESME", "pw");
    cfg.runtime.transaction_timer = Duration::from_millis(1_000);
    cfg.runtime.connect_timeout = Duration::from_millis(2_000);
    cfg
}

/// Polls `predicate` up to `wait`, sleeping briefly between attempts.
pub async fn eventually<F>(wait: Duration, mut predicate: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + wait;
    loop {
        if predicate() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
