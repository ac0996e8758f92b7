// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 The smpp-client-rs authors

use std::{io, net::SocketAddr, time::Duration};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::Mutex,
    time::timeout,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    client::common::{IoOutcome, io_with_timeout},
    error::{Error, Result},
};

/// One TCP connection to an SMSC.
///
/// Whole-frame writes are serialized by the writer mutex; reads belong to the
/// single reader task. The cancellation token aborts both directions.
#[derive(Debug)]
pub struct Connection {
    reader: Mutex<OwnedReadHalf>,
    writer: Mutex<OwnedWriteHalf>,
    local_port: u16,
    remote_address: SocketAddr,
    /// Deadline applied to every write; reads carry their own per-call
    /// timeout because a read timeout is a keepalive signal, not a failure.
    write_timeout: Duration,
    cancel: CancellationToken,
}

impl Connection {
    /// Establishes the TCP connection (the CLOSED → OPEN edge of the session
    /// lifecycle).
    pub async fn connect(
        target_address: &str,
        connect_timeout: Duration,
        write_timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let stream = timeout(connect_timeout, TcpStream::connect(target_address))
            .await
            .map_err(|_| {
                Error::Io(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("connect to {target_address} timed out"),
                ))
            })??;
        stream.set_nodelay(true)?;

        let local_port = stream.local_addr()?.port();
        let remote_address = stream.peer_addr()?;
        debug!("connected {local_port} -> {remote_address}");

        let (r, w) = stream.into_split();
        Ok(Self {
            reader: Mutex::new(r),
            writer: Mutex::new(w),
            local_port,
            remote_address,
            write_timeout,
            cancel,
        })
    }

    #[inline]
    pub fn local_port(&self) -> u16 {
        self.local_port
    }

    #[inline]
    pub fn remote_address(&self) -> SocketAddr {
        self.remote_address
    }

    /// Writes one encoded PDU frame. The writer lock is the write-side
    /// serialization point for the whole session.
    pub async fn write_frame(&self, frame: &[u8]) -> Result<()> {
        let mut w = self.writer.lock().await;
        match io_with_timeout(
            "write frame",
            w.write_all(frame),
            self.write_timeout,
            &self.cancel,
        )
        .await?
        {
            IoOutcome::Done(()) => Ok(()),
            IoOutcome::TimedOut => Err(Error::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                "write timed out",
            ))),
            IoOutcome::Cancelled => Err(Error::SessionClosed),
        }
    }

    /// Fills `buf` from the socket, reporting a deadline expiry as
    /// [`IoOutcome::TimedOut`] rather than an error.
    pub(crate) async fn read_exact(
        &self,
        buf: &mut [u8],
        read_timeout: Duration,
    ) -> io::Result<IoOutcome<()>> {
        let mut r = self.reader.lock().await;
        io_with_timeout(
            "read frame",
            async {
                r.read_exact(buf).await?;
                Ok(())
            },
            read_timeout,
            &self.cancel,
        )
        .await
    }

    /// Half-closes the write side. Errors are ignored: the peer may already
    /// be gone by the time we say goodbye.
    pub async fn shutdown(&self) {
        let mut w = self.writer.lock().await;
        let _ = w.shutdown().await;
    }
}
