//! Shared mocks for integration tests.

#![allow(dead_code)]

use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_trait::async_trait;
use hostpool::{BoxError, Conn, ConnectionId, Host, PoolError, PoolResult, StreamConnection};
use tokio::io::{AsyncRead, AsyncWrite, DuplexStream, ReadBuf};

/// One observed call to `Host::release_conn`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseCall {
    pub conn: ConnectionId,
    pub err: Option<String>,
    pub score: f64,
}

/// Host that records releases and answers with a fixed verdict.
#[derive(Default)]
pub struct MockHost {
    calls: Mutex<Vec<ReleaseCall>>,
    reject_with: Option<String>,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A host whose release handler fails with the given message.
    pub fn rejecting(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reject_with: Some(message.to_string()),
            ..Default::default()
        })
    }

    pub fn calls(&self) -> Vec<ReleaseCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Host for MockHost {
    async fn release_conn(
        &self,
        conn: &Arc<Conn>,
        err: Option<BoxError>,
        score: f64,
    ) -> PoolResult<()> {
        self.calls.lock().unwrap().push(ReleaseCall {
            conn: conn.id(),
            err: err.map(|e| e.to_string()),
            score,
        });
        match &self.reject_with {
            Some(message) => Err(PoolError::Host(message.clone().into())),
            None => Ok(()),
        }
    }

    fn address(&self) -> String {
        "127.0.0.1:6379".to_string()
    }
}

/// In-memory stream with a fixed peer address.
pub struct MockStream {
    inner: DuplexStream,
    peer: SocketAddr,
}

impl MockStream {
    /// A connected pair: the mock stream and the far end it talks to.
    pub fn pair(peer: SocketAddr) -> (Self, DuplexStream) {
        let (inner, far) = tokio::io::duplex(1024);
        (Self { inner, peer }, far)
    }
}

impl StreamConnection for MockStream {
    fn peer_addr(&self) -> io::Result<SocketAddr> {
        Ok(self.peer)
    }
}

impl AsyncRead for MockStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.inner).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}
