use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_core::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Received byte buffers from a transport's read loop.
///
/// A TCP client yields arbitrary-length chunks of the byte stream; a UDP
/// listener yields one item per datagram. The stream ends when the read loop
/// stops: on cancellation, on EOF, or after an I/O error.
#[derive(Debug)]
pub struct ChunkStream {
    rx: mpsc::Receiver<Bytes>,
    cancel: CancellationToken,
}

impl ChunkStream {
    pub(crate) fn new(rx: mpsc::Receiver<Bytes>, cancel: CancellationToken) -> Self {
        Self { rx, cancel }
    }

    /// Wait for the next buffer. Returns `None` once the read loop has stopped
    /// and every queued buffer was delivered.
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.rx.recv().await
    }

    /// Token that stops the read loop feeding this stream.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Stream for ChunkStream {
    type Item = Bytes;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}
