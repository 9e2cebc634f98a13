use std::net::SocketAddr;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::config::{TransportConfig, MAX_DATAGRAM_SIZE};
use crate::error::{Result, TransportError};
use crate::stream::ChunkStream;

/// UDP listener for the receiver's data channel.
///
/// Each datagram is delivered whole, as one item of the [`ChunkStream`].
#[derive(Debug)]
pub struct UdpListener {
    socket: UdpSocket,
    local_addr: SocketAddr,
    config: TransportConfig,
}

impl UdpListener {
    /// Bind to a local `host:port` address.
    pub async fn bind(addr: &str) -> Result<Self> {
        Self::bind_with_config(addr, TransportConfig::default()).await
    }

    /// Bind to `port` on all interfaces.
    pub async fn bind_port(port: u16) -> Result<Self> {
        Self::bind(&format!("0.0.0.0:{port}")).await
    }

    pub async fn bind_with_config(addr: &str, config: TransportConfig) -> Result<Self> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| TransportError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        let local_addr = socket.local_addr()?;
        debug!(%local_addr, "listening for datagrams");

        Ok(Self {
            socket,
            local_addr,
            config,
        })
    }

    /// The address the socket is bound to. Useful after binding port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Start receiving on the current tokio runtime.
    ///
    /// The receive loop runs until `cancel` is cancelled, the returned stream
    /// is dropped, or a receive fails.
    pub fn listen(self, cancel: CancellationToken) -> ChunkStream {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));
        tokio::spawn(receive_loop(self.socket, self.local_addr, tx, cancel.clone()));
        ChunkStream::new(rx, cancel)
    }
}

async fn receive_loop(
    socket: UdpSocket,
    local_addr: SocketAddr,
    tx: mpsc::Sender<Bytes>,
    cancel: CancellationToken,
) {
    let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
    loop {
        let received = tokio::select! {
            _ = cancel.cancelled() => break,
            received = socket.recv_from(&mut buf) => received,
        };

        match received {
            Ok((n, from)) => {
                trace!(%from, size = n, "received datagram");
                if tx.send(Bytes::copy_from_slice(&buf[..n])).await.is_err() {
                    break;
                }
            }
            Err(err) => {
                warn!(%local_addr, error = %err, "receive failed");
                break;
            }
        }
    }
    debug!(%local_addr, "stopped listening for datagrams");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures_util::StreamExt;

    use super::*;

    async fn sender() -> UdpSocket {
        UdpSocket::bind("127.0.0.1:0").await.unwrap()
    }

    #[tokio::test]
    async fn delivers_each_datagram_whole() {
        let listener = UdpListener::bind("127.0.0.1:0").await.unwrap();
        let target = listener.local_addr();
        let cancel = CancellationToken::new();
        let mut datagrams = listener.listen(cancel.clone());

        let socket = sender().await;
        socket.send_to(&[0x06, 0x80, 0x01, 0x00, 0xAA, 0xBB], target).await.unwrap();
        socket.send_to(&[0x04, 0x80, 0x02, 0x00], target).await.unwrap();

        let first = tokio::time::timeout(Duration::from_secs(5), datagrams.next())
            .await
            .unwrap()
            .unwrap();
        let second = tokio::time::timeout(Duration::from_secs(5), datagrams.next())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.as_ref(), &[0x06, 0x80, 0x01, 0x00, 0xAA, 0xBB]);
        assert_eq!(second.as_ref(), &[0x04, 0x80, 0x02, 0x00]);
        cancel.cancel();
    }

    #[tokio::test]
    async fn full_size_data_item_fits() {
        let listener = UdpListener::bind("127.0.0.1:0").await.unwrap();
        let target = listener.local_addr();
        let mut datagrams = listener.listen(CancellationToken::new());

        let payload = vec![0x5A; 8194];
        sender().await.send_to(&payload, target).await.unwrap();

        let received = tokio::time::timeout(Duration::from_secs(5), datagrams.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(received.len(), 8194);
        datagrams.cancellation_token().cancel();
    }

    #[tokio::test]
    async fn cancel_ends_stream() {
        let listener = UdpListener::bind("127.0.0.1:0").await.unwrap();
        let cancel = CancellationToken::new();
        let mut datagrams = listener.listen(cancel.clone());

        cancel.cancel();

        let next = tokio::time::timeout(Duration::from_secs(5), datagrams.recv())
            .await
            .unwrap();
        assert!(next.is_none());
    }

    #[tokio::test]
    async fn bind_conflict_reports_address() {
        let first = UdpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = first.local_addr().to_string();

        let err = UdpListener::bind(&addr).await.unwrap_err();
        match err {
            TransportError::Bind { addr: reported, .. } => assert_eq!(reported, addr),
            other => panic!("expected bind error, got {other:?}"),
        }
    }
}
