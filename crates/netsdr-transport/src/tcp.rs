use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::TransportConfig;
use crate::error::{Result, TransportError};
use crate::stream::ChunkStream;

/// TCP control connection to a receiver.
///
/// `connect` spawns a read loop on the current tokio runtime and returns the
/// stream of received chunks. Dropping the client stops the read loop.
#[derive(Debug)]
pub struct TcpClient {
    addr: String,
    config: TransportConfig,
    conn: Option<Connection>,
}

#[derive(Debug)]
struct Connection {
    writer: OwnedWriteHalf,
    cancel: CancellationToken,
}

impl TcpClient {
    /// Create a client for `host:port` with default configuration. Does not connect.
    pub fn new(host: impl AsRef<str>, port: u16) -> Self {
        Self::with_config(host, port, TransportConfig::default())
    }

    pub fn with_config(host: impl AsRef<str>, port: u16, config: TransportConfig) -> Self {
        Self {
            addr: format!("{}:{port}", host.as_ref()),
            config,
            conn: None,
        }
    }

    /// The `host:port` this client connects to.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Returns true while the connection is open and its read loop is running.
    pub fn is_connected(&self) -> bool {
        self.conn
            .as_ref()
            .is_some_and(|conn| !conn.cancel.is_cancelled())
    }

    /// Connect and start receiving.
    pub async fn connect(&mut self) -> Result<ChunkStream> {
        if self.is_connected() {
            return Err(TransportError::AlreadyConnected);
        }

        debug!(addr = %self.addr, "connecting");
        let stream = tokio::time::timeout(
            self.config.connect_timeout,
            TcpStream::connect(self.addr.as_str()),
        )
        .await
        .map_err(|_| TransportError::Timeout {
            addr: self.addr.clone(),
            after: self.config.connect_timeout,
        })?
        .map_err(|source| TransportError::Connect {
            addr: self.addr.clone(),
            source,
        })?;
        stream.set_nodelay(true)?;

        let (reader, writer) = stream.into_split();
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));

        tokio::spawn(read_loop(
            reader,
            tx,
            cancel.clone(),
            self.config.read_buffer_size.max(1),
            self.addr.clone(),
        ));
        debug!(addr = %self.addr, "connected");

        self.conn = Some(Connection {
            writer,
            cancel: cancel.clone(),
        });
        Ok(ChunkStream::new(rx, cancel))
    }

    /// Send raw bytes, typically an encoded message.
    pub async fn send(&mut self, data: &[u8]) -> Result<()> {
        let conn = match self.conn.as_mut() {
            Some(conn) if !conn.cancel.is_cancelled() => conn,
            _ => return Err(TransportError::NotConnected),
        };

        conn.writer.write_all(data).await?;
        conn.writer.flush().await?;
        Ok(())
    }

    /// Send a UTF-8 string.
    pub async fn send_str(&mut self, text: &str) -> Result<()> {
        self.send(text.as_bytes()).await
    }

    /// Stop the read loop and close the connection. Does nothing when not connected.
    pub async fn disconnect(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            conn.cancel.cancel();
            if let Err(err) = conn.writer.shutdown().await {
                debug!(addr = %self.addr, error = %err, "shutdown after disconnect failed");
            }
            debug!(addr = %self.addr, "disconnected");
        }
    }
}

impl Drop for TcpClient {
    fn drop(&mut self) {
        if let Some(conn) = &self.conn {
            conn.cancel.cancel();
        }
    }
}

async fn read_loop(
    mut reader: OwnedReadHalf,
    tx: mpsc::Sender<Bytes>,
    cancel: CancellationToken,
    chunk_size: usize,
    addr: String,
) {
    let mut buf = vec![0u8; chunk_size];
    loop {
        let read = tokio::select! {
            _ = cancel.cancelled() => break,
            read = reader.read(&mut buf) => read,
        };

        match read {
            Ok(0) => {
                debug!(%addr, "connection closed by peer");
                break;
            }
            Ok(n) => {
                if tx.send(Bytes::copy_from_slice(&buf[..n])).await.is_err() {
                    debug!(%addr, "chunk stream dropped, stopping read loop");
                    break;
                }
            }
            Err(err) => {
                warn!(%addr, error = %err, "read failed");
                break;
            }
        }
    }
    cancel.cancel();
}
