use std::time::Duration;

use bytes::BytesMut;
use netsdr_codec::{decode, split_message, Decoded};
use netsdr_transport::{ChunkStream, TcpClient, TransportConfig};

use crate::cmd::{encode_message, parse_duration, runtime, SendArgs};
use crate::exit::{
    codec_error, transport_error, CliError, CliResult, DATA_INVALID, FAILURE, SUCCESS, TIMEOUT,
};
use crate::output::{print_message, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let encoded = encode_message(&args.message)?;
    let wait = args.wait.as_deref().map(parse_duration).transpose()?;
    let config = TransportConfig {
        connect_timeout: parse_duration(&args.connect_timeout)?,
        ..TransportConfig::default()
    };

    runtime()?.block_on(send_message(args, encoded, wait, config, format))
}

async fn send_message(
    args: SendArgs,
    encoded: bytes::Bytes,
    wait: Option<Duration>,
    config: TransportConfig,
    format: OutputFormat,
) -> CliResult<i32> {
    let mut client = TcpClient::with_config(&args.host, args.port, config);
    let mut chunks = client
        .connect()
        .await
        .map_err(|err| transport_error("connect failed", err))?;

    client
        .send(&encoded)
        .await
        .map_err(|err| transport_error("send failed", err))?;
    tracing::info!(
        addr = client.addr(),
        kind = %args.message.kind,
        size = encoded.len(),
        "message sent"
    );

    let mut code = SUCCESS;
    if let Some(wait) = wait {
        let decoded = wait_for_message(&mut chunks, wait).await?;
        print_message(&decoded, client.addr(), None, format);
        if !decoded.is_valid() {
            code = DATA_INVALID;
        }
    }

    client.disconnect().await;
    Ok(code)
}

/// Collect chunks until one whole message has arrived.
async fn wait_for_message(chunks: &mut ChunkStream, wait: Duration) -> CliResult<Decoded> {
    let deadline = tokio::time::Instant::now() + wait;
    let mut buf = BytesMut::new();

    loop {
        if let Some(raw) = split_message(&mut buf).map_err(|err| codec_error("receive failed", err))? {
            return Ok(decode(&raw));
        }

        match tokio::time::timeout_at(deadline, chunks.recv()).await {
            Ok(Some(chunk)) => buf.extend_from_slice(&chunk),
            Ok(None) => {
                return Err(CliError::new(
                    FAILURE,
                    "connection closed before a complete response",
                ))
            }
            Err(_) => {
                return Err(CliError::new(
                    TIMEOUT,
                    format!("no response within {wait:?}"),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use netsdr_codec::{ItemCode, MessageKind};
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    use super::*;

    async fn connected_pair() -> (TcpClient, ChunkStream, tokio::net::TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let mut client = TcpClient::new("127.0.0.1", port);
        let chunks = client.connect().await.unwrap();
        let (sock, _) = listener.accept().await.unwrap();
        (client, chunks, sock)
    }

    #[tokio::test]
    async fn wait_reassembles_split_response() {
        let (_client, mut chunks, mut sock) = connected_pair().await;

        let response = netsdr_codec::encode_control_item(
            MessageKind::CurrentControlItem,
            Some(ItemCode::ReceiverFrequency),
            &[0x00, 0x90, 0xC6, 0x02, 0x00],
        )
        .unwrap();
        sock.write_all(&response[..3]).await.unwrap();
        sock.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        sock.write_all(&response[3..]).await.unwrap();

        let decoded = wait_for_message(&mut chunks, Duration::from_secs(5))
            .await
            .unwrap();
        assert!(decoded.is_valid());
        assert_eq!(decoded.message.item_code, Some(ItemCode::ReceiverFrequency));
        assert_eq!(decoded.message.payload.len(), 5);
    }

    #[tokio::test]
    async fn wait_times_out_without_response() {
        let (_client, mut chunks, _sock) = connected_pair().await;
        let err = wait_for_message(&mut chunks, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert_eq!(err.code, TIMEOUT);
    }

    #[tokio::test]
    async fn wait_fails_when_device_hangs_up() {
        let (_client, mut chunks, sock) = connected_pair().await;
        drop(sock);
        let err = wait_for_message(&mut chunks, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(err.code, FAILURE);
    }
}
