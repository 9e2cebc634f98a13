//! Tune a receiver and read the frequency back.
//!
//! Usage: cargo run --example set-frequency -- <host> <frequency-hz>

use bytes::BytesMut;
use netsdr::codec::{decode, encode_control_item, split_message, ItemCode, MessageKind};
use netsdr::transport::TcpClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let frequency: u64 = args.next().as_deref().unwrap_or("14010000").parse()?;

    let mut client = TcpClient::new(&host, 50000);
    let mut chunks = client.connect().await?;

    // Channel 0, then a 5-byte little-endian frequency.
    let mut params = vec![0x00];
    params.extend_from_slice(&frequency.to_le_bytes()[..5]);
    let set = encode_control_item(
        MessageKind::SetControlItem,
        Some(ItemCode::ReceiverFrequency),
        &params,
    )?;
    client.send(&set).await?;

    let mut buf = BytesMut::new();
    while let Some(chunk) = chunks.recv().await {
        buf.extend_from_slice(&chunk);
        if let Some(raw) = split_message(&mut buf)? {
            let decoded = decode(&raw);
            println!(
                "{} {:?} payload={:02x?} valid={}",
                decoded.message.kind,
                decoded.message.item_code,
                decoded.message.payload.as_ref(),
                decoded.is_valid()
            );
            break;
        }
    }

    client.disconnect().await;
    Ok(())
}
