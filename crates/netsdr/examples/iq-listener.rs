//! Print a summary of every I/Q data item received on UDP port 60000.
//!
//! Usage: cargo run --example iq-listener -- [bits-per-sample]

use netsdr::codec::{decode, samples};
use netsdr::transport::{CancellationToken, UdpListener};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bits: u16 = std::env::args().nth(1).as_deref().unwrap_or("16").parse()?;

    let listener = UdpListener::bind_port(60000).await?;
    println!("listening on {}", listener.local_addr());

    let cancel = CancellationToken::new();
    let stop = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        stop.cancel();
    });

    let mut datagrams = listener.listen(cancel);
    while let Some(datagram) = datagrams.recv().await {
        let decoded = decode(&datagram);
        let message = &decoded.message;
        let peak = samples(bits, &message.payload)?
            .map(|s| s.unsigned_abs())
            .max()
            .unwrap_or(0);
        println!(
            "{} seq={:?} bytes={} peak={} valid={}",
            message.kind,
            message.sequence_number,
            message.payload.len(),
            peak,
            decoded.is_valid()
        );
    }
    Ok(())
}
