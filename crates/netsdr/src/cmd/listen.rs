use netsdr_codec::{decode, Decoded};
use netsdr_transport::{CancellationToken, UdpListener};

use crate::cmd::{runtime, ListenArgs};
use crate::exit::{codec_error, transport_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    if let Some(bits) = args.bits {
        // Reject a bad width before binding.
        netsdr_codec::samples(bits, &[]).map_err(|err| codec_error("invalid --bits", err))?;
    }

    runtime()?.block_on(listen(args, format))
}

async fn listen(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let addr = format!("{}:{}", args.bind, args.port);
    let listener = UdpListener::bind(&addr)
        .await
        .map_err(|err| transport_error("bind failed", err))?;
    let source = listener.local_addr().to_string();
    tracing::info!(%source, "listening for data items");

    let cancel = CancellationToken::new();
    install_ctrlc_handler(cancel.clone());
    let mut datagrams = listener.listen(cancel.clone());

    let mut printed = 0usize;
    while let Some(datagram) = datagrams.recv().await {
        let decoded = decode(&datagram);
        if let Some(failure) = decoded.failure() {
            tracing::warn!(%failure, size = datagram.len(), "invalid datagram");
        }

        print_message(&decoded, &source, sample_count(&decoded, args.bits), format);
        printed = printed.saturating_add(1);

        if args.count.is_some_and(|count| printed >= count) {
            cancel.cancel();
            break;
        }
    }

    Ok(SUCCESS)
}

fn sample_count(decoded: &Decoded, bits: Option<u16>) -> Option<usize> {
    let bits = bits?;
    if !decoded.message.kind.is_data_plane() {
        return None;
    }
    netsdr_codec::samples(bits, &decoded.message.payload)
        .ok()
        .map(|samples| samples.len())
}

fn install_ctrlc_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => cancel.cancel(),
            Err(err) => tracing::warn!(error = %err, "signal handler setup failed"),
        }
    });
}
