use std::time::Duration;

use clap::{Args, Subcommand};
use netsdr_codec::{ItemCode, MessageKind};

use crate::exit::{CliError, CliResult, INTERNAL, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod listen;
pub mod samples;
pub mod send;
pub mod version;

/// Default TCP control port of NetSDR receivers.
pub const DEFAULT_CONTROL_PORT: u16 = 50000;

/// Default UDP port for I/Q data.
pub const DEFAULT_DATA_PORT: u16 = 60000;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a message and print it as hex.
    Encode(EncodeArgs),
    /// Decode a hex message.
    Decode(DecodeArgs),
    /// Extract samples from a hex payload.
    Samples(SamplesArgs),
    /// Send a message to a receiver over TCP.
    Send(SendArgs),
    /// Listen for data items over UDP and print them.
    Listen(ListenArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Samples(args) => samples::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Listen(args) => listen::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Message fields shared by `encode` and `send`.
#[derive(Args, Debug, Clone)]
pub struct MessageArgs {
    /// Message kind (e.g. set-control-item, current-control-item, data-item0).
    #[arg(long, short = 'k')]
    pub kind: MessageKind,
    /// Control item code (e.g. receiver-frequency). Control-plane kinds only.
    #[arg(long, short = 'i')]
    pub item: Option<ItemCode>,
    /// Payload as hex.
    #[arg(long, short = 'p', default_value = "")]
    pub payload: String,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub message: MessageArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Encoded message as hex.
    pub hex: String,
    /// Also extract samples from the payload at this bit width.
    #[arg(long)]
    pub bits: Option<u16>,
}

#[derive(Args, Debug)]
pub struct SamplesArgs {
    /// Sample width in bits (8, 16, 24 or 32).
    #[arg(long, short = 'b', default_value = "16")]
    pub bits: u16,
    /// Payload as hex.
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Receiver host name or address.
    #[arg(long, env = "NETSDR_HOST")]
    pub host: String,
    /// Receiver TCP control port.
    #[arg(long, env = "NETSDR_PORT", default_value_t = DEFAULT_CONTROL_PORT)]
    pub port: u16,
    #[command(flatten)]
    pub message: MessageArgs,
    /// Wait this long for one response message and print it (e.g. 2s, 500ms).
    #[arg(long)]
    pub wait: Option<String>,
    /// Connection timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub connect_timeout: String,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Local address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,
    /// UDP data port.
    #[arg(long, env = "NETSDR_DATA_PORT", default_value_t = DEFAULT_DATA_PORT)]
    pub port: u16,
    /// Count samples in data items at this bit width.
    #[arg(long)]
    pub bits: Option<u16>,
    /// Exit after receiving N datagrams.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}

/// Encode the message described on the command line.
pub fn encode_message(args: &MessageArgs) -> CliResult<bytes::Bytes> {
    if args.kind.is_data_plane() && args.item.is_some() {
        return Err(CliError::new(
            USAGE,
            format!("--item cannot be used with data-plane kind {}", args.kind),
        ));
    }

    let payload = crate::output::parse_hex(&args.payload)?;
    let encoded = if args.kind.is_data_plane() {
        netsdr_codec::encode_data_item(args.kind, &payload)
    } else {
        netsdr_codec::encode_control_item(args.kind, args.item, &payload)
    };
    encoded.map_err(|err| crate::exit::codec_error("encode failed", err))
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

/// Runtime for the network commands.
pub fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| CliError::new(INTERNAL, format!("failed to start runtime: {err}")))
}
