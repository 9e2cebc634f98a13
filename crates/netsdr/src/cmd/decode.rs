use netsdr_codec::decode;

use crate::cmd::DecodeArgs;
use crate::exit::{codec_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{parse_hex, print_message, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let buffer = parse_hex(&args.hex)?;
    let decoded = decode(&buffer);

    let sample_count = match args.bits {
        Some(bits) => Some(
            netsdr_codec::samples(bits, &decoded.message.payload)
                .map_err(|err| codec_error("sample extraction failed", err))?
                .len(),
        ),
        None => None,
    };

    print_message(&decoded, "input", sample_count, format);

    if let Some(failure) = decoded.failure() {
        tracing::warn!(%failure, "message is not valid");
        return Ok(DATA_INVALID);
    }
    Ok(SUCCESS)
}
