use crate::cmd::SamplesArgs;
use crate::exit::{codec_error, CliResult, SUCCESS};
use crate::output::{parse_hex, print_samples, OutputFormat};

pub fn run(args: SamplesArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = parse_hex(&args.hex)?;
    let iter = netsdr_codec::samples(args.bits, &payload)
        .map_err(|err| codec_error("sample extraction failed", err))?;

    if !iter.remainder().is_empty() {
        tracing::debug!(
            trailing = iter.remainder().len(),
            "ignoring bytes that do not form a whole sample"
        );
    }

    let samples: Vec<i32> = iter.collect();
    print_samples(args.bits, &samples, format);
    Ok(SUCCESS)
}
