use crate::cmd::{encode_message, EncodeArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let encoded = encode_message(&args.message)?;
    print_encoded(args.message.kind, args.message.item, &encoded, format);
    Ok(SUCCESS)
}
