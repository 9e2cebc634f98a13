use std::fmt::Write as _;
use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use netsdr_codec::{Decoded, ItemCode, MessageKind};
use serde::Serialize;

use crate::exit::{CliError, CliResult, USAGE};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    source: &'a str,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sequence_number: Option<u16>,
    payload_size: usize,
    payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample_count: Option<usize>,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<String>,
    timestamp: String,
}

/// Print one decoded message. `sample_count` is shown when the caller
/// extracted samples from the payload.
pub fn print_message(
    decoded: &Decoded,
    source: &str,
    sample_count: Option<usize>,
    format: OutputFormat,
) {
    let message = &decoded.message;
    let out = MessageOutput {
        source,
        kind: message.kind.name(),
        item_code: message.item_code.map(ItemCode::name),
        sequence_number: message.sequence_number,
        payload_size: message.payload.len(),
        payload: to_hex(&message.payload),
        sample_count,
        valid: decoded.is_valid(),
        failure: decoded.failure().map(|f| f.to_string()),
        timestamp: now_unix_seconds(),
    };

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KIND", "CODE/SEQ", "SIZE", "STATUS", "PAYLOAD"])
                .add_row(vec![
                    out.kind.to_string(),
                    code_or_sequence(&out),
                    out.payload_size.to_string(),
                    status(&out),
                    preview(&out.payload),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let samples = out
                .sample_count
                .map(|n| format!(" samples={n}"))
                .unwrap_or_default();
            println!(
                "kind={} {} size={}{} status={} payload={}",
                out.kind,
                code_or_sequence(&out),
                out.payload_size,
                samples,
                status(&out),
                preview(&out.payload)
            );
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_code: Option<&'static str>,
    length: usize,
    hex: &'a str,
}

pub fn print_encoded(
    kind: MessageKind,
    item_code: Option<ItemCode>,
    encoded: &[u8],
    format: OutputFormat,
) {
    let hex = to_hex(encoded);
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                kind: kind.name(),
                item_code: item_code.map(ItemCode::name),
                length: encoded.len(),
                hex: &hex,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KIND", "CODE", "LENGTH", "HEX"])
                .add_row(vec![
                    kind.name().to_string(),
                    item_code.map(ItemCode::name).unwrap_or("-").to_string(),
                    encoded.len().to_string(),
                    hex,
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{hex}"),
    }
}

#[derive(Serialize)]
struct SamplesOutput<'a> {
    bits: u16,
    count: usize,
    samples: &'a [i32],
}

pub fn print_samples(bits: u16, samples: &[i32], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = SamplesOutput {
                bits,
                count: samples.len(),
                samples,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["INDEX", "SAMPLE"]);
            for (i, sample) in samples.iter().enumerate() {
                table.add_row(vec![i.to_string(), sample.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let joined: Vec<String> = samples.iter().map(i32::to_string).collect();
            println!("{}", joined.join(" "));
        }
    }
}

fn code_or_sequence(out: &MessageOutput<'_>) -> String {
    match (out.item_code, out.sequence_number) {
        (Some(code), _) => format!("code={code}"),
        (None, Some(seq)) => format!("seq={seq}"),
        (None, None) => "-".to_string(),
    }
}

fn status(out: &MessageOutput<'_>) -> String {
    match &out.failure {
        None => "ok".to_string(),
        Some(failure) => format!("invalid ({failure})"),
    }
}

fn preview(hex: &str) -> String {
    const MAX_PREVIEW: usize = 64;
    if hex.len() > MAX_PREVIEW {
        format!("{}…", &hex[..MAX_PREVIEW])
    } else {
        hex.to_string()
    }
}

/// Lowercase hex without separators.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Parse hex input. Whitespace, `:` and `-` separators and a `0x` prefix are ignored.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: Vec<u8> = trimmed
        .bytes()
        .filter(|b| !b.is_ascii_whitespace() && *b != b':' && *b != b'-')
        .collect();

    if digits.len() % 2 != 0 {
        return Err(CliError::new(
            USAGE,
            format!("hex input has an odd number of digits: {input}"),
        ));
    }

    digits
        .chunks_exact(2)
        .map(|pair| {
            let text = std::str::from_utf8(pair).unwrap_or("");
            u8::from_str_radix(text, 16)
                .map_err(|_| CliError::new(USAGE, format!("invalid hex byte {text:?} in {input}")))
        })
        .collect()
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        assert_eq!(to_hex(&[0x08, 0x00, 0x18, 0xAB]), "080018ab");
        assert_eq!(parse_hex("080018ab").unwrap(), vec![0x08, 0x00, 0x18, 0xAB]);
    }

    #[test]
    fn hex_accepts_separators_and_prefix() {
        assert_eq!(parse_hex("0x08 00:18-AB").unwrap(), vec![0x08, 0x00, 0x18, 0xAB]);
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert_eq!(parse_hex("abc").unwrap_err().code, USAGE);
        assert_eq!(parse_hex("zz").unwrap_err().code, USAGE);
    }

    #[test]
    fn preview_truncates_long_payloads() {
        let long = "ab".repeat(100);
        assert_eq!(preview(&long).chars().count(), 65);
        assert_eq!(preview("abcd"), "abcd");
    }
}
