//! Decode command - turn a raw radio response dump into text lines.

use std::fs;
use std::path::PathBuf;

use cellguard::radio::RecordDecoder;

use crate::error::CliError;

/// Arguments for the decode command.
pub struct DecodeArgs {
    pub file: PathBuf,
    pub hex: bool,
    pub slot_width: usize,
    pub header_len: usize,
}

/// Run the decode command.
pub fn run(args: DecodeArgs) -> Result<(), CliError> {
    if args.slot_width == 0 {
        return Err(CliError::InvalidArgument(
            "slot width must be greater than zero".to_string(),
        ));
    }
    if args.header_len >= args.slot_width {
        return Err(CliError::InvalidArgument(format!(
            "header length {} must be smaller than the slot width {}",
            args.header_len, args.slot_width
        )));
    }

    let raw = fs::read(&args.file)
        .map_err(|e| CliError::Io(format!("Failed to read {}: {}", args.file.display(), e)))?;
    let bytes = if args.hex { parse_hex(&raw)? } else { raw };

    let decoder = RecordDecoder::new(args.slot_width, args.header_len);
    for (i, line) in decoder.decode(&bytes).iter().enumerate() {
        println!("{:>3}: {}", i, line);
    }
    Ok(())
}

/// Parses hex text, ignoring whitespace and an optional `0x` prefix per
/// token.
fn parse_hex(text: &[u8]) -> Result<Vec<u8>, CliError> {
    let text = String::from_utf8_lossy(text);
    let digits: Vec<u8> = text
        .split_whitespace()
        .flat_map(|token| {
            token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token)
                .bytes()
        })
        .collect();

    if digits.len() % 2 != 0 {
        return Err(CliError::InvalidArgument(
            "hex input has an odd number of digits".to_string(),
        ));
    }

    digits
        .chunks(2)
        .map(|pair| {
            let s = std::str::from_utf8(pair).unwrap_or("");
            u8::from_str_radix(s, 16)
                .map_err(|_| CliError::InvalidArgument(format!("invalid hex byte '{}'", s)))
        })
        .collect()
}
