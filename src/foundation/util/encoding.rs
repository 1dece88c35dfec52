use crate::foundation::{Hash32, RoundError};

pub fn decode_hex(s: &str) -> Result<Vec<u8>, RoundError> {
    hex::decode(s.trim_start_matches("0x").trim_start_matches("0X")).map_err(|e| e.into())
}

/// Parses a 32-byte identifier from hex, with or without a `0x` prefix.
pub fn parse_hex_32bytes(s: &str) -> Result<Hash32, RoundError> {
    let bytes = decode_hex(s)?;
    let array: Hash32 = bytes
        .as_slice()
        .try_into()
        .map_err(|_| RoundError::EncodingError(format!("expected 32 bytes, got {}", bytes.len())))?;
    Ok(array)
}
