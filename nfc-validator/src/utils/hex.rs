// nfc-validator/src/utils/hex.rs
//! Hexadecimal helpers used for wire traces and display purposes.

/// Convert a byte slice to a lowercase hex string without separators.
///
/// Example: `&[0xde, 0xad]` -> `"dead"`
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    ::hex::encode(bytes)
}

/// Convert a byte slice to an uppercase hex string with a single space
/// between each byte, the format reader transcripts are logged in.
///
/// Example: `&[0xff, 0xb0]` -> `"FF B0"`
pub fn bytes_to_hex_spaced(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a hex string into bytes. ASCII whitespace between digits is
/// ignored so transcripts can be pasted back in.
pub fn parse_hex(s: &str) -> Result<Vec<u8>, ::hex::FromHexError> {
    let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    ::hex::decode(cleaned)
}
