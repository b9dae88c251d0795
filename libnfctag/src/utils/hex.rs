//! Hexadecimal helpers used for log output.

use std::fmt::Write;

/// Convert a byte slice to a lowercase hex string without separators.
///
/// Example: `&[0xde, 0xad]` -> `"dead"`
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        // write! never fails writing to a String
        let _ = write!(&mut s, "{:02x}", b);
    }
    s
}

/// Convert a byte slice to a lowercase hex string with a single space between
/// each byte.
///
/// Example: `&[0xde, 0xad]` -> `"de ad"`
pub fn bytes_to_hex_spaced(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i != 0 {
            s.push(' ');
        }
        let _ = write!(&mut s, "{:02x}", b);
    }
    s
}

/// Hex dump clipped to `max` bytes, for frames that may be long.
pub fn hex_preview(bytes: &[u8], max: usize) -> String {
    if bytes.len() <= max {
        bytes_to_hex_spaced(bytes)
    } else {
        format!("{} .. ({} bytes)", bytes_to_hex_spaced(&bytes[..max]), bytes.len())
    }
}
