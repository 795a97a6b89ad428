//! # Token Content Rendering

use crate::errors::{RawBpeError, RbResult};

/// Render token content as space-joined lowercase hex bytes.
///
/// Hex is the canonical on-disk spelling: it is unambiguous for every
/// byte value, including whitespace and invalid UTF-8.
pub fn token_to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse space-joined hex bytes back to token content.
pub fn hex_to_bytes(hex: &str) -> RbResult<Vec<u8>> {
    hex.split_whitespace()
        .map(|h| {
            u8::from_str_radix(h, 16)
                .map_err(|_| RawBpeError::Parse(format!("bad hex byte: {h:?}")))
        })
        .collect()
}

/// Render token content for log lines.
///
/// Printable ASCII passes through; newline and tab render as `\n` and
/// `\t`; everything else renders as `\xHH`. Diagnostic only, never
/// persisted to artifacts.
pub fn render_token_escaped(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7E => out.push(b as char),
            _ => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out
}
