//! # GPT-2 Byte / Unicode Mapping
//!
//! The reversible byte-to-printable-codepoint mapping used by GPT-2 style
//! tokenizers. Printable latin bytes map to themselves; the remaining 68
//! bytes map, in increasing byte order, to codepoints starting at `U+0100`.
//! Space renders as `Ġ` and newline as `Ċ`.

use once_cell::sync::Lazy;

use crate::types::RbHashMap;

static BYTE_TO_UNICODE: Lazy<[char; 256]> = Lazy::new(|| {
    let mut chars = ['\0'; 256];
    let mut offset = 0u32;
    for b in 0..=255u8 {
        let printable = matches!(b, 0x21..=0x7E | 0xA1..=0xAC | 0xAE..=0xFF);
        chars[b as usize] = if printable {
            char::from_u32(b as u32).unwrap()
        } else {
            let c = char::from_u32(0x100 + offset).unwrap();
            offset += 1;
            c
        };
    }
    chars
});

static UNICODE_TO_BYTE: Lazy<RbHashMap<char, u8>> = Lazy::new(|| {
    BYTE_TO_UNICODE
        .iter()
        .enumerate()
        .map(|(b, &c)| (c, b as u8))
        .collect()
});

/// Map a byte to its printable stand-in codepoint.
pub fn byte_to_unicode(byte: u8) -> char {
    BYTE_TO_UNICODE[byte as usize]
}

/// Map a stand-in codepoint back to its byte, if it is one.
pub fn unicode_to_byte(c: char) -> Option<u8> {
    UNICODE_TO_BYTE.get(&c).copied()
}

/// Render token content as a GPT-2 unicode string.
pub fn render_token_unicode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| byte_to_unicode(b)).collect()
}

/// Parse a GPT-2 unicode string back to token content.
///
/// ## Returns
/// `None` if any character is not a stand-in codepoint.
pub fn parse_token_unicode(text: &str) -> Option<Vec<u8>> {
    text.chars().map(unicode_to_byte).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RbHashSet;

    #[test]
    fn test_mapping_is_a_bijection() {
        let distinct: RbHashSet<char> = (0..=255u8).map(byte_to_unicode).collect();
        assert_eq!(distinct.len(), 256);

        for b in 0..=255u8 {
            assert_eq!(unicode_to_byte(byte_to_unicode(b)), Some(b));
        }
    }

    #[test]
    fn test_printable_bytes_map_to_themselves() {
        assert_eq!(byte_to_unicode(b'a'), 'a');
        assert_eq!(byte_to_unicode(b'!'), '!');
        assert_eq!(byte_to_unicode(b'~'), '~');
        assert_eq!(byte_to_unicode(0xA1), '\u{A1}');
        assert_eq!(byte_to_unicode(0xFF), '\u{FF}');
    }

    #[test]
    fn test_control_bytes_are_remapped() {
        assert_eq!(byte_to_unicode(b' '), '\u{120}'); // Ġ
        assert_eq!(byte_to_unicode(b'\n'), '\u{10A}'); // Ċ
        assert_eq!(byte_to_unicode(0), '\u{100}');
        assert_eq!(byte_to_unicode(0xAD), '\u{143}');
    }

    #[test]
    fn test_render_parse_round_trip() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = render_token_unicode(&bytes);
        assert_eq!(parse_token_unicode(&text), Some(bytes));

        assert_eq!(render_token_unicode(b" hi"), "\u{120}hi");
        assert_eq!(parse_token_unicode("hi there"), None);
    }
}
