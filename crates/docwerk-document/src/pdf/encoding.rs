// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WinAnsi text encoding — the character set of the PDF base-14 fonts.
//
// Used by the writer to reject text the built-in fonts cannot show, and by the
// reader to turn string operands back into Unicode.

use docwerk_core::error::{DocwerkError, Result};

/// WinAnsi code points 0x80..=0x9F that differ from Latin-1.
const WINANSI_HIGH: [(u8, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

/// WinAnsi byte for `c`, if the base fonts can show it.
pub fn encode_char(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => WINANSI_HIGH
            .iter()
            .find(|(_, mapped)| *mapped == c)
            .map(|(byte, _)| *byte),
    }
}

/// Unicode character for a WinAnsi byte. Undefined slots decode as U+FFFD.
pub fn decode_byte(byte: u8) -> char {
    match byte {
        0x80..=0x9F => WINANSI_HIGH
            .iter()
            .find(|(code, _)| *code == byte)
            .map(|(_, c)| *c)
            .unwrap_or('\u{FFFD}'),
        _ => byte as char,
    }
}

/// Fail with `EncodeFailure` naming the first character WinAnsi lacks.
pub fn check_encodable(text: &str) -> Result<()> {
    match text.chars().find(|c| encode_char(*c).is_none()) {
        Some(c) => Err(DocwerkError::encode(
            "PDF",
            format!("character {c:?} (U+{:04X}) has no glyph in the base fonts", c as u32),
        )),
        None => Ok(()),
    }
}

/// Encode `text` as WinAnsi bytes for a base-font string operand.
pub fn encode_winansi(text: &str) -> Result<Vec<u8>> {
    check_encodable(text)?;
    Ok(text.chars().filter_map(encode_char).collect())
}

/// Decode the bytes of a PDF string operand.
///
/// UTF-16BE when the string starts with a byte-order mark, WinAnsi otherwise.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| decode_byte(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_and_latin1_round_trip() {
        for c in ['A', '~', ' ', '\u{00E9}', '\u{00FF}'] {
            let byte = encode_char(c).unwrap();
            assert_eq!(decode_byte(byte), c);
        }
    }

    #[test]
    fn windows_specials_round_trip() {
        for c in ['\u{20AC}', '\u{2022}', '\u{2014}', '\u{201C}'] {
            let byte = encode_char(c).unwrap();
            assert!((0x80..=0x9F).contains(&byte));
            assert_eq!(decode_byte(byte), c);
        }
    }

    #[test]
    fn cjk_is_not_encodable() {
        assert_eq!(encode_char('\u{4E2D}'), None);
        let err = check_encodable("ok \u{4E2D}").unwrap_err();
        assert!(err.to_string().contains("U+4E2D"));
        assert!(check_encodable("caf\u{00E9}").is_ok());
    }

    #[test]
    fn accented_text_encodes_to_single_bytes() {
        let bytes = encode_winansi("caf\u{00E9} \u{20AC}5").unwrap();
        assert_eq!(bytes, vec![b'c', b'a', b'f', 0xE9, b' ', 0x80, b'5']);
        assert_eq!(decode_pdf_string(&bytes), "caf\u{00E9} \u{20AC}5");
        assert!(encode_winansi("\u{4E2D}").is_err());
    }

    #[test]
    fn control_characters_are_not_encodable() {
        assert!(check_encodable("a\tb").is_err());
    }

    #[test]
    fn utf16_strings_are_detected() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_pdf_string(&bytes), "Hi");
        assert_eq!(decode_pdf_string(b"plain"), "plain");
        assert_eq!(decode_pdf_string(&[0x93, b'q', 0x94]), "\u{201C}q\u{201D}");
    }
}
