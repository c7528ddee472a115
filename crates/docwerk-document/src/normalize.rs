// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Symbol normalization for output formats with limited glyph coverage.
//
// The built-in PDF fonts only cover WinAnsi. Common typographic symbols are
// rewritten to ASCII sequences that read the same; anything else is left for
// the encoder to accept or reject.

use std::borrow::Cow;

/// Replacement glyph for characters the encoder cannot represent.
pub const PLACEHOLDER: char = '?';

/// Symbol → ASCII fallback sequence.
const SYMBOL_MAP: &[(char, &str)] = &[
    // Bullets and arrows
    ('\u{2022}', "*"),
    ('\u{2192}', "->"),
    ('\u{2190}', "<-"),
    ('\u{2191}', "^"),
    ('\u{2193}', "v"),
    ('\u{2194}', "<->"),
    ('\u{21D2}', "=>"),
    ('\u{21D0}', "<="),
    // Marks
    ('\u{00A9}', "(c)"),
    ('\u{00AE}', "(R)"),
    ('\u{2122}', "(TM)"),
    ('\u{00B0}', "deg"),
    // Math
    ('\u{00B1}', "+/-"),
    ('\u{2264}', "<="),
    ('\u{2265}', ">="),
    ('\u{2260}', "!="),
    ('\u{2248}', "~"),
    ('\u{221E}', "inf"),
    ('\u{00D7}', "x"),
    ('\u{00F7}', "/"),
    // Quotes, dashes, ellipsis
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{201E}', "\""),
    ('\u{2033}', "\""),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201A}', "'"),
    ('\u{2032}', "'"),
    ('\u{2013}', "-"),
    ('\u{2014}', "--"),
    ('\u{2212}', "-"),
    ('\u{2026}', "..."),
    ('\u{00A0}', " "),
];

fn fallback_for(c: char) -> Option<&'static str> {
    SYMBOL_MAP
        .iter()
        .find(|(symbol, _)| *symbol == c)
        .map(|(_, replacement)| *replacement)
}

/// Printable ASCII.
pub fn is_safe_char(c: char) -> bool {
    (' '..='~').contains(&c)
}

/// Rewrite mapped symbols; every other character is passed through.
pub fn normalize_symbols(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| fallback_for(c).is_some()) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match fallback_for(c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Replace every character outside printable ASCII with [`PLACEHOLDER`].
pub fn replace_unsafe(text: &str) -> String {
    text.chars()
        .map(|c| if is_safe_char(c) { c } else { PLACEHOLDER })
        .collect()
}
