// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout engine — turns linear text into wrapped, paginated lines (PDF) or
// ordered paragraph blocks (DOCX), and fits images onto pages.

use std::borrow::Cow;

pub mod metrics;
pub mod page;
pub mod paragraph;

pub use metrics::HelveticaMetrics;
pub use page::{ImagePlacement, LaidOutPage, PageGeometry, PageLayout, PlacedLine, paginate};
pub use paragraph::{ParagraphBlock, RunStyle, paragraphs_from_text};

/// Split text into logical lines. `\r\n` and lone `\r` count as line breaks.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

/// Columns a tab expands to. The base fonts have no tab glyph.
pub const TAB_WIDTH: usize = 4;

/// Greedy word-wrap of a single line to `max_width_mm`.
///
/// Tabs become spaces. A line that fits is kept as is, indentation and inner
/// spacing included. Otherwise whitespace collapses only where the line is
/// broken; the spacing between words kept on one line is unchanged. A word
/// wider than the budget is placed on its own line unsplit. A blank line
/// yields a single empty string so vertical spacing is kept.
pub fn wrap_line(
    line: &str,
    max_width_mm: f32,
    font_size_pt: f32,
    metrics: &HelveticaMetrics,
) -> Vec<String> {
    let expanded = if line.contains('\t') {
        Cow::Owned(line.replace('\t', &" ".repeat(TAB_WIDTH)))
    } else {
        Cow::Borrowed(line)
    };
    let line = expanded.trim_end();
    if metrics.text_width_mm(line, font_size_pt) <= max_width_mm {
        return vec![line.to_string()];
    }

    let mut result = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for (gap, word) in gaps_and_words(line) {
        let word_width = metrics.text_width_mm(word, font_size_pt);
        if current.is_empty() && result.is_empty() {
            // Indentation of the first piece survives.
            current.push_str(gap);
            current.push_str(word);
            current_width = metrics.text_width_mm(&current, font_size_pt);
            continue;
        }
        let gap_width = metrics.text_width_mm(gap, font_size_pt);
        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + gap_width + word_width <= max_width_mm {
            current.push_str(gap);
            current.push_str(word);
            current_width += gap_width + word_width;
        } else {
            result.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }

    if !current.is_empty() || result.is_empty() {
        result.push(current);
    }
    result
}

/// Each word with the whitespace run in front of it.
fn gaps_and_words(line: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();
    let mut rest = line;
    while let Some(word_start) = rest.find(|c: char| !c.is_whitespace()) {
        let (gap, tail) = rest.split_at(word_start);
        let word_end = tail.find(char::is_whitespace).unwrap_or(tail.len());
        let (word, next) = tail.split_at(word_end);
        pairs.push((gap, word));
        rest = next;
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_handles_all_line_endings() {
        let lines: Vec<&str> = split_lines("a\r\nb\nc\rd").collect();
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn split_keeps_blank_lines() {
        let lines: Vec<&str> = split_lines("a\n\nb\r\n\r\nc").collect();
        assert_eq!(lines, vec!["a", "", "b", "", "c"]);
    }

    #[test]
    fn short_line_is_untouched() {
        let metrics = HelveticaMetrics;
        assert_eq!(wrap_line("hello world", 170.0, 12.0, &metrics), vec!["hello world"]);
    }

    #[test]
    fn blank_line_yields_one_empty_line() {
        let metrics = HelveticaMetrics;
        assert_eq!(wrap_line("", 170.0, 12.0, &metrics), vec![String::new()]);
        assert_eq!(wrap_line("   ", 170.0, 12.0, &metrics), vec![String::new()]);
    }

    #[test]
    fn greedy_wrap_respects_budget() {
        let metrics = HelveticaMetrics;
        let text = "lorem ipsum dolor sit amet ".repeat(20);
        let lines = wrap_line(&text, 60.0, 12.0, &metrics);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(metrics.text_width_mm(line, 12.0) <= 60.0, "{line:?} too wide");
        }
        // Re-joining the wrapped lines gives back the words in order.
        assert_eq!(lines.join(" "), text.trim_end());
    }

    #[test]
    fn greedy_wrap_packs_as_many_words_as_fit() {
        let metrics = HelveticaMetrics;
        // "aaa bbb" is ~15.3mm at 12pt, adding " ccc" makes ~22.4mm.
        let lines = wrap_line("aaa bbb ccc ddd", 20.0, 12.0, &metrics);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn indentation_and_inner_spacing_survive() {
        let metrics = HelveticaMetrics;
        assert_eq!(
            wrap_line("    return  1", 170.0, 12.0, &metrics),
            vec!["    return  1"]
        );
        assert_eq!(wrap_line("\tTabbed", 170.0, 12.0, &metrics), vec!["    Tabbed"]);
    }

    #[test]
    fn whitespace_collapses_only_at_breaks() {
        let metrics = HelveticaMetrics;
        let lines = wrap_line("  aaa  bbb ccc   ddd", 25.0, 12.0, &metrics);
        assert_eq!(lines, vec!["  aaa  bbb", "ccc   ddd"]);
    }

    #[test]
    fn oversized_word_gets_its_own_line() {
        let metrics = HelveticaMetrics;
        let long_word = "x".repeat(200);
        let line = format!("a {long_word} b");
        let lines = wrap_line(&line, 50.0, 12.0, &metrics);
        assert_eq!(lines, vec!["a".to_string(), long_word, "b".to_string()]);
    }
}
