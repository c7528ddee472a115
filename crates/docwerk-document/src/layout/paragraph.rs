// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Paragraph blocks — the unit of DOCX output.

use serde::{Deserialize, Serialize};

use super::split_lines;

/// Inline style flags carried by a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    /// Hex `RRGGBB`, no leading `#`.
    pub color: Option<String>,
}

/// One logical paragraph. An empty `text` is an explicit blank paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphBlock {
    pub text: String,
    pub style: RunStyle,
    /// Start this paragraph on a new page.
    pub page_break_before: bool,
}

impl ParagraphBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: RunStyle) -> Self {
        self.style = style;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// One block per input line; blank lines become empty blocks.
pub fn paragraphs_from_text(text: &str) -> Vec<ParagraphBlock> {
    split_lines(text).map(ParagraphBlock::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_map_to_empty_blocks() {
        let blocks = paragraphs_from_text("first\n\nthird");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].text, "first");
        assert!(blocks[1].is_empty());
        assert_eq!(blocks[2].text, "third");
    }

    #[test]
    fn order_is_preserved() {
        let blocks = paragraphs_from_text("c\nb\na");
        let texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["c", "b", "a"]);
    }

    #[test]
    fn style_builder() {
        let block = ParagraphBlock::new("x").with_style(RunStyle {
            bold: true,
            ..Default::default()
        });
        assert!(block.style.bold);
        assert!(!block.style.italic);
        assert_eq!(ParagraphBlock::empty().style, RunStyle::default());
    }
}
