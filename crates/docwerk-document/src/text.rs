// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain text pulled out of a decoded document.

use serde::{Deserialize, Serialize};

use crate::layout::{ParagraphBlock, paragraphs_from_text, split_lines};

/// Text decoded from a source document, with its page count when the source
/// format is paginated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: Option<usize>,
}

impl ExtractedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page_count: None,
        }
    }

    pub fn with_page_count(mut self, pages: usize) -> Self {
        self.page_count = Some(pages);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        split_lines(&self.text)
    }

    /// One paragraph block per line.
    pub fn to_paragraphs(&self) -> Vec<ParagraphBlock> {
        paragraphs_from_text(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_is_optional() {
        let text = ExtractedText::new("a\nb");
        assert_eq!(text.page_count, None);
        assert_eq!(text.with_page_count(2).page_count, Some(2));
    }

    #[test]
    fn lines_and_paragraphs_agree() {
        let text = ExtractedText::new("one\r\n\r\nthree");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["one", "", "three"]);
        assert_eq!(text.to_paragraphs().len(), 3);
    }
}
