// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input checks run before any decoding.

use docwerk_core::error::{DocwerkError, Result};
use docwerk_core::{DocumentType, OutputFormat};

use crate::source::SourceDocument;

/// Require `source` to be of a type accepted by `accepts`.
pub fn require_type(
    source: &SourceDocument,
    expected: &str,
    accepts: impl Fn(DocumentType) -> bool,
) -> Result<DocumentType> {
    match source.document_type() {
        Some(kind) if accepts(kind) => Ok(kind),
        _ => Err(DocwerkError::InvalidInputType {
            expected: expected.to_string(),
            actual: format!("{} ({})", source.file_name(), source.declared_type()),
        }),
    }
}

pub fn require_pdf(source: &SourceDocument) -> Result<()> {
    require_type(source, "PDF", |kind| kind == DocumentType::Pdf).map(|_| ())
}

pub fn require_docx(source: &SourceDocument) -> Result<()> {
    require_type(source, "DOCX", |kind| kind == DocumentType::Docx).map(|_| ())
}

pub fn require_image(source: &SourceDocument) -> Result<DocumentType> {
    require_type(source, "image", |kind| kind.is_image())
}

/// Check every source, stopping at the first mismatch.
pub fn require_all(
    sources: &[SourceDocument],
    check: impl Fn(&SourceDocument) -> Result<()>,
) -> Result<()> {
    sources.iter().try_for_each(check)
}

pub fn require_count(sources: &[SourceDocument], required: usize) -> Result<()> {
    if sources.len() < required {
        return Err(DocwerkError::NotEnoughInputs {
            required,
            supplied: sources.len(),
        });
    }
    Ok(())
}

/// Suggested output name: trimmed base name plus the format's extension.
///
/// A trailing copy of the target extension is not doubled
/// (`report.pdf` stays `report.pdf`). A blank base name is rejected.
pub fn output_file_name(base: &str, suffix: &str, format: OutputFormat) -> Result<String> {
    let trimmed = base.trim();
    let extension = format.extension();
    let stem = trimmed
        .len()
        .checked_sub(extension.len() + 1)
        .filter(|&cut| {
            trimmed.is_char_boundary(cut)
                && trimmed[cut..].eq_ignore_ascii_case(&format!(".{extension}"))
        })
        .map_or(trimmed, |cut| &trimmed[..cut]);

    if stem.trim().is_empty() {
        return Err(DocwerkError::InvalidParameter(
            "output file name must not be blank".into(),
        ));
    }
    Ok(format!("{stem}{suffix}.{extension}"))
}
