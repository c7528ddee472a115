// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docwerk-document — Format codecs and layout for the Docwerk conversion
// pipeline.
//
// Provides PDF operations (text recovery, merge, creation from text or
// images), DOCX reading and writing, image decode/resize/JPEG encoding with a
// target-size search, text layout (wrapping, pagination, image placement) and
// symbol normalization.

pub mod docx;
pub mod image;
pub mod layout;
pub mod normalize;
pub mod pdf;
pub mod text;

// Re-export the primary structs so callers can use `docwerk_document::PdfReader` etc.
pub use docx::{DocxReader, DocxWriter};
pub use image::{CompressionOutcome, ImageProcessor, encode_to_target};
pub use pdf::{PdfReader, PdfWriter};
pub use text::ExtractedText;
