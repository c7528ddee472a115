// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX module — WordprocessingML packages: paragraph text in, paragraphs out.
//
// A DOCX file is a ZIP archive of XML parts. Only the parts needed for plain
// paragraph text are read or written.

pub mod reader;
pub mod writer;
mod xml;

pub use reader::DocxReader;
pub use writer::DocxWriter;

/// Main document part.
pub const DOCUMENT_PART: &str = "word/document.xml";
/// Core properties part (title, creator, timestamps).
pub const CORE_PART: &str = "docProps/core.xml";

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
