// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — text recovery, merging, and creation of PDFs.

pub mod encoding;
pub mod reader;
pub mod writer;

pub use reader::{PdfReader, TextRun};
pub use writer::PdfWriter;
