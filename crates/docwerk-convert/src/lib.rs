// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Docwerk — conversion orchestrators, input validation, output delivery and
// the async task layer.

pub mod converter;
pub mod delivery;
pub mod source;
pub mod task;
pub mod validate;

pub use converter::{ConversionOutcome, Converter};
pub use delivery::{ArtifactSink, ConversionResult, MemorySink};
pub use source::SourceDocument;
pub use task::AsyncConverter;
