// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Docwerk.

use thiserror::Error;

use crate::types::Operation;

/// Top-level error type for all codec, layout and validation steps.
#[derive(Debug, Error)]
pub enum DocwerkError {
    // -- Input validation --
    #[error("invalid input type: expected {expected}, got {actual}")]
    InvalidInputType { expected: String, actual: String },

    #[error("at least {required} input file(s) required, got {supplied}")]
    NotEnoughInputs { required: usize, supplied: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    // -- Formats --
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to decode {format}: {detail}")]
    DecodeFailure { format: &'static str, detail: String },

    #[error("failed to encode {format}: {detail}")]
    EncodeFailure { format: &'static str, detail: String },

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Async layer --
    #[error("conversion task failed: {0}")]
    Task(String),
}

/// Coarse error categories for callers that only need to branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInputType,
    Validation,
    UnsupportedFormat,
    DecodeFailure,
    EncodeFailure,
    Environment,
}

impl DocwerkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInputType { .. } => ErrorKind::InvalidInputType,
            Self::NotEnoughInputs { .. } | Self::InvalidParameter(_) => ErrorKind::Validation,
            Self::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Self::DecodeFailure { .. } => ErrorKind::DecodeFailure,
            Self::EncodeFailure { .. } => ErrorKind::EncodeFailure,
            Self::Config(_) | Self::Io(_) | Self::Serialization(_) | Self::Task(_) => {
                ErrorKind::Environment
            }
        }
    }

    pub fn decode(format: &'static str, detail: impl std::fmt::Display) -> Self {
        Self::DecodeFailure {
            format,
            detail: detail.to_string(),
        }
    }

    pub fn encode(format: &'static str, detail: impl std::fmt::Display) -> Self {
        Self::EncodeFailure {
            format,
            detail: detail.to_string(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocwerkError>;

/// Failure of a whole conversion, tagged with the operation that failed.
///
/// Every orchestrator re-signals its internal errors as this type. No output
/// buffer accompanies it.
#[derive(Debug, Error)]
#[error("{operation} failed: {source}")]
pub struct ConversionError {
    pub operation: Operation,
    #[source]
    pub source: DocwerkError,
}

impl ConversionError {
    pub fn new(operation: Operation, source: DocwerkError) -> Self {
        Self { operation, source }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}
