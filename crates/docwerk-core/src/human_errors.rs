// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for callers that show conversion failures
// to people (UIs, the command-line tool).
//
// The pipeline itself never displays anything; it only surfaces typed errors.
// This module is the single place where those errors become plain English.

use crate::error::{ConversionError, DocwerkError};
use crate::types::Operation;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Trying again may work (I/O hiccup, worker pool shut down).
    Transient,
    /// The user must change something: pick other files, fix a setting.
    ActionRequired,
    /// The file itself cannot be processed.
    Permanent,
}

/// A human-readable error with a plain English message and a suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Short summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether simply retrying can help.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a failed conversion into a `HumanError`.
pub fn humanize_conversion_error(err: &ConversionError) -> HumanError {
    let mut human = humanize_error(&err.source);
    if matches!(err.source, DocwerkError::InvalidInputType { .. }) {
        human.suggestion = format!("{} {}", expected_input(err.operation), human.suggestion);
    }
    human
}

/// Convert a `DocwerkError` into a `HumanError`.
pub fn humanize_error(err: &DocwerkError) -> HumanError {
    match err {
        DocwerkError::InvalidInputType { actual, .. } => HumanError {
            message: "Invalid file type.".into(),
            suggestion: format!("The selected file ({actual}) can't be used here."),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocwerkError::NotEnoughInputs { required, supplied } => HumanError {
            message: "Not enough files selected.".into(),
            suggestion: format!("Please select at least {required} files (you selected {supplied})."),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocwerkError::InvalidParameter(detail) => HumanError {
            message: "Missing or invalid information.".into(),
            suggestion: format!("Please check the settings and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocwerkError::UnsupportedFormat(detail) => HumanError {
            message: "This format isn't supported.".into(),
            suggestion: format!("Choose TXT, PDF or DOCX, or check the file is not damaged. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        DocwerkError::DecodeFailure { format, .. } => HumanError {
            message: format!("This {format} file couldn't be read."),
            suggestion: "The file may be damaged or password protected. Try opening it in another program first, or try a different file.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        DocwerkError::EncodeFailure { format, .. } => HumanError {
            message: format!("The {format} file couldn't be created."),
            suggestion: "Some characters may not be supported. Try removing unusual symbols and convert again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        DocwerkError::Config(detail) => HumanError {
            message: "The conversion settings are invalid.".into(),
            suggestion: format!("Fix the configuration file and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "No permission to read or write that file.".into(),
                    suggestion: "Check the file permissions, or try a different location.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        DocwerkError::Serialization(_) => HumanError {
            message: "The settings file couldn't be understood.".into(),
            suggestion: "Check that the configuration file is valid JSON.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocwerkError::Task(_) => HumanError {
            message: "The conversion was interrupted.".into(),
            suggestion: "Please try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

/// Which inputs an operation accepts, phrased for people.
fn expected_input(operation: Operation) -> &'static str {
    match operation {
        Operation::DocxToPdf | Operation::MergeDocx => "Please select DOCX files.",
        Operation::MergePdf | Operation::PdfToDocx | Operation::PdfToText => {
            "Please select PDF files."
        }
        Operation::ImagesToPdf | Operation::ResizeImage => "Please select image files.",
        Operation::GenerateFile => "Please enter plain text.",
    }
}
