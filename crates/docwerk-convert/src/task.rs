// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Async front end. Conversions are CPU-bound, so each call moves its owned
// inputs onto tokio's blocking pool and awaits the result.

use docwerk_core::error::{ConversionError, DocwerkError};
use docwerk_core::{ConversionConfig, ImageRasterSpec, Operation};
use tracing::error;

use crate::converter::{ConversionOutcome, Converter};
use crate::source::SourceDocument;

/// `Converter` wrapped for use from async code.
///
/// Many conversions may be in flight at once; each runs on its own blocking
/// thread with no shared mutable state. Dropping a returned future abandons
/// the result but does not stop the work already started.
#[derive(Debug, Clone, Default)]
pub struct AsyncConverter {
    inner: Converter,
}

impl AsyncConverter {
    pub fn new(config: ConversionConfig) -> docwerk_core::error::Result<Self> {
        Ok(Self {
            inner: Converter::new(config)?,
        })
    }

    pub fn from_converter(inner: Converter) -> Self {
        Self { inner }
    }

    pub fn converter(&self) -> &Converter {
        &self.inner
    }

    async fn spawn(
        &self,
        operation: Operation,
        job: impl FnOnce(Converter) -> ConversionOutcome + Send + 'static,
    ) -> ConversionOutcome {
        let converter = self.inner.clone();
        match tokio::task::spawn_blocking(move || job(converter)).await {
            Ok(outcome) => outcome,
            Err(join_err) => {
                error!(%operation, error = %join_err, "Conversion task did not complete");
                Err(ConversionError::new(
                    operation,
                    DocwerkError::Task(join_err.to_string()),
                ))
            }
        }
    }

    pub async fn generate_file(
        &self,
        content: String,
        file_name: String,
        format: String,
    ) -> ConversionOutcome {
        self.spawn(Operation::GenerateFile, move |c| {
            c.generate_file(&content, &file_name, &format)
        })
        .await
    }

    pub async fn convert_docx_to_pdf(
        &self,
        source: SourceDocument,
        file_name: String,
    ) -> ConversionOutcome {
        self.spawn(Operation::DocxToPdf, move |c| {
            c.convert_docx_to_pdf(&source, &file_name)
        })
        .await
    }

    pub async fn merge_pdf_files(
        &self,
        sources: Vec<SourceDocument>,
        file_name: String,
    ) -> ConversionOutcome {
        self.spawn(Operation::MergePdf, move |c| {
            c.merge_pdf_files(&sources, &file_name)
        })
        .await
    }

    pub async fn merge_docx_files(
        &self,
        sources: Vec<SourceDocument>,
        file_name: String,
    ) -> ConversionOutcome {
        self.spawn(Operation::MergeDocx, move |c| {
            c.merge_docx_files(&sources, &file_name)
        })
        .await
    }

    pub async fn convert_images_to_pdf(
        &self,
        sources: Vec<SourceDocument>,
        file_name: String,
    ) -> ConversionOutcome {
        self.spawn(Operation::ImagesToPdf, move |c| {
            c.convert_images_to_pdf(&sources, &file_name)
        })
        .await
    }

    pub async fn resize_image(
        &self,
        source: SourceDocument,
        file_name: String,
        spec: ImageRasterSpec,
    ) -> ConversionOutcome {
        self.spawn(Operation::ResizeImage, move |c| {
            c.resize_image(&source, &file_name, &spec)
        })
        .await
    }

    pub async fn convert_pdf_to_docx(
        &self,
        source: SourceDocument,
        file_name: String,
    ) -> ConversionOutcome {
        self.spawn(Operation::PdfToDocx, move |c| {
            c.convert_pdf_to_docx(&source, &file_name)
        })
        .await
    }

    pub async fn convert_pdf_to_text(
        &self,
        source: SourceDocument,
        file_name: String,
    ) -> ConversionOutcome {
        self.spawn(Operation::PdfToText, move |c| {
            c.convert_pdf_to_text(&source, &file_name)
        })
        .await
    }
}
