// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion orchestrators — one method per operation. Each call validates its
// inputs, composes the document codecs with the layout engine and returns a
// complete artifact or a `ConversionError`. Nothing is written to disk here.

use std::sync::Arc;

use docwerk_core::error::{ConversionError, DocwerkError, Result};
use docwerk_core::{ConversionConfig, ConversionId, ImageRasterSpec, Operation, OutputFormat};
use docwerk_document::layout::{ParagraphBlock, paginate, paragraphs_from_text};
use docwerk_document::normalize::{normalize_symbols, replace_unsafe};
use docwerk_document::pdf::encoding::check_encodable;
use docwerk_document::{
    DocxReader, DocxWriter, ImageProcessor, PdfReader, PdfWriter, encode_to_target,
};
use tracing::{debug, info, info_span, warn};

use crate::delivery::ConversionResult;
use crate::source::SourceDocument;
use crate::validate::{
    output_file_name, require_all, require_count, require_docx, require_image, require_pdf,
};

/// Outcome of a single orchestrator call.
pub type ConversionOutcome = std::result::Result<ConversionResult, ConversionError>;

/// Synchronous conversion front end.
///
/// Holds only the validated, immutable configuration, so clones are cheap and
/// can be handed to worker threads.
#[derive(Debug, Clone)]
pub struct Converter {
    config: Arc<ConversionConfig>,
}

impl Converter {
    /// Validate `config` once and build a converter around it.
    pub fn new(config: ConversionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Run one operation inside a `conversion` span and tag any failure with
    /// the operation.
    fn run(
        &self,
        operation: Operation,
        convert: impl FnOnce() -> Result<ConversionResult>,
    ) -> ConversionOutcome {
        let id = ConversionId::new();
        let span = info_span!("conversion", id = %id, operation = %operation);
        let _guard = span.enter();

        match convert() {
            Ok(result) => {
                info!(
                    file = %result.file_name,
                    bytes = result.len(),
                    "Conversion complete"
                );
                Ok(result)
            }
            Err(err) => {
                warn!(error = %err, "Conversion failed");
                Err(ConversionError::new(operation, err))
            }
        }
    }

    // -- Operations -----------------------------------------------------------

    /// Generate a `txt`, `pdf` or `docx` file from free text.
    ///
    /// `txt` output is the UTF-8 encoding of `content`, unchanged.
    pub fn generate_file(&self, content: &str, file_name: &str, format: &str) -> ConversionOutcome {
        self.run(Operation::GenerateFile, || {
            let format: OutputFormat = format.parse()?;
            let name = output_file_name(file_name, "", format)?;
            let bytes = match format {
                OutputFormat::Pdf => self.text_to_pdf(content, None)?,
                OutputFormat::Docx => self.paragraphs_to_docx(&paragraphs_from_text(content), None)?,
                OutputFormat::Txt => content.as_bytes().to_vec(),
                OutputFormat::Jpeg => {
                    return Err(DocwerkError::UnsupportedFormat(format.extension().into()));
                }
            };
            Ok(ConversionResult::new(name, format, bytes))
        })
    }

    /// Re-typeset a DOCX document's text as PDF.
    pub fn convert_docx_to_pdf(&self, source: &SourceDocument, file_name: &str) -> ConversionOutcome {
        self.run(Operation::DocxToPdf, || {
            let name = output_file_name(file_name, "", OutputFormat::Pdf)?;
            require_docx(source)?;

            let docx = DocxReader::from_bytes(source.bytes())?;
            let text = docx.extract_text();
            debug!(paragraphs = docx.paragraphs().len(), "DOCX decoded");
            let bytes = self.text_to_pdf(&text.text, docx.title())?;
            Ok(ConversionResult::new(name, OutputFormat::Pdf, bytes))
        })
    }

    /// Concatenate the pages of two or more PDFs in caller order.
    pub fn merge_pdf_files(&self, sources: &[SourceDocument], file_name: &str) -> ConversionOutcome {
        self.run(Operation::MergePdf, || {
            let name = output_file_name(file_name, "", OutputFormat::Pdf)?;
            require_count(sources, 2)?;
            require_all(sources, require_pdf)?;

            let buffers: Vec<&[u8]> = sources.iter().map(SourceDocument::bytes).collect();
            let bytes = PdfReader::merge(&buffers)?;
            Ok(ConversionResult::new(name, OutputFormat::Pdf, bytes))
        })
    }

    /// Concatenate the paragraphs of two or more DOCX files in caller order.
    /// Each document after the first starts on a new page.
    pub fn merge_docx_files(&self, sources: &[SourceDocument], file_name: &str) -> ConversionOutcome {
        self.run(Operation::MergeDocx, || {
            let name = output_file_name(file_name, "_merged", OutputFormat::Docx)?;
            require_count(sources, 2)?;
            require_all(sources, require_docx)?;

            let mut merged: Vec<ParagraphBlock> = Vec::new();
            for (index, source) in sources.iter().enumerate() {
                let mut paragraphs = DocxReader::from_bytes(source.bytes())?.into_paragraphs();
                if paragraphs.is_empty() {
                    paragraphs.push(ParagraphBlock::empty());
                }
                paragraphs[0].page_break_before = index > 0;
                debug!(
                    input = index + 1,
                    file = source.file_name(),
                    paragraphs = paragraphs.len(),
                    "DOCX appended"
                );
                merged.extend(paragraphs);
            }

            let bytes = self.paragraphs_to_docx(&merged, None)?;
            Ok(ConversionResult::new(name, OutputFormat::Docx, bytes))
        })
    }

    /// Place each image on its own page, in caller order.
    pub fn convert_images_to_pdf(
        &self,
        sources: &[SourceDocument],
        file_name: &str,
    ) -> ConversionOutcome {
        self.run(Operation::ImagesToPdf, || {
            let name = output_file_name(file_name, "", OutputFormat::Pdf)?;
            require_count(sources, 1)?;
            for source in sources {
                require_image(source)?;
            }

            let images = sources
                .iter()
                .map(|source| ImageProcessor::from_bytes(source.bytes()).map(ImageProcessor::into_dynamic))
                .collect::<Result<Vec<_>>>()?;
            let bytes = PdfWriter::new(&self.config).create_from_images(&images)?;
            Ok(ConversionResult::new(name, OutputFormat::Pdf, bytes))
        })
    }

    /// Resize an image and re-encode it as JPEG, honouring an optional size
    /// ceiling on a best-effort basis.
    pub fn resize_image(
        &self,
        source: &SourceDocument,
        file_name: &str,
        spec: &ImageRasterSpec,
    ) -> ConversionOutcome {
        self.run(Operation::ResizeImage, || {
            let name = output_file_name(file_name, "", OutputFormat::Jpeg)?;
            require_image(source)?;

            let resized = ImageProcessor::from_bytes(source.bytes())?.resize_to_spec(spec)?;
            let outcome =
                encode_to_target(&resized, spec.quality, spec.target_bytes(), &self.config.resize)?;
            if !outcome.met_target {
                warn!(
                    target_kb = ?spec.target_size_kb,
                    bytes = outcome.bytes.len(),
                    "Size ceiling not met, returning smallest encoding"
                );
            }
            debug!(
                width = outcome.width,
                height = outcome.height,
                quality = outcome.quality,
                "Image resized"
            );
            Ok(ConversionResult::new(name, OutputFormat::Jpeg, outcome.bytes))
        })
    }

    /// Extract a PDF's text and write it as one DOCX paragraph per line.
    pub fn convert_pdf_to_docx(&self, source: &SourceDocument, file_name: &str) -> ConversionOutcome {
        self.run(Operation::PdfToDocx, || {
            let name = output_file_name(file_name, "", OutputFormat::Docx)?;
            require_pdf(source)?;

            let text = PdfReader::from_bytes(source.bytes())?
                .extract_text(self.config.pdf_text.line_break_threshold)?;
            let bytes = self.paragraphs_to_docx(&text.to_paragraphs(), None)?;
            Ok(ConversionResult::new(name, OutputFormat::Docx, bytes))
        })
    }

    /// Extract a PDF's text as UTF-8.
    pub fn convert_pdf_to_text(&self, source: &SourceDocument, file_name: &str) -> ConversionOutcome {
        self.run(Operation::PdfToText, || {
            let name = output_file_name(file_name, "", OutputFormat::Txt)?;
            require_pdf(source)?;

            let text = PdfReader::from_bytes(source.bytes())?
                .extract_text(self.config.pdf_text.line_break_threshold)?;
            debug!(pages = ?text.page_count, chars = text.text.len(), "PDF text extracted");
            Ok(ConversionResult::new(name, OutputFormat::Txt, text.text.into_bytes()))
        })
    }

    // -- Shared pipelines -----------------------------------------------------

    /// Normalize, paginate and encode free text as PDF.
    ///
    /// A line the PDF font cannot encode is downgraded to printable ASCII
    /// (everything else becomes `?`) instead of failing the conversion.
    fn text_to_pdf(&self, text: &str, title: Option<&str>) -> Result<Vec<u8>> {
        let mut writer = PdfWriter::new(&self.config);
        if let Some(title) = title {
            writer.set_title(title);
        }

        let normalized = normalize_symbols(text);
        let mut pages = paginate(&normalized, *writer.geometry());
        for page in &mut pages {
            for line in &mut page.lines {
                if let Err(err) = check_encodable(&line.text) {
                    warn!(page = page.index + 1, error = %err, "Replacing unencodable characters");
                    line.text = replace_unsafe(&line.text);
                }
            }
        }
        writer.create_from_pages(&pages)
    }

    fn paragraphs_to_docx(&self, blocks: &[ParagraphBlock], title: Option<&str>) -> Result<Vec<u8>> {
        let mut writer = DocxWriter::new(&self.config.docx);
        if let Some(title) = title {
            writer.set_title(title);
        }
        writer.write(blocks)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self {
            config: Arc::new(ConversionConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docwerk_core::ErrorKind;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    fn converter() -> Converter {
        Converter::new(ConversionConfig::default()).unwrap()
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 40, 40])));
        let mut out = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    fn pdf_of(text: &str) -> SourceDocument {
        let result = converter().generate_file(text, "doc", "pdf").unwrap();
        SourceDocument::new(result.file_name, result.bytes)
    }

    fn docx_of(text: &str) -> SourceDocument {
        let result = converter().generate_file(text, "doc", "docx").unwrap();
        SourceDocument::new(result.file_name, result.bytes)
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = ConversionConfig::default();
        config.page.line_height_mm = 0.0;
        assert!(Converter::new(config).is_err());
    }

    #[test]
    fn txt_is_identity() {
        let text = "Grüße\r\n\ttabs & “quotes”\n";
        let result = converter().generate_file(text, "notes", "txt").unwrap();
        assert_eq!(result.file_name, "notes.txt");
        assert_eq!(result.mime_type, "text/plain;charset=utf-8");
        assert_eq!(String::from_utf8(result.bytes).unwrap(), text);
    }

    #[test]
    fn unknown_format_tag() {
        let err = converter().generate_file("x", "notes", "rtf").unwrap_err();
        assert_eq!(err.operation, Operation::GenerateFile);
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);

        // JPEG is an output of resizing only.
        let err = converter().generate_file("x", "notes", "jpg").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = converter().generate_file("x", "  ", "txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn unencodable_text_still_produces_pdf() {
        let result = converter()
            .generate_file("plain line\n日本語 text", "mixed", "pdf")
            .unwrap();
        let text = PdfReader::from_bytes(&result.bytes)
            .unwrap()
            .extract_text(5.0)
            .unwrap();
        assert_eq!(text.text, "plain line\n??? text");
    }

    #[test]
    fn accented_text_round_trips_through_pdf() {
        let result = converter()
            .generate_file("caf\u{00E9} na\u{00EF}ve \u{20AC}5", "p", "pdf")
            .unwrap();
        let text = PdfReader::from_bytes(&result.bytes)
            .unwrap()
            .extract_text(5.0)
            .unwrap();
        assert_eq!(text.text, "caf\u{00E9} na\u{00EF}ve \u{20AC}5");
    }

    #[test]
    fn indentation_round_trips_through_pdf() {
        let result = converter()
            .generate_file("def f():\n    return  1\n\tTabbed", "code", "pdf")
            .unwrap();
        let text = PdfReader::from_bytes(&result.bytes)
            .unwrap()
            .extract_text(5.0)
            .unwrap();
        assert_eq!(text.text, "def f():\n    return  1\n    Tabbed");
    }

    #[test]
    fn docx_to_pdf_keeps_text() {
        let source = docx_of("First paragraph\nSecond paragraph");
        let result = converter().convert_docx_to_pdf(&source, "out").unwrap();
        assert_eq!(result.file_name, "out.pdf");
        let text = PdfReader::from_bytes(&result.bytes)
            .unwrap()
            .extract_text(5.0)
            .unwrap();
        assert_eq!(text.text, "First paragraph\nSecond paragraph");
    }

    #[test]
    fn docx_to_pdf_rejects_pdf_input() {
        let err = converter()
            .convert_docx_to_pdf(&pdf_of("x"), "out")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInputType);
        assert_eq!(err.operation, Operation::DocxToPdf);
    }

    #[test]
    fn merge_pdf_needs_two_inputs() {
        let err = converter()
            .merge_pdf_files(&[pdf_of("only")], "merged")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn merge_pdf_rejects_mixed_inputs() {
        let sources = vec![pdf_of("a"), SourceDocument::new("b.png", png(2, 2))];
        let err = converter().merge_pdf_files(&sources, "merged").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInputType);
    }

    #[test]
    fn merge_docx_suffixes_name_and_breaks_pages() {
        let sources = vec![docx_of("alpha\nbeta"), docx_of("gamma")];
        let result = converter().merge_docx_files(&sources, "bundle").unwrap();
        assert_eq!(result.file_name, "bundle_merged.docx");

        let merged = DocxReader::from_bytes(&result.bytes).unwrap();
        let texts: Vec<&str> = merged.paragraphs().iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn images_to_pdf_one_page_each() {
        let sources = vec![
            SourceDocument::new("wide.png", png(300, 100)),
            SourceDocument::new("tall.png", png(100, 300)),
        ];
        let result = converter().convert_images_to_pdf(&sources, "album").unwrap();
        assert_eq!(PdfReader::from_bytes(&result.bytes).unwrap().page_count(), 2);
    }

    #[test]
    fn images_to_pdf_needs_one_input() {
        let err = converter().convert_images_to_pdf(&[], "album").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn broken_image_is_a_decode_failure() {
        let sources = vec![SourceDocument::new("broken.png", b"not a png".to_vec())];
        let err = converter().convert_images_to_pdf(&sources, "album").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeFailure);
    }

    #[test]
    fn resize_outputs_jpeg_with_derived_height() {
        let source = SourceDocument::new("photo.png", png(400, 200));
        let spec = ImageRasterSpec {
            width: Some(100),
            ..Default::default()
        };
        let result = converter().resize_image(&source, "photo", &spec).unwrap();
        assert_eq!(result.file_name, "photo.jpg");
        assert_eq!(result.mime_type, "image/jpeg");

        let decoded = image::load_from_memory(&result.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (100, 50));
    }

    #[test]
    fn pdf_to_text_and_docx() {
        let source = pdf_of("line one\nline two");
        let text = converter().convert_pdf_to_text(&source, "out").unwrap();
        assert_eq!(text.file_name, "out.txt");
        assert_eq!(String::from_utf8(text.bytes).unwrap(), "line one\nline two");

        let docx = converter().convert_pdf_to_docx(&source, "out").unwrap();
        let paragraphs = DocxReader::from_bytes(&docx.bytes).unwrap().into_paragraphs();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[1].text, "line two");
    }

    #[test]
    fn error_names_the_operation() {
        let err = converter()
            .convert_pdf_to_text(&SourceDocument::new("x.pdf", b"%PDF-garbage".to_vec()), "x")
            .unwrap_err();
        assert!(err.to_string().starts_with("pdf-to-text failed"));
        assert_eq!(err.kind(), ErrorKind::DecodeFailure);
    }
}
