// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Docwerk conversion pipeline.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DocwerkError;

/// Unique identifier for a single conversion request (used for log correlation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversionId(pub Uuid);

impl ConversionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConversionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supported input document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    Docx,
    PlainText,
    Jpeg,
    Png,
    Gif,
    Bmp,
    Webp,
    Tiff,
}

/// MIME type of Office Open XML word-processing packages.
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

impl DocumentType {
    /// Canonical MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => DOCX_MIME,
            Self::PlainText => "text/plain",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Webp => "image/webp",
            Self::Tiff => "image/tiff",
        }
    }

    /// Whether this is a raster image type.
    pub fn is_image(&self) -> bool {
        matches!(
            self,
            Self::Jpeg | Self::Png | Self::Gif | Self::Bmp | Self::Webp | Self::Tiff
        )
    }

    /// Infer document type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" | "text" => Some(Self::PlainText),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "webp" => Some(Self::Webp),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Infer document type from a declared MIME type. Parameters such as
    /// `;charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(Self::Pdf),
            DOCX_MIME => Some(Self::Docx),
            "text/plain" => Some(Self::PlainText),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/bmp" => Some(Self::Bmp),
            "image/webp" => Some(Self::Webp),
            "image/tiff" => Some(Self::Tiff),
            _ => None,
        }
    }
}

/// Target format of a generated artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Txt,
    Pdf,
    Docx,
    Jpeg,
}

impl OutputFormat {
    /// File extension (without the dot) used for suggested file names.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Jpeg => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Txt => "text/plain;charset=utf-8",
            Self::Pdf => DocumentType::Pdf.mime_type(),
            Self::Docx => DOCX_MIME,
            Self::Jpeg => DocumentType::Jpeg.mime_type(),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = DocwerkError;

    /// Parse a text-generation format tag (`txt`, `pdf` or `docx`).
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "txt" => Ok(Self::Txt),
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            _ => Err(DocwerkError::UnsupportedFormat(tag.to_string())),
        }
    }
}

/// The conversion operations exposed by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    GenerateFile,
    DocxToPdf,
    MergePdf,
    MergeDocx,
    ImagesToPdf,
    ResizeImage,
    PdfToDocx,
    PdfToText,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GenerateFile => "generate-file",
            Self::DocxToPdf => "docx-to-pdf",
            Self::MergePdf => "merge-pdf",
            Self::MergeDocx => "merge-docx",
            Self::ImagesToPdf => "images-to-pdf",
            Self::ResizeImage => "resize-image",
            Self::PdfToDocx => "pdf-to-docx",
            Self::PdfToText => "pdf-to-text",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    Letter,
    Legal,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::A5 => (148.0, 210.0),
            Self::Letter => (215.9, 279.4),
            Self::Legal => (215.9, 355.6),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

/// Largest output side, in pixels, a resize may request or derive.
pub const MAX_IMAGE_SIDE_PX: u32 = 16_384;

/// Largest output area, in pixels, a resize may produce.
pub const MAX_IMAGE_PIXELS: u64 = 100_000_000;

/// Requested output raster for an image resize.
///
/// `width` and `height` are optional; when only one is given the other is
/// derived from the source aspect ratio. `target_size_kb` enables the
/// best-effort size search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRasterSpec {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// JPEG quality, 1-100.
    pub quality: u8,
    pub target_size_kb: Option<u32>,
}

impl Default for ImageRasterSpec {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            quality: 80,
            target_size_kb: None,
        }
    }
}

impl ImageRasterSpec {
    /// Resolve the output dimensions for a source of `source_w` x `source_h`.
    pub fn resolve_dimensions(&self, source_w: u32, source_h: u32) -> Result<(u32, u32), DocwerkError> {
        if source_w == 0 || source_h == 0 {
            return Err(DocwerkError::InvalidParameter(format!(
                "source image has degenerate size {source_w}x{source_h}"
            )));
        }
        if self.width == Some(0) || self.height == Some(0) {
            return Err(DocwerkError::InvalidParameter(
                "width and height must be positive".into(),
            ));
        }

        let derive = |given: u32, given_src: u32, other_src: u32| -> f64 {
            (f64::from(other_src) * f64::from(given) / f64::from(given_src))
                .round()
                .max(1.0)
        };

        let (width, height) = match (self.width, self.height) {
            (Some(w), Some(h)) => (f64::from(w), f64::from(h)),
            (Some(w), None) => (f64::from(w), derive(w, source_w, source_h)),
            (None, Some(h)) => (derive(h, source_h, source_w), f64::from(h)),
            (None, None) => return Ok((source_w, source_h)),
        };

        let max_side = f64::from(MAX_IMAGE_SIDE_PX);
        if width > max_side || height > max_side || width * height > MAX_IMAGE_PIXELS as f64 {
            return Err(DocwerkError::InvalidParameter(format!(
                "output size {width}x{height} exceeds the {MAX_IMAGE_SIDE_PX}px side \
                 and {MAX_IMAGE_PIXELS} pixel limits"
            )));
        }
        // Both sides are within u32 after the check above.
        Ok((width as u32, height as u32))
    }

    /// Target ceiling in bytes, if one was requested.
    pub fn target_bytes(&self) -> Option<usize> {
        self.target_size_kb.map(|kb| kb as usize * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_wins_over_parameters() {
        assert_eq!(
            DocumentType::from_mime("text/plain;charset=utf-8"),
            Some(DocumentType::PlainText)
        );
        assert_eq!(DocumentType::from_mime(DOCX_MIME), Some(DocumentType::Docx));
        assert_eq!(DocumentType::from_mime("application/msword"), None);
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(DocumentType::from_extension("JPG"), Some(DocumentType::Jpeg));
        assert!(DocumentType::from_extension("png").unwrap().is_image());
        assert!(!DocumentType::Pdf.is_image());
    }

    #[test]
    fn unknown_format_tag_is_unsupported() {
        assert_eq!("PDF".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        let err = "rtf".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, DocwerkError::UnsupportedFormat(tag) if tag == "rtf"));
    }

    #[test]
    fn width_only_preserves_aspect_ratio() {
        let spec = ImageRasterSpec {
            width: Some(400),
            ..Default::default()
        };
        assert_eq!(spec.resolve_dimensions(1000, 750).unwrap(), (400, 300));
        // 133.2 rounds down, 133.6 rounds up
        assert_eq!(spec.resolve_dimensions(1000, 333).unwrap().1, 133);
        assert_eq!(spec.resolve_dimensions(1000, 334).unwrap().1, 134);
    }

    #[test]
    fn height_only_preserves_aspect_ratio() {
        let spec = ImageRasterSpec {
            height: Some(50),
            ..Default::default()
        };
        assert_eq!(spec.resolve_dimensions(300, 200).unwrap(), (75, 50));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let spec = ImageRasterSpec {
            width: Some(0),
            ..Default::default()
        };
        assert!(spec.resolve_dimensions(10, 10).is_err());
    }

    #[test]
    fn oversized_output_is_rejected() {
        let huge = ImageRasterSpec {
            width: Some(4_000_000_000),
            ..Default::default()
        };
        let err = huge.resolve_dimensions(2, 1).unwrap_err();
        assert!(matches!(err, DocwerkError::InvalidParameter(_)));

        // A modest width on a very tall source derives an oversized height.
        let derived = ImageRasterSpec {
            width: Some(1_000),
            ..Default::default()
        };
        assert!(derived.resolve_dimensions(10, 1_000).is_err());

        let area = ImageRasterSpec {
            width: Some(MAX_IMAGE_SIDE_PX),
            height: Some(MAX_IMAGE_SIDE_PX),
            ..Default::default()
        };
        assert!(area.resolve_dimensions(10, 10).is_err());

        let at_limit = ImageRasterSpec {
            width: Some(MAX_IMAGE_SIDE_PX),
            height: Some(1),
            ..Default::default()
        };
        assert_eq!(
            at_limit.resolve_dimensions(10, 10).unwrap(),
            (MAX_IMAGE_SIDE_PX, 1)
        );
    }

    #[test]
    fn target_size_in_bytes() {
        let spec = ImageRasterSpec {
            target_size_kb: Some(50),
            ..Default::default()
        };
        assert_eq!(spec.target_bytes(), Some(51_200));
    }
}
