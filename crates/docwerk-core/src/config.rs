// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocwerkError, Result};
use crate::types::PaperSize;

/// Tunables for every conversion. All sections fall back to their defaults
/// when omitted from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub page: PageLayoutConfig,
    pub image_page: ImagePageConfig,
    pub docx: DocxConfig,
    pub pdf_text: PdfTextConfig,
    pub resize: ResizeSearchConfig,
}

/// Text page geometry for PDF output. Distances are in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayoutConfig {
    pub paper_size: PaperSize,
    /// Top, bottom, left and right margin.
    pub margin_mm: f32,
    /// Vertical advance between consecutive baselines.
    pub line_height_mm: f32,
    pub font_size_pt: f32,
}

impl Default for PageLayoutConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            margin_mm: 20.0,
            line_height_mm: 7.0,
            font_size_pt: 12.0,
        }
    }
}

/// Geometry for image pages (image → PDF).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagePageConfig {
    pub paper_size: PaperSize,
    pub margin_mm: f32,
    /// Pixel density used to derive an image's natural printed size.
    pub pixels_per_inch: f32,
}

impl Default for ImagePageConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            margin_mm: 10.0,
            pixels_per_inch: 96.0,
        }
    }
}

/// DOCX package output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocxConfig {
    pub paper_size: PaperSize,
    /// Body text size in half-points (24 = 12pt).
    pub font_size_half_points: u32,
    /// Page margin on all four sides, in twentieths of a point (1440 = 1 inch).
    pub margin_twips: u32,
}

impl Default for DocxConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            font_size_half_points: 24,
            margin_twips: 1440,
        }
    }
}

/// PDF text extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfTextConfig {
    /// Vertical distance (PDF units) between consecutive runs above which a
    /// new line is started. Approximate: PDFs carry no explicit line marks.
    pub line_break_threshold: f32,
}

impl Default for PdfTextConfig {
    fn default() -> Self {
        Self {
            line_break_threshold: 5.0,
        }
    }
}

/// Best-effort target-size search for image resize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeSearchConfig {
    pub quality_step: u8,
    pub quality_floor: u8,
    pub scale_start: f32,
    pub scale_step: f32,
    pub scale_floor: f32,
    /// JPEG quality used while shrinking dimensions.
    pub fallback_quality: u8,
}

impl Default for ResizeSearchConfig {
    fn default() -> Self {
        Self {
            quality_step: 5,
            quality_floor: 5,
            scale_start: 0.9,
            scale_step: 0.1,
            scale_floor: 0.3,
            fallback_quality: 80,
        }
    }
}

impl ConversionConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Reject values that would make layout or the size search meaningless.
    pub fn validate(&self) -> Result<()> {
        let page = &self.page;
        let (page_w, page_h) = page.paper_size.dimensions_mm();
        if page.line_height_mm <= 0.0 || page.font_size_pt <= 0.0 {
            return Err(DocwerkError::Config(
                "line height and font size must be positive".into(),
            ));
        }
        if page.margin_mm < 0.0 || 2.0 * page.margin_mm >= page_w.min(page_h) {
            return Err(DocwerkError::Config(format!(
                "text margin {}mm leaves no printable area",
                page.margin_mm
            )));
        }

        let (img_w, img_h) = self.image_page.paper_size.dimensions_mm();
        if self.image_page.margin_mm < 0.0 || 2.0 * self.image_page.margin_mm >= img_w.min(img_h)
        {
            return Err(DocwerkError::Config(format!(
                "image margin {}mm leaves no printable area",
                self.image_page.margin_mm
            )));
        }
        if self.image_page.pixels_per_inch <= 0.0 {
            return Err(DocwerkError::Config("pixels_per_inch must be positive".into()));
        }

        if self.pdf_text.line_break_threshold < 0.0 {
            return Err(DocwerkError::Config(
                "line_break_threshold must not be negative".into(),
            ));
        }

        let resize = &self.resize;
        if resize.quality_step == 0 || resize.scale_step <= 0.0 {
            return Err(DocwerkError::Config("search steps must be positive".into()));
        }
        if !(1..=100).contains(&resize.quality_floor) || !(1..=100).contains(&resize.fallback_quality)
        {
            return Err(DocwerkError::Config(
                "quality floor and fallback quality must be within 1-100".into(),
            ));
        }
        if !(resize.scale_floor > 0.0 && resize.scale_floor <= resize.scale_start && resize.scale_start <= 1.0)
        {
            return Err(DocwerkError::Config(format!(
                "scale range {}..{} is invalid",
                resize.scale_floor, resize.scale_start
            )));
        }
        Ok(())
    }
}
