// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page layout — places wrapped lines top-to-bottom and breaks pages.
//
// All coordinates are millimetres measured from the top-left corner of the
// page; the PDF writer flips them into PDF user space.

use docwerk_core::config::{ImagePageConfig, PageLayoutConfig};
use tracing::debug;

use super::metrics::HelveticaMetrics;
use super::{split_lines, wrap_line};

/// Fixed geometry of a text page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
    pub line_height_mm: f32,
    pub font_size_pt: f32,
}

impl PageGeometry {
    pub fn from_config(config: &PageLayoutConfig) -> Self {
        let (width_mm, height_mm) = config.paper_size.dimensions_mm();
        Self {
            width_mm,
            height_mm,
            margin_mm: config.margin_mm,
            line_height_mm: config.line_height_mm,
            font_size_pt: config.font_size_pt,
        }
    }

    /// Width available to a line between the left and right margins.
    pub fn content_width_mm(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }

    /// Lowest baseline allowed on a page.
    pub fn bottom_limit_mm(&self) -> f32 {
        self.height_mm - self.margin_mm
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::from_config(&PageLayoutConfig::default())
    }
}

/// A line positioned on a page. `y_mm` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x_mm: f32,
    pub y_mm: f32,
}

/// A finished page of placed lines.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutPage {
    pub index: usize,
    pub lines: Vec<PlacedLine>,
}

/// Incremental line placement with a moving cursor.
///
/// The cursor never places a line below [`PageGeometry::bottom_limit_mm`]:
/// before each line, if the cursor has already passed that limit the current
/// page is closed and the cursor returns to the top margin.
pub struct PageLayout {
    geometry: PageGeometry,
    metrics: HelveticaMetrics,
    cursor_x: f32,
    cursor_y: f32,
    page_index: usize,
    lines: Vec<PlacedLine>,
    finished: Vec<LaidOutPage>,
}

impl PageLayout {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            metrics: HelveticaMetrics,
            cursor_x: geometry.margin_mm,
            cursor_y: geometry.margin_mm,
            page_index: 0,
            lines: Vec::new(),
            finished: Vec::new(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Current cursor position (x, y) in millimetres.
    pub fn cursor(&self) -> (f32, f32) {
        (self.cursor_x, self.cursor_y)
    }

    /// Zero-based index of the page currently being filled.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Place one already-wrapped line at the cursor.
    pub fn push_line(&mut self, text: impl Into<String>) {
        if self.cursor_y > self.geometry.bottom_limit_mm() {
            self.break_page();
        }
        self.lines.push(PlacedLine {
            text: text.into(),
            x_mm: self.cursor_x,
            y_mm: self.cursor_y,
        });
        self.cursor_y += self.geometry.line_height_mm;
    }

    /// Wrap one logical line to the content width and place the pieces.
    pub fn push_wrapped(&mut self, line: &str) {
        let wrapped = wrap_line(
            line,
            self.geometry.content_width_mm(),
            self.geometry.font_size_pt,
            &self.metrics,
        );
        for piece in wrapped {
            self.push_line(piece);
        }
    }

    fn break_page(&mut self) {
        let lines = std::mem::take(&mut self.lines);
        self.finished.push(LaidOutPage {
            index: self.page_index,
            lines,
        });
        self.page_index += 1;
        self.cursor_y = self.geometry.margin_mm;
    }

    /// Close the layout. Always yields at least one (possibly empty) page.
    pub fn finish(mut self) -> Vec<LaidOutPage> {
        let lines = std::mem::take(&mut self.lines);
        self.finished.push(LaidOutPage {
            index: self.page_index,
            lines,
        });
        self.finished
    }
}

/// Lay out free text: split on line breaks, wrap, paginate.
pub fn paginate(text: &str, geometry: PageGeometry) -> Vec<LaidOutPage> {
    let mut layout = PageLayout::new(geometry);
    for line in split_lines(text) {
        layout.push_wrapped(line);
    }
    let pages = layout.finish();
    debug!(pages = pages.len(), "Text paginated");
    pages
}

/// Where an image lands on its page, in millimetres from the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

impl ImagePlacement {
    /// Fit an image of the given natural size into the printable area.
    ///
    /// Too wide: scale by width. Still too tall: scale by height. The result
    /// is centred on the full page. Images that already fit are not enlarged.
    pub fn fit(natural_w_mm: f32, natural_h_mm: f32, page: &ImagePageConfig) -> Self {
        let (page_w, page_h) = page.paper_size.dimensions_mm();
        let max_w = page_w - 2.0 * page.margin_mm;
        let max_h = page_h - 2.0 * page.margin_mm;

        let mut width = natural_w_mm;
        let mut height = natural_h_mm;
        if width > max_w {
            height = height * max_w / width;
            width = max_w;
        }
        if height > max_h {
            width = width * max_h / height;
            height = max_h;
        }

        Self {
            x_mm: (page_w - width) / 2.0,
            y_mm: (page_h - height) / 2.0,
            width_mm: width,
            height_mm: height,
        }
    }

    /// Natural printed size of a `width_px` x `height_px` raster.
    pub fn natural_size_mm(width_px: u32, height_px: u32, pixels_per_inch: f32) -> (f32, f32) {
        let mm_per_px = 25.4 / pixels_per_inch;
        (width_px as f32 * mm_per_px, height_px as f32 * mm_per_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_sits_on_top_margin() {
        let pages = paginate("hello", PageGeometry::default());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines[0].y_mm, 20.0);
        assert_eq!(pages[0].lines[0].x_mm, 20.0);
    }

    #[test]
    fn empty_text_still_has_one_page() {
        let pages = paginate("", PageGeometry::default());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines.len(), 1);
        assert!(pages[0].lines[0].text.is_empty());
    }

    #[test]
    fn a4_page_holds_thirty_seven_lines() {
        // Baselines 20, 27, ... 272 fit under 277; 279 does not.
        let text = vec!["line"; 38].join("\n");
        let pages = paginate(&text, PageGeometry::default());
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines.len(), 37);
        assert_eq!(pages[1].lines.len(), 1);
        assert_eq!(pages[1].lines[0].y_mm, 20.0);
        assert_eq!(pages[1].index, 1);
    }

    #[test]
    fn no_line_below_bottom_limit() {
        let geometry = PageGeometry::default();
        let text = "word ".repeat(4000);
        let pages = paginate(&text, geometry);
        assert!(pages.len() > 1);
        for page in &pages {
            for line in &page.lines {
                assert!(line.y_mm <= geometry.bottom_limit_mm());
            }
        }
    }

    #[test]
    fn cursor_advances_by_line_height() {
        let mut layout = PageLayout::new(PageGeometry::default());
        layout.push_line("a");
        layout.push_line("b");
        assert_eq!(layout.cursor(), (20.0, 34.0));
        assert_eq!(layout.page_index(), 0);
    }

    #[test]
    fn wide_image_is_scaled_by_width_then_centred() {
        let page = ImagePageConfig::default();
        let placement = ImagePlacement::fit(380.0, 100.0, &page);
        assert!((placement.width_mm - 190.0).abs() < 1e-3);
        assert!((placement.height_mm - 50.0).abs() < 1e-3);
        assert!((placement.x_mm - 10.0).abs() < 1e-3);
        assert!((placement.y_mm - 123.5).abs() < 1e-3);
    }

    #[test]
    fn tall_image_is_scaled_by_height() {
        let page = ImagePageConfig::default();
        let placement = ImagePlacement::fit(100.0, 554.0, &page);
        assert!((placement.height_mm - 277.0).abs() < 1e-3);
        assert!((placement.width_mm - 50.0).abs() < 1e-3);
        assert!((placement.x_mm - 80.0).abs() < 1e-3);
    }

    #[test]
    fn small_image_keeps_natural_size() {
        let page = ImagePageConfig::default();
        let placement = ImagePlacement::fit(50.0, 40.0, &page);
        assert_eq!((placement.width_mm, placement.height_mm), (50.0, 40.0));
    }

    #[test]
    fn natural_size_uses_pixel_density() {
        let (w, h) = ImagePlacement::natural_size_mm(96, 192, 96.0);
        assert!((w - 25.4).abs() < 1e-4);
        assert!((h - 50.8).abs() < 1e-4);
    }
}
