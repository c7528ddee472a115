// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — create new PDF documents from laid-out text or images using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use docwerk_core::config::{ConversionConfig, ImagePageConfig};
use docwerk_core::error::{DocwerkError, Result};
use image::DynamicImage;
use printpdf::{
    BuiltinFont, DictItem, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt,
    RawImage, RawImageData, RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

use super::encoding::encode_winansi;
use crate::layout::{ImagePlacement, LaidOutPage, PageGeometry};

/// Creates new PDF documents from paginated text or raster images.
pub struct PdfWriter {
    /// Text page geometry (paper, margins, line height, font size).
    geometry: PageGeometry,
    /// Image page geometry.
    image_page: ImagePageConfig,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    /// Create a writer from the page sections of a conversion config.
    pub fn new(config: &ConversionConfig) -> Self {
        Self {
            geometry: PageGeometry::from_config(&config.page),
            image_page: config.image_page.clone(),
            title: None,
        }
    }

    /// Create a writer with default A4 geometry.
    pub fn a4() -> Self {
        Self::new(&ConversionConfig::default())
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    // -- Text to PDF ----------------------------------------------------------

    /// Encode one laid-out page as a printpdf page.
    ///
    /// Every line must be representable in the base-14 font encoding; the
    /// first line that is not fails the page with `EncodeFailure`. Blank
    /// lines are drawn as a single space so that text extraction sees them.
    pub fn encode_page(&self, page: &LaidOutPage) -> Result<PdfPage> {
        let geometry = &self.geometry;
        let mut ops: Vec<Op> = Vec::with_capacity(page.lines.len() * 5);

        for line in &page.lines {
            let bytes = if line.text.is_empty() {
                vec![b' ']
            } else {
                encode_winansi(&line.text)?
            };

            // Layout measures from the top; PDF user space starts at the bottom.
            let x_pt = Mm(line.x_mm).into_pt().0;
            let y_pt = Mm(geometry.height_mm - line.y_mm).into_pt().0;

            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(x_pt),
                    y: Pt(y_pt),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(geometry.font_size_pt),
                font: BuiltinFont::Helvetica,
            });
            // Registers Helvetica in the page resources; draws nothing.
            ops.push(Op::WriteTextBuiltinFont {
                items: Vec::new(),
                font: BuiltinFont::Helvetica,
            });
            ops.push(Op::Unknown {
                key: "Tj".into(),
                value: vec![DictItem::String {
                    data: bytes,
                    literal: false,
                }],
            });
            ops.push(Op::EndTextSection);
        }

        Ok(PdfPage::new(
            Mm(geometry.width_mm),
            Mm(geometry.height_mm),
            ops,
        ))
    }

    /// Append one laid-out page to a page list.
    pub fn append_page(&self, pages: &mut Vec<PdfPage>, page: &LaidOutPage) -> Result<()> {
        pages.push(self.encode_page(page)?);
        Ok(())
    }

    /// Serialise laid-out pages into a complete PDF.
    #[instrument(skip(self, pages), fields(pages = pages.len()))]
    pub fn create_from_pages(&self, pages: &[LaidOutPage]) -> Result<Vec<u8>> {
        let title = self.title.as_deref().unwrap_or("Docwerk Document");
        info!(title, "Creating text PDF");

        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len().max(1));
        for page in pages {
            self.append_page(&mut pdf_pages, page)?;
        }

        // A document always has at least one page.
        if pdf_pages.is_empty() {
            pdf_pages.push(PdfPage::new(
                Mm(self.geometry.width_mm),
                Mm(self.geometry.height_mm),
                Vec::new(),
            ));
        }

        debug!(pages = pdf_pages.len(), "Text layout encoded");

        let mut doc = PdfDocument::new(title);
        doc.with_pages(pdf_pages);

        // Text is written as raw `Tj` operators, which a secure save drops.
        let options = PdfSaveOptions {
            secure: false,
            ..PdfSaveOptions::default()
        };
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&options, &mut warnings);
        Ok(output)
    }

    // -- Images to PDF --------------------------------------------------------

    /// Create a PDF with one page per image, in the given order.
    ///
    /// Each image is shrunk to fit within the page margins while preserving
    /// its aspect ratio, then centred on the page.
    #[instrument(skip(self, images), fields(images = images.len()))]
    pub fn create_from_images(&self, images: &[DynamicImage]) -> Result<Vec<u8>> {
        if images.is_empty() {
            return Err(DocwerkError::NotEnoughInputs {
                required: 1,
                supplied: 0,
            });
        }

        let title = self.title.as_deref().unwrap_or("Docwerk Images");
        info!(title, "Creating image PDF");

        let (page_w, page_h) = self.image_page.paper_size.dimensions_mm();
        let dpi = self.image_page.pixels_per_inch;
        let mut doc = PdfDocument::new(title);
        let mut pages: Vec<PdfPage> = Vec::with_capacity(images.len());

        for (index, image) in images.iter().enumerate() {
            let img_width = image.width() as usize;
            let img_height = image.height() as usize;

            // printpdf takes RGB8 pixel data; alpha is dropped.
            let rgb_image = image.to_rgb8();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb_image.into_raw()),
                width: img_width,
                height: img_height,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let (natural_w, natural_h) =
                ImagePlacement::natural_size_mm(image.width(), image.height(), dpi);
            let placement = ImagePlacement::fit(natural_w, natural_h, &self.image_page);
            let scale = placement.width_mm / natural_w;

            // Translation is to the image's bottom-left corner in PDF space.
            let x_pt = Mm(placement.x_mm).into_pt().0;
            let y_pt = Mm(page_h - placement.y_mm - placement.height_mm).into_pt().0;

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(x_pt)),
                    translate_y: Some(Pt(y_pt)),
                    scale_x: Some(scale),
                    scale_y: Some(scale),
                    dpi: Some(dpi),
                    rotate: None,
                },
            }];

            debug!(
                index,
                width_mm = placement.width_mm,
                height_mm = placement.height_mm,
                scale,
                "Image placed on page"
            );
            pages.push(PdfPage::new(Mm(page_w), Mm(page_h), ops));
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{PlacedLine, paginate};
    use crate::pdf::PdfReader;
    use image::{Rgb, RgbImage};

    #[test]
    fn text_pdf_has_header_and_pages() {
        let writer = PdfWriter::a4();
        let pages = paginate("Hello\nWorld", *writer.geometry());
        let bytes = writer.create_from_pages(&pages).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn page_count_follows_layout() {
        let writer = PdfWriter::a4();
        let text = vec!["row"; 80].join("\n");
        let pages = paginate(&text, *writer.geometry());
        assert_eq!(pages.len(), 3);
        let bytes = writer.create_from_pages(&pages).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn accented_text_is_written_as_winansi() {
        let writer = PdfWriter::a4();
        let pages = paginate("caf\u{00E9} na\u{00EF}ve \u{20AC}5", *writer.geometry());
        let bytes = writer.create_from_pages(&pages).unwrap();
        let text = PdfReader::from_bytes(&bytes).unwrap().extract_text(5.0).unwrap();
        assert_eq!(text.text, "caf\u{00E9} na\u{00EF}ve \u{20AC}5");
    }

    #[test]
    fn unencodable_line_fails_the_page() {
        let writer = PdfWriter::a4();
        let page = LaidOutPage {
            index: 0,
            lines: vec![PlacedLine {
                text: "\u{4E2D}\u{6587}".into(),
                x_mm: 20.0,
                y_mm: 20.0,
            }],
        };
        let err = writer.encode_page(&page).unwrap_err();
        assert!(matches!(err, DocwerkError::EncodeFailure { format: "PDF", .. }));
    }

    #[test]
    fn one_page_per_image() {
        let writer = PdfWriter::a4();
        let images: Vec<DynamicImage> = (0..3)
            .map(|i| DynamicImage::ImageRgb8(RgbImage::from_pixel(40 + i, 30, Rgb([200, 10, 10]))))
            .collect();
        let bytes = writer.create_from_images(&images).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn no_images_is_rejected() {
        let writer = PdfWriter::a4();
        assert!(matches!(
            writer.create_from_images(&[]),
            Err(DocwerkError::NotEnoughInputs { required: 1, .. })
        ));
    }
}
