// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX writer — package paragraph blocks as a minimal WordprocessingML file.

use std::io::{Cursor, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use docwerk_core::config::DocxConfig;
use docwerk_core::error::{DocwerkError, Result};
use tracing::{debug, info, instrument};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::xml::XmlPart;
use super::{CORE_PART, DOCUMENT_PART, NS_R, NS_W};
use crate::layout::ParagraphBlock;

const TWIPS_PER_MM: f32 = 1440.0 / 25.4;

const CONTENT_TYPES: &str = "[Content_Types].xml";
const PACKAGE_RELS: &str = "_rels/.rels";

/// Creates DOCX packages from paragraph blocks.
pub struct DocxWriter {
    config: DocxConfig,
    title: Option<String>,
    created: Option<DateTime<Utc>>,
}

impl DocxWriter {
    pub fn new(config: &DocxConfig) -> Self {
        Self {
            config: config.clone(),
            title: None,
            created: None,
        }
    }

    /// Set the title stored in the core properties.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Fix the creation timestamp instead of using the current time.
    pub fn set_created(&mut self, created: DateTime<Utc>) {
        self.created = Some(created);
    }

    /// Serialise `blocks` into a complete package. One paragraph per block.
    #[instrument(skip(self, blocks), fields(paragraphs = blocks.len()))]
    pub fn write(&self, blocks: &[ParagraphBlock]) -> Result<Vec<u8>> {
        info!("Creating DOCX");

        let parts = [
            (CONTENT_TYPES, content_types()?),
            (PACKAGE_RELS, package_relationships()?),
            (DOCUMENT_PART, self.document_xml(blocks)?),
            (CORE_PART, self.core_xml()?),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, data) in &parts {
            zip.start_file(*name, options).map_err(zip_error)?;
            zip.write_all(data)?;
        }
        let output = zip.finish().map_err(zip_error)?.into_inner();

        debug!(output_bytes = output.len(), "DOCX package written");
        Ok(output)
    }

    fn document_xml(&self, blocks: &[ParagraphBlock]) -> Result<Vec<u8>> {
        let mut xml = XmlPart::new()?;
        xml.start("w:document", &[("xmlns:w", NS_W), ("xmlns:r", NS_R)])?;
        xml.start("w:body", &[])?;

        let size = self.config.font_size_half_points.to_string();
        for block in blocks {
            write_paragraph(&mut xml, block, &size)?;
        }

        let (width_mm, height_mm) = self.config.paper_size.dimensions_mm();
        let page_w = ((width_mm * TWIPS_PER_MM).round() as u32).to_string();
        let page_h = ((height_mm * TWIPS_PER_MM).round() as u32).to_string();
        let margin = self.config.margin_twips.to_string();

        xml.start("w:sectPr", &[])?;
        xml.empty(
            "w:pgSz",
            &[("w:w", page_w.as_str()), ("w:h", page_h.as_str())],
        )?;
        xml.empty(
            "w:pgMar",
            &[
                ("w:top", margin.as_str()),
                ("w:right", margin.as_str()),
                ("w:bottom", margin.as_str()),
                ("w:left", margin.as_str()),
                ("w:header", "720"),
                ("w:footer", "720"),
                ("w:gutter", "0"),
            ],
        )?;
        xml.end("w:sectPr")?;

        xml.end("w:body")?;
        xml.end("w:document")?;
        Ok(xml.finish())
    }

    fn core_xml(&self) -> Result<Vec<u8>> {
        let created = self
            .created
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut xml = XmlPart::new()?;
        xml.start(
            "cp:coreProperties",
            &[
                (
                    "xmlns:cp",
                    "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
                ),
                ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
                ("xmlns:dcterms", "http://purl.org/dc/terms/"),
                ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
            ],
        )?;
        if let Some(title) = &self.title {
            xml.element("dc:title", &[], title)?;
        }
        xml.element("dc:creator", &[], "Docwerk")?;
        xml.element("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &created)?;
        xml.element("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")], &created)?;
        xml.end("cp:coreProperties")?;
        Ok(xml.finish())
    }
}

fn zip_error(err: zip::result::ZipError) -> DocwerkError {
    DocwerkError::encode("DOCX", format!("ZIP write failed: {err}"))
}

fn content_types() -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start(
        "Types",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/package/2006/content-types",
        )],
    )?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            (
                "ContentType",
                "application/vnd.openxmlformats-package.relationships+xml",
            ),
        ],
    )?;
    xml.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;
    xml.empty(
        "Override",
        &[
            ("PartName", "/word/document.xml"),
            (
                "ContentType",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
            ),
        ],
    )?;
    xml.empty(
        "Override",
        &[
            ("PartName", "/docProps/core.xml"),
            (
                "ContentType",
                "application/vnd.openxmlformats-package.core-properties+xml",
            ),
        ],
    )?;
    xml.end("Types")?;
    Ok(xml.finish())
}

fn package_relationships() -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start(
        "Relationships",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/package/2006/relationships",
        )],
    )?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rId1"),
            (
                "Type",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument",
            ),
            ("Target", "word/document.xml"),
        ],
    )?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rId2"),
            (
                "Type",
                "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
            ),
            ("Target", "docProps/core.xml"),
        ],
    )?;
    xml.end("Relationships")?;
    Ok(xml.finish())
}

/// `<w:p>` for one block. Tabs become `<w:tab/>`, line breaks `<w:br/>`.
fn write_paragraph(xml: &mut XmlPart, block: &ParagraphBlock, size: &str) -> Result<()> {
    if block.is_empty() && !block.page_break_before {
        return xml.empty("w:p", &[]);
    }

    xml.start("w:p", &[])?;
    if block.page_break_before {
        xml.start("w:pPr", &[])?;
        xml.empty("w:pageBreakBefore", &[])?;
        xml.end("w:pPr")?;
    }

    if !block.is_empty() {
        xml.start("w:r", &[])?;
        xml.start("w:rPr", &[])?;
        if block.style.bold {
            xml.empty("w:b", &[])?;
        }
        if block.style.italic {
            xml.empty("w:i", &[])?;
        }
        if let Some(color) = &block.style.color {
            xml.empty("w:color", &[("w:val", color.as_str())])?;
        }
        xml.empty("w:sz", &[("w:val", size)])?;
        xml.empty("w:szCs", &[("w:val", size)])?;
        xml.end("w:rPr")?;

        let mut segment = String::new();
        for c in block.text.chars() {
            match c {
                '\t' | '\n' => {
                    write_text(xml, &mut segment)?;
                    xml.empty(if c == '\t' { "w:tab" } else { "w:br" }, &[])?;
                }
                // XML 1.0 cannot carry other control characters.
                c if c.is_control() => {}
                c => segment.push(c),
            }
        }
        write_text(xml, &mut segment)?;
        xml.end("w:r")?;
    }

    xml.end("w:p")
}

fn write_text(xml: &mut XmlPart, segment: &mut String) -> Result<()> {
    if segment.is_empty() {
        return Ok(());
    }
    xml.element("w:t", &[("xml:space", "preserve")], segment)?;
    segment.clear();
    Ok(())
}
