// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX reader — paragraph text and basic emphasis from a WordprocessingML
// package, using `zip` and `quick-xml`.
//
// Tables, images and most styling are dropped. Paragraphs inside table cells
// are still emitted in document order.

use std::io::{Cursor, Read, Seek};

use docwerk_core::error::{DocwerkError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, instrument};
use zip::ZipArchive;

use super::{CORE_PART, DOCUMENT_PART};
use crate::layout::{ParagraphBlock, RunStyle};
use crate::text::ExtractedText;

/// A decoded DOCX document.
#[derive(Debug, Clone, Default)]
pub struct DocxReader {
    paragraphs: Vec<ParagraphBlock>,
    title: Option<String>,
}

impl DocxReader {
    /// Decode a DOCX package held in memory.
    ///
    /// Fails with `UnsupportedFormat` when the bytes are not a ZIP archive or
    /// carry no main document part, and with `DecodeFailure` when that part is
    /// not well-formed XML.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data)).map_err(|err| {
            DocwerkError::UnsupportedFormat(format!("not a DOCX package (ZIP error: {err})"))
        })?;

        let xml = read_part(&mut archive, DOCUMENT_PART)?.ok_or_else(|| {
            DocwerkError::UnsupportedFormat(format!("not a DOCX package (no {DOCUMENT_PART})"))
        })?;
        let paragraphs = parse_document(&xml)?;

        // Metadata is optional; a broken core part does not fail the document.
        let title = read_part(&mut archive, CORE_PART)
            .ok()
            .flatten()
            .and_then(|core| parse_title(&core));

        debug!(paragraphs = paragraphs.len(), ?title, "DOCX decoded");
        Ok(Self { paragraphs, title })
    }

    pub fn paragraphs(&self) -> &[ParagraphBlock] {
        &self.paragraphs
    }

    pub fn into_paragraphs(self) -> Vec<ParagraphBlock> {
        self.paragraphs
    }

    /// Title from the core properties, if present and non-blank.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Paragraph text joined with line breaks.
    pub fn extract_text(&self) -> ExtractedText {
        let text = self
            .paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        ExtractedText::new(text)
    }
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(err) => {
            return Err(DocwerkError::decode("DOCX", format!("cannot open {name}: {err}")));
        }
    };
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|err| DocwerkError::decode("DOCX", format!("cannot read {name}: {err}")))?;
    Ok(Some(content))
}

/// Whether a toggle property such as `<w:b/>` is on. `w:val="0"` and
/// `w:val="false"` switch it off.
fn toggle_is_on(element: &BytesStart) -> bool {
    !matches!(
        attribute(element, "val").as_deref(),
        Some("0") | Some("false") | Some("off")
    )
}

fn attribute(element: &BytesStart, name: &str) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name.as_bytes())
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Paragraph under construction.
#[derive(Default)]
struct ParagraphState {
    block: ParagraphBlock,
    /// Style of the run being read.
    run_style: RunStyle,
    /// The first non-empty run has fixed the paragraph style.
    styled: bool,
    /// Finished paragraphs nested inside this one (text boxes), in order.
    nested: Vec<ParagraphBlock>,
}

impl ParagraphState {
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.styled {
            self.block.style = self.run_style.clone();
            self.styled = true;
        }
        self.block.text.push_str(text);
    }
}

/// Emit a finished paragraph after its enclosing one, or at the top level.
fn close_paragraph(
    open: &mut [ParagraphState],
    paragraphs: &mut Vec<ParagraphBlock>,
    block: ParagraphBlock,
    nested: Vec<ParagraphBlock>,
) {
    let target = match open.last_mut() {
        Some(parent) => &mut parent.nested,
        None => paragraphs,
    };
    target.push(block);
    target.extend(nested);
}

fn parse_document(xml: &str) -> Result<Vec<ParagraphBlock>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    // Text boxes nest whole paragraphs inside a run of the outer one.
    let mut open: Vec<ParagraphState> = Vec::new();
    let mut run_depth = 0_usize;
    let mut text_depth = 0_usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => open.push(ParagraphState::default()),
                b"r" => {
                    run_depth += 1;
                    if let Some(p) = open.last_mut() {
                        p.run_style = RunStyle::default();
                    }
                }
                b"t" => text_depth += 1,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"p" => {
                close_paragraph(&mut open, &mut paragraphs, ParagraphBlock::empty(), Vec::new());
            }
            Ok(Event::Empty(ref e)) => {
                let in_run = run_depth > 0;
                if let Some(p) = open.last_mut() {
                    match e.local_name().as_ref() {
                        b"b" if in_run => p.run_style.bold = toggle_is_on(e),
                        b"i" if in_run => p.run_style.italic = toggle_is_on(e),
                        b"color" if in_run => {
                            p.run_style.color = attribute(e, "val").filter(|val| val != "auto");
                        }
                        b"tab" if in_run => p.push_text("\t"),
                        b"br" | b"cr" if in_run => p.push_text("\n"),
                        b"pageBreakBefore" if !in_run => {
                            p.block.page_break_before = toggle_is_on(e);
                        }
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(ref e)) if text_depth > 0 => {
                let text = e.unescape().map_err(|err| {
                    DocwerkError::decode("DOCX", format!("bad character data: {err}"))
                })?;
                if let Some(p) = open.last_mut() {
                    p.push_text(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(p) = open.pop() {
                        close_paragraph(&mut open, &mut paragraphs, p.block, p.nested);
                    }
                }
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => text_depth = text_depth.saturating_sub(1),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(DocwerkError::decode(
                    "DOCX",
                    format!("XML error at byte {}: {err}", reader.buffer_position()),
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

/// `dc:title` from the core properties part.
fn parse_title(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut in_title = false;
    let mut title = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"title" => in_title = true,
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"title" => in_title = false,
            Ok(Event::Text(ref e)) if in_title => {
                title.push_str(&e.unescape().ok()?);
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::DocxWriter;
    use docwerk_core::config::DocxConfig;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn package(document_xml: &str) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    fn body(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{inner}</w:body></w:document>"#
        )
    }

    #[test]
    fn not_a_zip_is_unsupported() {
        let err = DocxReader::from_bytes(b"plain text").unwrap_err();
        assert!(matches!(err, DocwerkError::UnsupportedFormat(_)));
    }

    #[test]
    fn zip_without_document_is_unsupported() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("other.txt", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"x").unwrap();
        let bytes = zip.finish().unwrap().into_inner();
        let err = DocxReader::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, DocwerkError::UnsupportedFormat(_)));
    }

    #[test]
    fn malformed_xml_is_a_decode_failure() {
        let bytes = package("<w:document><w:body><w:p></w:body>");
        let err = DocxReader::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, DocwerkError::DecodeFailure { format: "DOCX", .. }));
    }

    #[test]
    fn paragraphs_tabs_breaks_and_tables() {
        let xml = body(concat!(
            r#"<w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:t xml:space="preserve"> world</w:t></w:r></w:p>"#,
            r#"<w:p/>"#,
            r#"<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>"#,
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        ));
        let reader = DocxReader::from_bytes(&package(&xml)).unwrap();
        let texts: Vec<&str> = reader.paragraphs().iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello world", "", "a\tb\nc", "cell"]);
        assert_eq!(reader.extract_text().text, "Hello world\n\na\tb\nc\ncell");
    }

    #[test]
    fn first_non_empty_run_sets_style() {
        let xml = body(concat!(
            r#"<w:p><w:pPr><w:rPr><w:i/></w:rPr></w:pPr>"#,
            r#"<w:r><w:rPr><w:b/></w:rPr><w:t></w:t></w:r>"#,
            r#"<w:r><w:rPr><w:b w:val="0"/><w:color w:val="00FF00"/></w:rPr><w:t>green</w:t></w:r>"#,
            r#"<w:r><w:rPr><w:b/></w:rPr><w:t> bold</w:t></w:r></w:p>"#,
        ));
        let reader = DocxReader::from_bytes(&package(&xml)).unwrap();
        let block = &reader.paragraphs()[0];
        assert_eq!(block.text, "green bold");
        assert!(!block.style.bold);
        assert!(!block.style.italic);
        assert_eq!(block.style.color.as_deref(), Some("00FF00"));
    }

    #[test]
    fn text_box_paragraph_keeps_the_outer_one() {
        let xml = body(concat!(
            r#"<w:p><w:r><w:t>outer</w:t></w:r>"#,
            r#"<w:r><w:pict><w:txbxContent><w:p><w:r><w:t>inner</w:t></w:r></w:p></w:txbxContent></w:pict></w:r>"#,
            r#"<w:r><w:t xml:space="preserve"> tail</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>next</w:t></w:r></w:p>"#,
        ));
        let reader = DocxReader::from_bytes(&package(&xml)).unwrap();
        let texts: Vec<&str> = reader.paragraphs().iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["outer tail", "inner", "next"]);
    }

    #[test]
    fn escaped_text_is_unescaped() {
        let xml = body(r#"<w:p><w:r><w:t>a &amp; b &lt;c&gt;</w:t></w:r></w:p>"#);
        let reader = DocxReader::from_bytes(&package(&xml)).unwrap();
        assert_eq!(reader.paragraphs()[0].text, "a & b <c>");
    }

    #[test]
    fn writer_output_reads_back() {
        let blocks = vec![
            ParagraphBlock::new("Title line"),
            ParagraphBlock::empty(),
            ParagraphBlock::new("  indented\tand tabbed"),
        ];
        let mut writer = DocxWriter::new(&DocxConfig::default());
        writer.set_title("Round");
        let bytes = writer.write(&blocks).unwrap();

        let reader = DocxReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.title(), Some("Round"));
        let texts: Vec<&str> = reader.paragraphs().iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["Title line", "", "  indented\tand tabbed"]);
    }
}
