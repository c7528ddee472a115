// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open existing PDF documents, recover their text, and merge
// them, using the `lopdf` crate.
//
// Text recovery is approximate: it follows the text-positioning operators of
// each page's content stream and starts a new line whenever the baseline moves
// by more than a threshold. Glyph widths are not consulted.

use std::collections::BTreeMap;

use docwerk_core::error::{DocwerkError, Result};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use tracing::{debug, info, instrument, warn};

use super::encoding::decode_pdf_string;
use crate::text::ExtractedText;

/// `TJ` adjustment (thousandths of an em) above which a word space is assumed.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Guard against malformed page trees whose /Parent chain loops.
const MAX_TREE_DEPTH: usize = 64;

/// Nesting limit when copying a page's object graph during a merge.
const MAX_COPY_DEPTH: usize = 256;

/// A string drawn at a text-space position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// Reads existing PDF files.
///
/// Wraps `lopdf::Document` and provides the higher-level operations the
/// converters need: page counting, text recovery and merging.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            DocwerkError::decode("PDF", format!("failed to load PDF from memory: {err}"))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    // -- Text -----------------------------------------------------------------

    /// Positioned text runs of one page (1-indexed), in content-stream order.
    pub fn page_runs(&self, page_number: u32) -> Result<Vec<TextRun>> {
        let pages = self.document.get_pages();
        let page_id = *pages.get(&page_number).ok_or_else(|| {
            DocwerkError::decode(
                "PDF",
                format!(
                    "page {page_number} out of range (document has {} pages)",
                    pages.len()
                ),
            )
        })?;

        let bytes = self.document.get_page_content(page_id).map_err(|err| {
            DocwerkError::decode("PDF", format!("page {page_number} content: {err}"))
        })?;
        let content = Content::decode(&bytes).map_err(|err| {
            DocwerkError::decode("PDF", format!("page {page_number} operators: {err}"))
        })?;

        let mut state = TextState::default();
        let mut runs = Vec::new();

        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "BT" => state.begin_text(),
                "Tm" if operands.len() >= 6 => {
                    let m: Vec<f32> = operands.iter().take(6).map(number_or_zero).collect();
                    state.set_matrix([m[0], m[1], m[2], m[3], m[4], m[5]]);
                }
                "Td" if operands.len() >= 2 => {
                    state.move_line(number_or_zero(&operands[0]), number_or_zero(&operands[1]));
                }
                "TD" if operands.len() >= 2 => {
                    let ty = number_or_zero(&operands[1]);
                    state.leading = -ty;
                    state.move_line(number_or_zero(&operands[0]), ty);
                }
                "TL" if !operands.is_empty() => state.leading = number_or_zero(&operands[0]),
                "T*" => state.next_line(),
                "Tj" => {
                    if let Some(text) = operands.first().and_then(string_operand) {
                        runs.push(state.run(text));
                    }
                }
                "'" => {
                    state.next_line();
                    if let Some(text) = operands.first().and_then(string_operand) {
                        runs.push(state.run(text));
                    }
                }
                "\"" => {
                    state.next_line();
                    if let Some(text) = operands.get(2).and_then(string_operand) {
                        runs.push(state.run(text));
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = operands.first() {
                        runs.push(state.run(join_tj_array(items)));
                    }
                }
                _ => {}
            }
        }

        Ok(runs)
    }

    /// Recover the document's text.
    ///
    /// Consecutive runs whose baselines differ by more than
    /// `line_break_threshold` text-space units go on separate lines; runs on
    /// the same baseline are joined. Page boundaries are line breaks and
    /// trailing whitespace is trimmed from every line.
    #[instrument(skip(self), fields(pages = self.page_count()))]
    pub fn extract_text(&self, line_break_threshold: f32) -> Result<ExtractedText> {
        let page_numbers: Vec<u32> = self.document.get_pages().keys().copied().collect();
        let mut lines: Vec<String> = Vec::new();

        for page_number in &page_numbers {
            let runs = self.page_runs(*page_number)?;
            let mut current = String::new();
            let mut last_y: Option<f32> = None;

            for run in runs {
                if let Some(y) = last_y
                    && (run.y - y).abs() > line_break_threshold
                {
                    lines.push(current.trim_end().to_string());
                    current.clear();
                }
                current.push_str(&run.text);
                last_y = Some(run.y);
            }

            if last_y.is_some() {
                lines.push(current.trim_end().to_string());
            }
        }

        let text = lines.join("\n");
        info!(
            pages = page_numbers.len(),
            lines = lines.len(),
            chars = text.len(),
            "PDF text extracted"
        );
        Ok(ExtractedText::new(text).with_page_count(page_numbers.len()))
    }

    // -- Merge ----------------------------------------------------------------

    /// Merge PDF byte-slices into one new document. Pages appear in input
    /// order, each source keeping its own page order.
    #[instrument(skip_all, fields(documents = sources.len()))]
    pub fn merge(sources: &[&[u8]]) -> Result<Vec<u8>> {
        let readers = sources
            .iter()
            .enumerate()
            .map(|(index, bytes)| {
                Document::load_mem(bytes)
                    .map(|document| PdfReader { document })
                    .map_err(|err| {
                        DocwerkError::decode("PDF", format!("input #{}: {err}", index + 1))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            total_pages = readers.iter().map(PdfReader::page_count).sum::<usize>(),
            "Merging PDFs"
        );

        let mut merged = Document::with_version("1.5");
        let pages_id = merged.new_object_id();
        let mut kids: Vec<Object> = Vec::new();

        for reader in &readers {
            // Object ids are per source; one map per document.
            let mut copied: BTreeMap<ObjectId, ObjectId> = BTreeMap::new();
            for page_id in reader.document.get_pages().into_values() {
                let new_id = copy_page(&reader.document, &mut merged, page_id, pages_id, &mut copied)?;
                kids.push(Object::Reference(new_id));
            }
        }

        let count = kids.len() as i64;
        merged.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = merged.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        merged.trailer.set("Root", catalog_id);

        let mut output = Vec::new();
        merged.save_to(&mut output).map_err(|err| {
            DocwerkError::encode("PDF", format!("failed to serialise merged PDF: {err}"))
        })?;

        debug!(pages = count, output_bytes = output.len(), "Merge complete");
        Ok(output)
    }
}

// -- Text state ---------------------------------------------------------------

/// Text and line matrices of a text object, plus the leading used by `T*`.
#[derive(Debug, Clone, Copy)]
struct TextState {
    matrix: [f32; 6],
    line_matrix: [f32; 6],
    leading: f32,
}

const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: IDENTITY,
            line_matrix: IDENTITY,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn begin_text(&mut self) {
        self.matrix = IDENTITY;
        self.line_matrix = IDENTITY;
    }

    fn set_matrix(&mut self, m: [f32; 6]) {
        self.matrix = m;
        self.line_matrix = m;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        let [a, b, c, d, e, f] = self.line_matrix;
        self.line_matrix = [a, b, c, d, e + tx * a + ty * c, f + tx * b + ty * d];
        self.matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn run(&self, text: String) -> TextRun {
        TextRun {
            x: self.matrix[4],
            y: self.matrix[5],
            text,
        }
    }
}

fn number_or_zero(object: &Object) -> f32 {
    match object {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r as f32,
        _ => 0.0,
    }
}

fn string_operand(object: &Object) -> Option<String> {
    match object {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// Concatenate the strings of a `TJ` array, inserting a space for large
/// negative adjustments.
fn join_tj_array(items: &[Object]) -> String {
    let mut combined = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => combined.push_str(&decode_pdf_string(bytes)),
            Object::Integer(_) | Object::Real(_) => {
                let adjustment = -number_or_zero(item);
                if adjustment > TJ_SPACE_THRESHOLD
                    && !combined.is_empty()
                    && !combined.ends_with(' ')
                {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }
    combined
}

// -- Page copying -------------------------------------------------------------

/// Copy one page and everything it references from `source` into `target`,
/// parented to `pages_id`. Attributes the page inherits are copied onto it.
fn copy_page(
    source: &Document,
    target: &mut Document,
    page_id: ObjectId,
    pages_id: ObjectId,
    copied: &mut BTreeMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let page = source.get_dictionary(page_id).map_err(|err| {
        DocwerkError::decode("PDF", format!("cannot read page object {page_id:?}: {err}"))
    })?;

    // An earlier page may already have pulled this one in through a link
    // annotation; the page is rebuilt under that id. Otherwise reserve the id
    // first so annotations pointing back at the page resolve.
    let new_page_id = match copied.get(&page_id) {
        Some(existing) => *existing,
        None => {
            let id = target.new_object_id();
            copied.insert(page_id, id);
            id
        }
    };

    let mut new_page = copy_dictionary(source, target, page, copied, 0)?;
    for key in INHERITABLE_KEYS {
        if new_page.has(key) {
            continue;
        }
        if let Some(value) = inherited_attribute(source, page, key) {
            new_page.set(key.to_vec(), deep_copy(source, target, value, copied, 1)?);
        }
    }

    new_page.set("Parent", Object::Reference(pages_id));
    target
        .objects
        .insert(new_page_id, Object::Dictionary(new_page));
    Ok(new_page_id)
}

/// Nearest ancestor value of an inheritable page attribute.
fn inherited_attribute<'a>(
    source: &'a Document,
    page: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if depth >= MAX_TREE_DEPTH {
            warn!(?node_id, "Page tree too deep, giving up on inheritance");
            return None;
        }
        let node = source.get_dictionary(node_id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }
    None
}

/// Deep-copy an object, following references. Each source object is copied at
/// most once per document; later references reuse the first copy, which also
/// terminates reference cycles. `/Parent` entries are dropped so the source
/// page tree is not pulled in. Graphs nested deeper than [`MAX_COPY_DEPTH`]
/// are rejected.
fn deep_copy(
    source: &Document,
    target: &mut Document,
    object: &Object,
    copied: &mut BTreeMap<ObjectId, ObjectId>,
    depth: usize,
) -> Result<Object> {
    if depth > MAX_COPY_DEPTH {
        return Err(DocwerkError::decode(
            "PDF",
            format!("object graph nested deeper than {MAX_COPY_DEPTH} levels"),
        ));
    }

    Ok(match object {
        Object::Reference(ref_id) => {
            if let Some(existing) = copied.get(ref_id) {
                return Ok(Object::Reference(*existing));
            }
            match source.get_object(*ref_id) {
                Ok(referenced) => {
                    let new_id = target.new_object_id();
                    copied.insert(*ref_id, new_id);
                    let cloned = deep_copy(source, target, referenced, copied, depth + 1)?;
                    target.objects.insert(new_id, cloned);
                    Object::Reference(new_id)
                }
                Err(err) => {
                    warn!(?ref_id, %err, "Cannot resolve reference, using Null");
                    Object::Null
                }
            }
        }
        Object::Dictionary(dict) => {
            Object::Dictionary(copy_dictionary(source, target, dict, copied, depth + 1)?)
        }
        Object::Array(items) => Object::Array(
            items
                .iter()
                .map(|item| deep_copy(source, target, item, copied, depth + 1))
                .collect::<Result<Vec<_>>>()?,
        ),
        Object::Stream(stream) => {
            let dict = copy_dictionary(source, target, &stream.dict, copied, depth + 1)?;
            Object::Stream(lopdf::Stream::new(dict, stream.content.clone()))
        }
        other => other.clone(),
    })
}

fn copy_dictionary(
    source: &Document,
    target: &mut Document,
    dict: &Dictionary,
    copied: &mut BTreeMap<ObjectId, ObjectId>,
    depth: usize,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        if key == b"Parent" {
            continue;
        }
        new_dict.set(key.clone(), deep_copy(source, target, value, copied, depth)?);
    }
    Ok(new_dict)
}
