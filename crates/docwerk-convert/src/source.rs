// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source documents handed to the converters.

use std::path::Path;

use docwerk_core::DocumentType;
use docwerk_core::error::Result;
use tracing::debug;

/// Raw input bytes plus the caller's type declaration.
///
/// The declared MIME type is authoritative when it names a known type;
/// otherwise the file name's extension is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    file_name: String,
    mime_type: Option<String>,
    bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Read a file. The MIME type is left undeclared.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(file = %path.display(), bytes = bytes.len(), "Source read");
        Ok(Self::new(file_name, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Declared type, falling back to the file extension.
    pub fn document_type(&self) -> Option<DocumentType> {
        self.mime_type
            .as_deref()
            .and_then(DocumentType::from_mime)
            .or_else(|| {
                Path::new(&self.file_name)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(DocumentType::from_extension)
            })
    }

    /// How the input described itself, for error messages.
    pub fn declared_type(&self) -> String {
        if let Some(mime) = &self.mime_type {
            return mime.clone();
        }
        match Path::new(&self.file_name).extension() {
            Some(ext) => format!(".{}", ext.to_string_lossy()),
            None => "unknown type".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_wins_over_extension() {
        let doc = SourceDocument::new("scan.pdf", vec![]).with_mime_type("image/png");
        assert_eq!(doc.document_type(), Some(DocumentType::Png));
    }

    #[test]
    fn unknown_mime_falls_back_to_extension() {
        let doc = SourceDocument::new("Report.DOCX", vec![1])
            .with_mime_type("application/octet-stream");
        assert_eq!(doc.document_type(), Some(DocumentType::Docx));
        assert_eq!(doc.declared_type(), "application/octet-stream");
    }

    #[test]
    fn no_declaration_at_all() {
        let doc = SourceDocument::new("README", vec![]);
        assert_eq!(doc.document_type(), None);
        assert_eq!(doc.declared_type(), "unknown type");
        assert!(doc.is_empty());
    }

    #[tokio::test]
    async fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        tokio::fs::write(&path, b"hello").await.unwrap();
        let doc = SourceDocument::from_path(&path).await.unwrap();

        assert_eq!(doc.bytes(), b"hello");
        assert_eq!(doc.file_name(), "notes.txt");
        assert_eq!(doc.document_type(), Some(DocumentType::PlainText));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = SourceDocument::from_path("/definitely/not/here.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, docwerk_core::DocwerkError::Io(_)));
    }
}
