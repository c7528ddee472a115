// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output delivery — finished artifacts and the sinks that persist them.
//
// The converters never touch the filesystem. A caller that wants files on disk
// (or anywhere else) hands results to an `ArtifactSink`.

use std::future::Future;
use std::sync::Arc;

use docwerk_core::OutputFormat;
use docwerk_core::error::Result;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

/// A finished artifact. Ownership passes to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ConversionResult {
    pub fn new(file_name: String, format: OutputFormat, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            mime_type: format.mime_type().to_string(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercase hex SHA-256 of the artifact bytes.
    pub fn sha256_hex(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        hex::encode(hasher.finalize())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Destination for finished artifacts.
pub trait ArtifactSink {
    fn deliver(&self, result: &ConversionResult) -> impl Future<Output = Result<()>> + Send;
}

/// Keeps delivered artifacts in memory. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    delivered: Arc<Mutex<Vec<ConversionResult>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything delivered so far, in delivery order.
    pub async fn delivered(&self) -> Vec<ConversionResult> {
        self.delivered.lock().await.clone()
    }
}

impl ArtifactSink for MemorySink {
    async fn deliver(&self, result: &ConversionResult) -> Result<()> {
        self.delivered.lock().await.push(result.clone());
        Ok(())
    }
}
