// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Writes finished artifacts into a directory.

use std::path::{Path, PathBuf};

use docwerk_convert::{ArtifactSink, ConversionResult};
use docwerk_core::error::{DocwerkError, Result};
use tracing::info;

pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where `result` lands. Only the final path component of the suggested
    /// name is used, so artifacts never escape the directory.
    pub fn path_for(&self, result: &ConversionResult) -> Result<PathBuf> {
        let name = Path::new(&result.file_name)
            .file_name()
            .ok_or_else(|| {
                DocwerkError::InvalidParameter(format!(
                    "'{}' is not a usable file name",
                    result.file_name
                ))
            })?;
        Ok(self.dir.join(name))
    }
}

impl ArtifactSink for DirectorySink {
    async fn deliver(&self, result: &ConversionResult) -> Result<()> {
        let path = self.path_for(result)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, &result.bytes).await?;
        info!(
            path = %path.display(),
            bytes = result.len(),
            sha256 = %result.sha256_hex(),
            "Artifact written"
        );
        Ok(())
    }
}
