// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Best-effort JPEG size search. Lowers quality first, then dimensions.

use docwerk_core::config::ResizeSearchConfig;
use docwerk_core::error::Result;
use tracing::{debug, info, warn};

use super::processor::ImageProcessor;

/// Result of a size search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionOutcome {
    pub bytes: Vec<u8>,
    pub quality: u8,
    pub width: u32,
    pub height: u32,
    /// Whether `bytes` fits under the requested ceiling.
    pub met_target: bool,
}

impl CompressionOutcome {
    fn smaller(self, other: Self) -> Self {
        if other.bytes.len() < self.bytes.len() {
            other
        } else {
            self
        }
    }
}

/// Encode `processor` as JPEG at `quality`, searching for a buffer of at most
/// `target_bytes`.
///
/// 1. Encode at the requested quality.
/// 2. Step quality down to the configured floor.
/// 3. Shrink dimensions from `scale_start` to `scale_floor`, encoding at
///    `fallback_quality`.
///
/// The first buffer under the ceiling wins. If none fits, the smallest buffer
/// seen is returned with `met_target == false`. Without a ceiling the first
/// encode is returned as is.
pub fn encode_to_target(
    processor: &ImageProcessor,
    quality: u8,
    target_bytes: Option<usize>,
    search: &ResizeSearchConfig,
) -> Result<CompressionOutcome> {
    let quality = quality.clamp(1, 100);
    let encode = |image: &ImageProcessor, quality: u8| -> Result<CompressionOutcome> {
        let bytes = image.to_jpeg_bytes(quality)?;
        let met_target = target_bytes.is_none_or(|limit| bytes.len() <= limit);
        Ok(CompressionOutcome {
            bytes,
            quality,
            width: image.width(),
            height: image.height(),
            met_target,
        })
    };

    let first = encode(processor, quality)?;
    let Some(limit) = target_bytes else {
        return Ok(first);
    };
    if first.met_target {
        return Ok(first);
    }
    info!(
        limit,
        initial = first.bytes.len(),
        "Searching for a smaller encoding"
    );
    let mut best = first;

    let mut current = quality;
    while search.quality_step > 0 && current > search.quality_floor {
        current = current
            .saturating_sub(search.quality_step)
            .max(search.quality_floor);
        let candidate = encode(processor, current)?;
        debug!(quality = current, bytes = candidate.bytes.len(), "Quality step");
        if candidate.met_target {
            return Ok(candidate);
        }
        best = best.smaller(candidate);
    }

    for factor in scale_factors(search) {
        let shrunk = processor.scaled(factor);
        let candidate = encode(&shrunk, search.fallback_quality)?;
        debug!(factor, bytes = candidate.bytes.len(), "Scale step");
        if candidate.met_target {
            return Ok(candidate);
        }
        best = best.smaller(candidate);
    }

    warn!(
        limit,
        smallest = best.bytes.len(),
        "Target size not reached, returning smallest encoding"
    );
    Ok(best)
}

/// `scale_start`, `scale_start - scale_step`, ... down to `scale_floor`.
fn scale_factors(search: &ResizeSearchConfig) -> Vec<f32> {
    if search.scale_step <= 0.0 {
        return Vec::new();
    }
    // Small epsilon so 0.9 - 6 * 0.1 still reaches a 0.3 floor.
    let steps = ((search.scale_start - search.scale_floor) / search.scale_step + 1e-4).floor();
    (0..=steps.max(0.0) as u32)
        .map(|i| search.scale_start - i as f32 * search.scale_step)
        .collect()
}
