// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decode, resize, JPEG encode, and target-size search.

pub mod compress;
pub mod processor;

pub use compress::{CompressionOutcome, encode_to_target};
pub use processor::ImageProcessor;
