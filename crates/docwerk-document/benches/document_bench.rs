// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the docwerk-document crate: text layout, PDF
// encoding, and PDF text recovery on a synthetic multi-page document.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use docwerk_document::layout::{PageGeometry, paginate};
use docwerk_document::{PdfReader, PdfWriter};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Roughly ten A4 pages of prose with some long lines that need wrapping.
fn sample_text() -> String {
    let sentence = "The quick brown fox jumps over the lazy dog while the printer warms up. ";
    (0..300)
        .map(|i| {
            if i % 7 == 0 {
                String::new()
            } else {
                sentence.repeat(1 + i % 3)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_paginate(c: &mut Criterion) {
    let text = sample_text();
    c.bench_function("paginate (300 lines)", |b| {
        b.iter(|| black_box(paginate(black_box(&text), PageGeometry::default())));
    });
}

fn bench_text_to_pdf(c: &mut Criterion) {
    let text = sample_text();
    let writer = PdfWriter::a4();
    let pages = paginate(&text, *writer.geometry());
    c.bench_function("encode text PDF", |b| {
        b.iter(|| black_box(writer.create_from_pages(black_box(&pages))));
    });
}

fn bench_pdf_text_recovery(c: &mut Criterion) {
    let writer = PdfWriter::a4();
    let pages = paginate(&sample_text(), *writer.geometry());
    let Ok(pdf) = writer.create_from_pages(&pages) else {
        return;
    };
    c.bench_function("extract PDF text", |b| {
        b.iter(|| {
            let reader = PdfReader::from_bytes(black_box(&pdf));
            black_box(reader.and_then(|r| r.extract_text(5.0)))
        });
    });
}

criterion_group!(
    benches,
    bench_paginate,
    bench_text_to_pdf,
    bench_pdf_text_recovery
);
criterion_main!(benches);
