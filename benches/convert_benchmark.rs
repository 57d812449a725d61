//! Benchmarks for resumekit conversion performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks convert synthetic résumé PDFs built with lopdf.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Creates a résumé-like PDF with the given number of pages.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => regular, "F2" => bold },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in 0..page_count {
        let mut ops = Vec::new();
        let mut y = 740;
        for section in 0..4 {
            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new("Tf", vec!["F2".into(), 14.into()]));
            ops.push(Operation::new("Td", vec![72.into(), y.into()]));
            ops.push(Operation::new(
                "Tj",
                vec![Object::string_literal(format!("SECTION {}", section + 1))],
            ));
            ops.push(Operation::new("ET", vec![]));
            y -= 24;
            for item in 0..6 {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
                ops.push(Operation::new("Td", vec![72.into(), y.into()]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!(
                        "- Page {} item {}: delivered a measurable improvement",
                        page + 1,
                        item + 1
                    ))],
                ));
                ops.push(Operation::new("ET", vec![]));
                y -= 14;
            }
            y -= 10;
        }

        let content = Content { operations: ops };
        let Ok(encoded) = content.encode() else {
            continue;
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Benchmark PDF format detection.
fn bench_format_detection(c: &mut Criterion) {
    let pdf_data = create_test_pdf(1);
    let non_pdf_data = b"Not a PDF file at all, just random text content";

    c.bench_function("detect_valid_pdf", |b| {
        b.iter(|| resumekit::detect_format_from_bytes(black_box(&pdf_data)).unwrap());
    });

    c.bench_function("detect_non_pdf", |b| {
        b.iter(|| resumekit::detect_format_from_bytes(black_box(non_pdf_data)).is_err());
    });
}

/// Benchmark extraction, classification and the full conversion.
fn bench_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion");

    for page_count in [1, 3, 10].iter() {
        let data = create_test_pdf(*page_count);

        group.bench_function(format!("extract_{}_pages", page_count), |b| {
            b.iter(|| resumekit::extract_bytes(black_box(&data)).unwrap());
        });

        group.bench_function(format!("classify_{}_pages", page_count), |b| {
            let converter = resumekit::PdfToDocxConverter::default();
            b.iter(|| converter.classify_bytes(black_box(&data)).unwrap());
        });

        group.bench_function(format!("docx_{}_pages", page_count), |b| {
            b.iter(|| resumekit::pdf_bytes_to_docx(black_box(&data)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark builder pattern overhead.
fn bench_builder_creation(c: &mut Criterion) {
    c.bench_function("builder_creation", |b| {
        b.iter(|| {
            let _builder = resumekit::Resumekit::new()
                .lenient()
                .sequential()
                .with_page_breaks(true);
        });
    });
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_conversion,
    bench_builder_creation,
);
criterion_main!(benches);
