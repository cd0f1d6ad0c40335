//! Extraction from PDF files written with lopdf, one text object per cell.

use std::path::Path;

use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use pretty_assertions::assert_eq;

use uytcab_core::{
    DocumentSource, ExtractionError, ExtractionResult, LocatorConfig, PdfExtractor, SeriesExtractor,
    UytcabError,
};

/// Text placed at (x, y) on the page.
type Placed<'a> = (i64, i64, &'a str);

fn utf16(text: &str) -> Object {
    let bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_be_bytes).collect();
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Write a one-page PDF with a UCS-2 font so Japanese text decodes as-is.
fn write_pdf(path: &Path, placed: &[Placed]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "HeiseiKakuGo-W5",
        "Encoding" => "UniGB-UCS2-H",
    });

    let mut operations = Vec::new();
    for &(x, y, text) in placed {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
        operations.push(Operation::new("Td", vec![x.into(), y.into()]));
        operations.push(Operation::new("Tj", vec![utf16(text)]));
        operations.push(Operation::new("ET", vec![]));
    }
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

fn forecast_report(value: Option<&str>) -> Vec<Placed<'_>> {
    let mut placed = vec![
        (50, 800, "デイリーシグナル 2024年9月30日"),
        (50, 700, "x"),
        (150, 700, "当社需給予想"),
        (250, 700, "y"),
        (50, 680, "財政"),
        (250, 680, "z"),
        (150, 660, "10月3日"),
    ];
    if let Some(value) = value {
        placed.push((150, 680, value));
    }
    placed
}

#[test]
fn report_pdf_yields_dated_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ds241001.pdf");
    write_pdf(&path, &forecast_report(Some("▲1,234")));

    let extractor = SeriesExtractor::from_config(&LocatorConfig::default());
    let result = extractor.extract_file(&path).unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 10, 3).unwrap();
    assert_eq!(result, ExtractionResult::new(date, -1234));
}

#[test]
fn report_pdf_without_value_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ds241002.pdf");
    write_pdf(&path, &forecast_report(None));

    let extractor = SeriesExtractor::from_config(&LocatorConfig::default());
    let result = extractor.extract_file(&path);

    assert!(matches!(
        result,
        Err(UytcabError::Extraction(ExtractionError::NotFound(_)))
    ));
}

#[test]
fn cells_drawn_separately_form_one_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.pdf");
    write_pdf(
        &path,
        &[
            (50, 700, "Item"),
            (150, 700, "Forecast"),
            (250, 700, "Prev"),
            (50, 680, "Fiscal"),
            (150, 680, "-1,234"),
            (250, 680, "99"),
        ],
    );

    let mut extractor = PdfExtractor::new();
    extractor.load(&std::fs::read(&path).unwrap()).unwrap();
    let grids = extractor.page_grids(1).unwrap();

    let cell = |s: &str| Some(s.to_string());
    assert_eq!(grids.len(), 1);
    assert_eq!(
        grids[0].rows(),
        &[
            vec![cell("Item"), cell("Forecast"), cell("Prev")],
            vec![cell("Fiscal"), cell("-1,234"), cell("99")],
        ]
    );
}

#[test]
fn publication_date_read_from_first_page_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dated.pdf");
    write_pdf(&path, &forecast_report(Some("1")));

    let doc = uytcab_core::Document::<PdfExtractor>::open(&path).unwrap();
    assert_eq!(
        doc.publication_date(),
        NaiveDate::from_ymd_opt(2024, 9, 30)
    );
}
