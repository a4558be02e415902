//! 一括取り込みテスト
//!
//! rust_xlsxwriter で作成した複数シートのワークブックを calamine で読み込み、
//! 集計シートのスキップ・重複判定・照合結果を検証

use rust_xlsxwriter::Workbook;
use snomed_mapper::error::MapperError;
use snomed_mapper::workbook::ExcelSource;
use snomed_mapper_common::{
    ingest, ingest_and_match, CellValue, IngestOptions, ReferenceEntry, ReferenceIndex, SkipReason,
};
use std::path::Path;
use tempfile::tempdir;

/// テスト用ワークブックを書き出す
fn write_workbook(path: &Path, sheets: &[(&str, Vec<&str>, Vec<Vec<CellValue>>)]) {
    let mut workbook = Workbook::new();
    for (name, headers, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (col, header) in headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header).unwrap();
        }
        for (r, row) in rows.iter().enumerate() {
            let r = (r + 1) as u32;
            for (col, value) in row.iter().enumerate() {
                let col = col as u16;
                match value {
                    CellValue::Text(s) => {
                        worksheet.write_string(r, col, s.as_str()).unwrap();
                    }
                    CellValue::Number(n) => {
                        worksheet.write_number(r, col, *n).unwrap();
                    }
                    CellValue::Bool(b) => {
                        worksheet.write_boolean(r, col, *b).unwrap();
                    }
                    CellValue::Empty => {}
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

fn text(s: &str) -> CellValue {
    CellValue::text(s)
}

fn number(n: f64) -> CellValue {
    CellValue::Number(n)
}

/// SUMMARY・料金シート2枚・名称列のないシート
fn tariff_workbook(path: &Path) {
    write_workbook(
        path,
        &[
            (
                "SUMMARY",
                vec!["TARIFF NAME", "PRICE"],
                vec![vec![text("Totals"), number(9999.0)]],
            ),
            (
                "Consultations",
                vec!["TARIFF NAME", "PRICE", "CODE"],
                vec![
                    vec![text("GP Visit"), number(100.0), text("C1")],
                    vec![text("Specialist Visit"), number(250.0), text("C2")],
                    vec![text("gp  visit"), number(100.0), text("C3")],
                ],
            ),
            ("Notes", vec!["COMMENT"], vec![vec![text("reviewed")]]),
            (
                "Drugs",
                vec!["TARIFF NAME", "PRICE"],
                vec![
                    vec![text("Paracetamol 500 MG"), text("1,000")],
                    vec![text("Paracetamol 500mg"), number(1000.0)],
                ],
            ),
        ],
    );
}

fn reference_index() -> ReferenceIndex {
    ReferenceIndex::build(vec![
        ReferenceEntry::new("gp visit", text("11429006"), text("Consultation")),
        ReferenceEntry::new("specialist visit", text("11429007"), text("Specialist consultation")),
        ReferenceEntry::new("paracetamol 500mg", number(10001.0), text("Paracetamol")),
    ])
    .unwrap()
}

#[test]
fn test_ingest_workbook() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("tariffs.xlsx");
    tariff_workbook(&path);

    let mut source = ExcelSource::open(&path).unwrap();
    let outcome = ingest(&mut source, &IngestOptions::default()).unwrap();

    assert_eq!(outcome.total_rows, 5);
    assert_eq!(outcome.duplicated_rows, 1);
    assert_eq!(outcome.duplicate_flags, vec![true, false, false, false, false]);

    let names: Vec<&str> = outcome.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "gp visit",
            "specialist visit",
            "gp visit",
            "paracetamol 500 mg",
            "paracetamol 500mg",
        ]
    );

    // カンマ付きの価格文字列も数値化
    assert_eq!(outcome.records[3].price, Some(1000.0));
    assert_eq!(outcome.records[3].sheet_type, "Drugs");
    assert_eq!(outcome.records[0].column("CODE"), Some(&text("C1")));

    assert_eq!(outcome.skipped_sheets.len(), 2);
    assert_eq!(outcome.skipped_sheets[0].sheet, "SUMMARY");
    assert_eq!(outcome.skipped_sheets[0].reason, SkipReason::Summary);
    assert_eq!(outcome.skipped_sheets[1].sheet, "Notes");
    assert_eq!(outcome.skipped_sheets[1].reason, SkipReason::MissingNameColumn);
}

#[test]
fn test_ingest_and_match_workbook() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("tariffs.xlsx");
    tariff_workbook(&path);

    let mut source = ExcelSource::open(&path).unwrap();
    let report = ingest_and_match(&mut source, &reference_index(), &IngestOptions::default()).unwrap();

    assert_eq!(report.records.len(), 5);
    assert_eq!(report.total_rows, 5);
    assert_eq!(report.duplicated_rows, 1);

    let first = &report.records[0];
    assert!(first.duplicate);
    assert_eq!(first.matched.matched_name, "gp visit");
    assert_eq!(first.matched.snomed_code, "11429006");
    assert!((first.matched.similarity_score - 1.0).abs() < 1e-9);

    // 数字と単位が分かれていても同じトークンになる
    let paracetamol = &report.records[3];
    assert_eq!(paracetamol.matched.matched_name, "paracetamol 500mg");
    assert_eq!(paracetamol.matched.snomed_code, "10001");
    assert!((paracetamol.matched.similarity_score - 1.0).abs() < 1e-9);

    for record in &report.records {
        let score = record.matched.similarity_score;
        assert!((0.0..=1.0).contains(&score));
    }
}

#[test]
fn test_ingest_custom_options() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("tariffs.xlsx");
    write_workbook(
        &path,
        &[
            ("TOTALS", vec!["SERVICE"], vec![vec![text("all")]]),
            ("Lab", vec!["SERVICE", "COST"], vec![vec![text("Full Blood Count"), number(40.0)]]),
        ],
    );

    let options = IngestOptions {
        summary_sheet: "TOTALS".into(),
        name_column: "SERVICE".into(),
        price_column: "COST".into(),
    };
    let mut source = ExcelSource::open(&path).unwrap();
    let outcome = ingest(&mut source, &options).unwrap();

    assert_eq!(outcome.total_rows, 1);
    assert_eq!(outcome.records[0].name, "full blood count");
    assert_eq!(outcome.records[0].price, Some(40.0));
    assert_eq!(outcome.skipped_sheets[0].reason, SkipReason::Summary);
}

#[test]
fn test_no_valid_sheets() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("tariffs.xlsx");
    write_workbook(
        &path,
        &[
            ("SUMMARY", vec!["TARIFF NAME"], vec![vec![text("Totals")]]),
            ("Notes", vec!["Tariff Name"], vec![vec![text("case differs")]]),
        ],
    );

    let mut source = ExcelSource::open(&path).unwrap();
    let err: MapperError = ingest(&mut source, &IngestOptions::default())
        .unwrap_err()
        .into();

    assert!(matches!(
        err,
        MapperError::Common(snomed_mapper_common::Error::NoValidSheets { .. })
    ));
}

#[test]
fn test_from_bytes_matches_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("tariffs.xlsx");
    tariff_workbook(&path);

    let bytes = std::fs::read(&path).unwrap();
    let mut source = ExcelSource::from_bytes(bytes).unwrap();
    let outcome = ingest(&mut source, &IngestOptions::default()).unwrap();

    assert_eq!(outcome.total_rows, 5);
    assert_eq!(outcome.duplicated_rows, 1);
}

#[test]
fn test_blank_row_inside_sheet_is_counted() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("tariffs.xlsx");
    write_workbook(
        &path,
        &[(
            "Consultations",
            vec!["TARIFF NAME", "PRICE"],
            vec![
                vec![text("GP Visit"), number(100.0)],
                vec![],
                vec![text("X-Ray"), number(50.0)],
            ],
        )],
    );

    let mut source = ExcelSource::open(&path).unwrap();
    let outcome = ingest(&mut source, &IngestOptions::default()).unwrap();

    assert_eq!(outcome.total_rows, 3);
    let names: Vec<&str> = outcome.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["gp visit", "", "x-ray"]);
    assert_eq!(outcome.duplicated_rows, 0);
}
