//! Integration tests for result rendering and export.

use std::fs;
use std::time::Duration;

use calamine::{open_workbook_auto, Reader, Sheets};
use tempfile::tempdir;
use urlrecon::cli::OutputFormat;
use urlrecon::output::{
    export_items, write_result, write_url_column, xlsx::SHEET_NAME, ExportFormat, RunSummary,
};
use urlrecon::recon::{reconcile, ComparisonProfile, ReconciliationResult, ResultSection};

fn sample() -> (ReconciliationResult, RunSummary) {
    let first: Vec<String> = ["https://ex.com/", "http://ex.com/page", "https://ex.com/x"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    let second: Vec<String> = ["https://ex.com/", "http://ex.com/pag", "https://zz.org/y"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    let profile = ComparisonProfile::new(90.0, 99.0).unwrap();
    let result = reconcile(&first, &second, &profile);
    let summary = RunSummary::new("custom", profile, 1000, Duration::from_millis(5));
    (result, summary)
}

fn render(format: OutputFormat) -> String {
    let (result, summary) = sample();
    let mut out = Vec::new();
    write_result(&mut out, format, &result, &summary, false).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_text_output() {
    let text = render(OutputFormat::Text);
    assert!(text.contains("Matching items (total: 1)\n  https://ex.com/\n"));
    assert!(text.contains("Only in first list (total: 2)"));
    assert!(text.contains("Only in second list (total: 2)"));
    assert!(text.contains("http://ex.com/page - http://ex.com/pag (94.44%)"));
    assert!(text.contains("Profile custom [90%, 99%) collect-all, 5 ms"));
}

#[test]
fn test_json_output() {
    let json = render(OutputFormat::Json);
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["matching"], serde_json::json!(["https://ex.com/"]));
    assert_eq!(value["summary"]["counts"]["unique_to_first"], 2);
    assert_eq!(value["summary"]["profile_name"], "custom");
    assert_eq!(value["summary"]["counts"]["partial_matches"], 2);
    assert_eq!(value["partial_matches"][0]["first"], "http://ex.com/page");
}

#[test]
fn test_csv_output() {
    let csv = render(OutputFormat::Csv);
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["section", "item", "matched_with", "score"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    let partial: Vec<&csv::StringRecord> = rows.iter().filter(|r| &r[0] == "partial").collect();
    assert!(!partial.is_empty());
    assert_eq!(&partial[0][1], "http://ex.com/page");
    assert_eq!(&partial[0][2], "http://ex.com/pag");
    assert_eq!(&partial[0][3], "94.44");
}

#[test]
fn test_export_combined_file() {
    let (result, _) = sample();
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.csv");

    let combined = result.combine(&[ResultSection::UniqueFirst, ResultSection::UniqueSecond]);
    write_url_column(fs::File::create(&path).unwrap(), &combined).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("URL"));
    assert_eq!(
        lines.collect::<Vec<_>>(),
        vec![
            "http://ex.com/page",
            "https://ex.com/x",
            "http://ex.com/pag",
            "https://zz.org/y",
        ]
    );
}

#[test]
fn test_export_format_follows_extension() {
    let (result, _) = sample();
    let combined = result.combine(&[ResultSection::Matching, ResultSection::Partial]);
    let dir = tempdir().unwrap();

    let csv_path = dir.path().join("combined.csv");
    assert_eq!(
        export_items(&csv_path, &combined).unwrap(),
        ExportFormat::Csv
    );
    let content = fs::read_to_string(&csv_path).unwrap();
    assert!(content.starts_with("URL\nhttps://ex.com/\n"));

    let xlsx_path = dir.path().join("combined.XLSX");
    assert_eq!(
        export_items(&xlsx_path, &combined).unwrap(),
        ExportFormat::Xlsx
    );
    let mut workbook: Sheets<_> = open_workbook_auto(&xlsx_path).unwrap();
    let range = workbook.worksheet_range(SHEET_NAME).unwrap();
    let cells: Vec<String> = range.rows().map(|row| row[0].to_string()).collect();
    assert_eq!(cells[0], "URL");
    assert_eq!(&cells[1..], combined.as_slice());
}
