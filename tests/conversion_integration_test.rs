mod common;

use catalog_etl::adapters::diagnostics::DiagnosticLevel;
use catalog_etl::{EtlEngine, EtlError, RecordingDiagnostics, RowTransformer};
use common::*;
use tempfile::TempDir;

#[test]
fn test_failed_row_is_skipped_and_logged() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);

    let mut broken = lamp_row("HL-2002");
    broken.remove("item substyle 2");
    write_input(
        config.files.input.as_ref(),
        &input_header(),
        &[lamp_row("HL-2001"), broken, lamp_row("HL-2003")],
    );
    write_template(config.files.template.as_ref(), &full_template());

    let diagnostics = RecordingDiagnostics::new();
    let engine = EtlEngine::new(RowTransformer::default(), &diagnostics);
    let summary = engine.run_files(&config).unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed(), 1);

    let (header, rows) = read_output(config.files.output.as_ref());
    assert_eq!(header, full_template());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["ean13"], "084-215630122-7");
    assert_eq!(rows[1]["ean13"], "084-215630122-7");

    let errors = diagnostics.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("HL-2002"), "{}", errors[0]);
    assert!(errors[0].contains("item substyle 2"), "{}", errors[0]);
}

#[test]
fn test_log_sequence() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);
    write_input(
        config.files.input.as_ref(),
        &input_header(),
        &[lamp_row("HL-2001")],
    );
    write_template(config.files.template.as_ref(), &full_template());

    let diagnostics = RecordingDiagnostics::new();
    EtlEngine::new(RowTransformer::default(), &diagnostics)
        .run_files(&config)
        .unwrap();

    let infos = diagnostics.messages(DiagnosticLevel::Info);
    assert_eq!(infos.len(), 6, "{:?}", infos);
    assert_eq!(infos[0], "conversion started");
    assert!(infos[1].starts_with("opening input"));
    assert!(infos[2].starts_with("converting"));
    assert_eq!(infos[3], "processing item HL-2001");
    assert_eq!(infos[4], "items converted: 1");
    assert_eq!(infos[5], "conversion finished");
    assert!(diagnostics.errors().is_empty());
}

#[test]
fn test_output_columns_follow_the_template() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);
    write_input(
        config.files.input.as_ref(),
        &input_header(),
        &[lamp_row("HL-2001")],
    );
    write_template(
        config.files.template.as_ref(),
        &["product__styles", "ean13", "vendor_notes", "prop_65"],
    );

    let summary = EtlEngine::new(RowTransformer::default(), RecordingDiagnostics::new())
        .run_files(&config)
        .unwrap();
    assert_eq!(summary.processed, 1);

    let (header, rows) = read_output(config.files.output.as_ref());
    assert_eq!(header, vec!["product__styles", "ean13", "vendor_notes", "prop_65"]);
    assert_eq!(rows[0]["product__styles"], "Coastal, Transitional");
    assert_eq!(rows[0]["vendor_notes"], "");
    assert_eq!(rows[0]["prop_65"], "True");
}

#[test]
fn test_missing_header_column_skips_every_row() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);
    let header: Vec<&str> = input_header()
        .into_iter()
        .filter(|name| *name != "brand")
        .collect();
    write_input(
        config.files.input.as_ref(),
        &header,
        &[lamp_row("HL-2001"), lamp_row("HL-2002")],
    );
    write_template(config.files.template.as_ref(), &full_template());

    let diagnostics = RecordingDiagnostics::new();
    let summary = EtlEngine::new(RowTransformer::default(), &diagnostics)
        .run_files(&config)
        .unwrap();

    assert_eq!(summary.processed, 0);
    assert_eq!(summary.failed(), 2);
    // one header warning plus one entry per row
    assert_eq!(diagnostics.errors().len(), 3);

    let (header, rows) = read_output(config.files.output.as_ref());
    assert_eq!(header.len(), full_template().len());
    assert!(rows.is_empty());
}

#[test]
fn test_missing_input_file_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);
    write_template(config.files.template.as_ref(), &full_template());

    let result = EtlEngine::new(RowTransformer::default(), RecordingDiagnostics::new())
        .run_files(&config);

    match result {
        Err(e @ EtlError::IoError(_)) => assert!(e.is_fatal()),
        other => panic!("expected an IO error, got {:?}", other),
    }
    assert!(!temp_dir.path().join("formatted.csv").exists());
}

#[test]
fn test_empty_input_writes_only_the_header() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);
    write_input(config.files.input.as_ref(), &input_header(), &[]);
    write_template(config.files.template.as_ref(), &full_template());

    let summary = EtlEngine::new(RowTransformer::default(), RecordingDiagnostics::new())
        .run_files(&config)
        .unwrap();

    assert_eq!(summary.processed, 0);
    let (header, rows) = read_output(config.files.output.as_ref());
    assert_eq!(header, full_template());
    assert!(rows.is_empty());
}

#[test]
fn test_invalid_delimiter_fails_before_any_file_is_touched() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_in(&temp_dir);
    write_input(
        config.files.input.as_ref(),
        &input_header(),
        &[lamp_row("HL-2001")],
    );
    write_template(config.files.template.as_ref(), &full_template());
    config.csv.delimiter = ";;".to_string();

    let diagnostics = RecordingDiagnostics::new();
    let result = EtlEngine::new(RowTransformer::default(), &diagnostics).run_files(&config);

    match result {
        Err(EtlError::InvalidConfigValueError { field, value, .. }) => {
            assert_eq!(field, "csv.delimiter");
            assert_eq!(value, ";;");
        }
        other => panic!("expected an invalid delimiter error, got {:?}", other),
    }
    assert!(!temp_dir.path().join("formatted.csv").exists());
    assert!(!diagnostics
        .messages(DiagnosticLevel::Info)
        .iter()
        .any(|message| message.starts_with("converting")));
}

#[test]
fn test_semicolon_delimiter_is_used_for_every_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_in(&temp_dir);
    config.csv.delimiter = ";".to_string();

    let input = temp_dir.path().join("homework.csv");
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(&input)
        .unwrap();
    let header = input_header();
    let row = lamp_row("HL-2001");
    writer.write_record(&header).unwrap();
    writer
        .write_record(header.iter().map(|name| row[name].as_str()))
        .unwrap();
    writer.flush().unwrap();

    std::fs::write(temp_dir.path().join("example.csv"), "ean13;product__styles\n").unwrap();

    let summary = EtlEngine::new(RowTransformer::default(), RecordingDiagnostics::new())
        .run_files(&config)
        .unwrap();
    assert_eq!(summary.processed, 1);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_path(temp_dir.path().join("formatted.csv"))
        .unwrap();
    assert_eq!(reader.headers().unwrap(), vec!["ean13", "product__styles"]);
    let record = reader.records().next().unwrap().unwrap();
    assert_eq!(record, vec!["084-215630122-7", "Coastal, Transitional"]);
}
