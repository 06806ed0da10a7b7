use service_sheet::domain::ports::SheetPipeline;
use service_sheet::{
    FieldEdit, LocalStorage, OutputFormat, ReportPipeline, SheetEngine, SheetError, TomlConfig,
};
use std::path::Path;
use tempfile::TempDir;

fn config_for(output_path: &str, formats: &[&str]) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.load.output_path = Some(output_path.to_string());
    config.load.output_formats = formats.iter().map(|f| f.to_string()).collect();
    config
}

fn storages(input_dir: &Path, output_dir: &Path) -> (LocalStorage, LocalStorage) {
    (
        LocalStorage::new(input_dir.to_str().unwrap().to_string()),
        LocalStorage::new(output_dir.to_str().unwrap().to_string()),
    )
}

fn edits(raw: &[&str]) -> Vec<FieldEdit> {
    raw.iter().map(|s| s.parse().unwrap()).collect()
}

#[tokio::test]
async fn test_end_to_end_from_toml_report() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    let output_path = output_dir.path().to_str().unwrap().to_string();

    std::fs::write(
        input_dir.path().join("report.toml"),
        r#"
customer = "Rossi S.r.l."
card_no = "2024/118"
date = "2024-03-15"
interventions = ["C/O CLIENTE", "RIP. CON ADDEBITO"]
fault_reported = "Non stampa"

[labor]
total_hours = 3
hourly_cost = 25.0
km_travelled = 50
km_cost = "0.30"

[[parts]]
description = "Fusore"
quantity = 1
unit_price = 5.50

[[parts]]
description = "Rullo"
quantity = 3
unit_price = 2.00
"#,
    )
    .unwrap();

    let (source, sink) = storages(input_dir.path(), output_dir.path());
    let config = config_for(&output_path, &["text", "json", "csv"]);
    let pipeline = ReportPipeline::new(source, sink, config).with_input("report.toml");

    let summary = SheetEngine::new(pipeline).run().await.unwrap();

    // parts 11.50 + labor 90.00
    assert!((summary.totals.taxable_total - 101.5).abs() < 1e-9);
    assert_eq!(service_sheet::format_amount(summary.totals.tax), "22.33");
    assert_eq!(service_sheet::format_amount(summary.totals.grand_total), "123.83");
    assert_eq!(summary.files_written, 3);
    assert!(summary.output_path.ends_with("scheda.txt"));

    let text = std::fs::read_to_string(output_dir.path().join("scheda.txt")).unwrap();
    assert!(text.contains("Rossi S.r.l."));
    assert!(text.contains("[x] RIP. CON ADDEBITO"));
    assert!(text.contains("123.83"));

    let csv = std::fs::read_to_string(output_dir.path().join("scheda.csv")).unwrap();
    // two parts from the file, three padded blank rows, header and three summary rows
    assert_eq!(csv.lines().count(), 1 + 5 + 3);
    assert!(csv.contains("2,Rullo,3,2.00,6.00"));

    let json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(output_dir.path().join("scheda.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(json["totals"]["taxable_total"], "101.50");
    assert_eq!(json["report"]["parts"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_blank_sheet_with_edits() {
    let output_dir = TempDir::new().unwrap();
    let output_path = output_dir.path().to_str().unwrap().to_string();

    let (source, sink) = storages(output_dir.path(), output_dir.path());
    let pipeline = ReportPipeline::new(source, sink, config_for(&output_path, &["csv"]))
        .with_edits(edits(&["parts.0.quantity=2", "parts.0.unit_price=10.00"]));

    let summary = SheetEngine::new(pipeline).run().await.unwrap();

    assert_eq!(service_sheet::format_amount(summary.totals.taxable_total), "20.00");
    assert_eq!(service_sheet::format_amount(summary.totals.tax), "4.40");
    assert_eq!(service_sheet::format_amount(summary.totals.grand_total), "24.40");
    assert!(output_dir.path().join("scheda.csv").exists());
    assert!(!output_dir.path().join("scheda.txt").exists());
}

#[tokio::test]
async fn test_json_report_with_garbage_numbers() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    std::fs::write(
        input_dir.path().join("report.json"),
        r#"{
            "labor": { "total_hours": "abc", "hourly_cost": "25" },
            "parts": [ { "quantity": "", "unit_price": "99" } ]
        }"#,
    )
    .unwrap();

    let (source, sink) = storages(input_dir.path(), output_dir.path());
    let pipeline = ReportPipeline::new(
        source,
        sink,
        config_for(output_dir.path().to_str().unwrap(), &["text"]),
    )
    .with_input("report.json");

    let state = pipeline.extract().await.unwrap();
    assert_eq!(state.totals().grand_total, 0.0);
    assert_eq!(state.report().parts.len(), 5);
}

#[tokio::test]
async fn test_preview_writes_nothing() {
    let output_dir = TempDir::new().unwrap();
    let (source, sink) = storages(output_dir.path(), output_dir.path());
    let pipeline = ReportPipeline::new(
        source,
        sink,
        config_for(output_dir.path().to_str().unwrap(), &["text", "json"]),
    )
    .with_edits(edits(&["total_hours=3", "hourly_cost=25", "km_travelled=50", "km_cost=0.30"]));

    let state = SheetEngine::new(pipeline).preview().await.unwrap();

    assert_eq!(service_sheet::format_amount(state.totals().tax), "19.80");
    assert_eq!(service_sheet::format_amount(state.totals().grand_total), "109.80");
    assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_too_many_part_rows_rejected() {
    let input_dir = TempDir::new().unwrap();
    let parts: Vec<String> = (0..7)
        .map(|i| format!("[[parts]]\ndescription = \"Pezzo {}\"\n", i))
        .collect();
    std::fs::write(input_dir.path().join("report.toml"), parts.join("\n")).unwrap();

    let (source, sink) = storages(input_dir.path(), input_dir.path());
    let pipeline = ReportPipeline::new(
        source,
        sink,
        config_for(input_dir.path().to_str().unwrap(), &["text"]),
    )
    .with_input("report.toml");

    let err = SheetEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, SheetError::InvalidField { .. }));
}

#[tokio::test]
async fn test_unsupported_input_extension() {
    let input_dir = TempDir::new().unwrap();
    std::fs::write(input_dir.path().join("report.yaml"), "customer: x").unwrap();

    let (source, sink) = storages(input_dir.path(), input_dir.path());
    let pipeline = ReportPipeline::new(
        source,
        sink,
        config_for(input_dir.path().to_str().unwrap(), &["text"]),
    )
    .with_input("report.yaml");

    let err = SheetEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, SheetError::UnsupportedFormat { .. }));
}

#[tokio::test]
async fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let (source, sink) = storages(dir.path(), dir.path());
    let pipeline = ReportPipeline::new(source, sink, config_for(dir.path().to_str().unwrap(), &["text"]))
        .with_input("missing.toml");

    let err = SheetEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, SheetError::IoError(_)));
}

#[tokio::test]
async fn test_transform_respects_format_order() {
    let dir = TempDir::new().unwrap();
    let (source, sink) = storages(dir.path(), dir.path());
    let pipeline = ReportPipeline::new(
        source,
        sink,
        config_for(dir.path().to_str().unwrap(), &["json", "text"]),
    );

    let state = pipeline.extract().await.unwrap();
    let rendered = pipeline.transform(state).await.unwrap();
    let formats: Vec<OutputFormat> = rendered.outputs.iter().map(|o| o.format).collect();
    assert_eq!(formats, vec![OutputFormat::Json, OutputFormat::Text]);
}
