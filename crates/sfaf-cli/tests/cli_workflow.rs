//! Handler-level workflows across validate, export, import and report.

use std::path::Path;

use sfaf_cli::config::EngineConfig;
use sfaf_cli::export::{run_export, ExportArgs};
use sfaf_cli::import::{run_import, ImportArgs};
use sfaf_cli::report::{run_report, ReportArgs};
use sfaf_cli::validate::{run_validate, ValidateArgs};
use sfaf_cli::{read_record, EXIT_FAILED};

const RECORD: &str = r#"{
    "field005": "U",
    "field010": "N",
    "field102": "AF 192345",
    "field110": "K4726.5(4725)",
    "field113": "MO",
    "field113_2": "FB",
    "field114": "16K0F3E",
    "field115": "W50",
    "field200": "USAF",
    "field303": "303000N0865000W"
}"#;

fn write(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn export_then_import_reproduces_record() {
    let dir = tempfile::tempdir().unwrap();
    let record = write(dir.path(), "record.json", RECORD);
    let sfaf = dir.path().join("action.txt");
    let back = dir.path().join("back.json");
    let config = EngineConfig::default();

    let export = ExportArgs {
        record: record.clone(),
        out: Some(sfaf.clone()),
        system: None,
        force: false,
    };
    assert_eq!(run_export(&export, &config).unwrap(), 0);

    let import = ImportArgs {
        input: sfaf,
        out: Some(back.clone()),
        batch: false,
    };
    assert_eq!(run_import(&import, &config).unwrap(), 0);

    assert_eq!(read_record(&back).unwrap(), read_record(&record).unwrap());

    let validate = ValidateArgs {
        record: back,
        json: false,
    };
    assert_eq!(run_validate(&validate, &config).unwrap(), 0);
}

#[test]
fn config_required_field_fails_validation_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let record = write(dir.path(), "record.json", RECORD);
    let config_path = write(dir.path(), "sfaf.yaml", "required_fields: [field301]\n");
    let config = EngineConfig::load(&config_path).unwrap();

    let validate = ValidateArgs {
        record: record.clone(),
        json: true,
    };
    assert_eq!(run_validate(&validate, &config).unwrap(), EXIT_FAILED);

    let out = dir.path().join("action.txt");
    let export = ExportArgs {
        record,
        out: Some(out.clone()),
        system: None,
        force: false,
    };
    assert_eq!(run_export(&export, &config).unwrap(), EXIT_FAILED);
    assert!(!out.exists());
}

#[test]
fn report_on_partial_record() {
    let dir = tempfile::tempdir().unwrap();
    let record = write(dir.path(), "record.json", RECORD);
    let out = dir.path().join("report.txt");
    let args = ReportArgs {
        record,
        json: false,
        out: Some(out.clone()),
    };
    assert_eq!(run_report(&args, &EngineConfig::default()).unwrap(), EXIT_FAILED);
    let text = std::fs::read_to_string(out).unwrap();
    assert!(text.contains("MISSING REQUIRED: field300 - State/Country (TX)"));
    assert!(!text.contains("field110 -"));
}

#[test]
fn bad_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write(dir.path(), "sfaf.yaml", "severity:\n  field113: fatal\n");
    let config = EngineConfig::load(&config_path).unwrap();
    let record = write(dir.path(), "record.json", RECORD);
    let args = ValidateArgs { record, json: false };
    assert!(run_validate(&args, &config).is_err());
}
