//! End-to-end tests for the `routesheet` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const RECEIPT: &str = "Calumet District\nTroop 123\n5 Youth Renewal\nCharter Renewal 2\n";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let ws = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        let config = serde_json::json!({
            "output": {
                "data_dir": ws.path("data"),
                "template_path": ws.path("template.xlsx"),
                "output_dir": ws.path("generated"),
            }
        });
        fs::write(ws.config(), serde_json::to_string_pretty(&config).unwrap()).unwrap();
        ws
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn config(&self) -> PathBuf {
        self.path("config.json")
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn write_template(&self) {
        let mut book = umya_spreadsheet::new_file();
        book.get_active_sheet_mut()
            .get_cell_mut("A1")
            .set_value("Route Sheet");
        umya_spreadsheet::writer::xlsx::write(&book, self.path("template.xlsx")).unwrap();
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("routesheet").unwrap();
        cmd.arg("--config").arg(self.config());
        cmd
    }
}

fn generated_sheets(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_process_text_without_sheet() {
    let ws = Workspace::new();
    let input = ws.write("receipt.txt", RECEIPT);

    let output = ws
        .cmd()
        .args(["process", "--no-sheet"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["district_name"], "Calumet");
    assert_eq!(json["district_number"], 1);
    assert_eq!(json["local_unit_number"], "123");
    assert_eq!(json["program"], "Scouts BSA");
    assert_eq!(json["charter_renewal"], 2);
    assert_eq!(json["prices"]["Youth Registration"], 5);
    assert_eq!(json["prices"]["Charter Renewal"], 2);

    let stored = fs::read_to_string(ws.path("data").join("receipt_data.json")).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored, json);
    assert!(!ws.path("generated").exists());
}

#[test]
fn test_process_fills_route_sheet() {
    let ws = Workspace::new();
    ws.write_template();
    let input = ws.write("receipt.txt", RECEIPT);

    ws.cmd()
        .args(["process", "--format", "text"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("District: Calumet (1)"))
        .stderr(predicate::str::contains("Route sheet saved to"));

    let sheets = generated_sheets(&ws.path("generated"));
    assert_eq!(sheets.len(), 1);
    assert!(sheets[0].starts_with("Route_Sheet_Calumet_123_"));
    assert!(sheets[0].ends_with(".xlsx"));

    let book = umya_spreadsheet::reader::xlsx::read(ws.path("generated").join(&sheets[0])).unwrap();
    let sheet = book.get_active_sheet();
    assert_eq!(sheet.get_value("A1"), "Route Sheet");
    assert_eq!(sheet.get_value("B4"), "Scouts BSA");
    assert_eq!(sheet.get_value("E4"), "Troop");
    assert_eq!(sheet.get_value("G4"), "123");
}

#[test]
fn test_process_missing_template() {
    let ws = Workspace::new();
    let input = ws.write("receipt.txt", RECEIPT);

    ws.cmd()
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("template file not found"));
    assert!(!ws.path("generated").exists());
}

#[test]
fn test_process_csv_to_file() {
    let ws = Workspace::new();
    let input = ws.write("receipt.txt", RECEIPT);
    let out = ws.path("record.csv");

    ws.cmd()
        .args(["process", "--no-sheet", "--format", "csv", "--output"])
        .arg(&out)
        .arg(&input)
        .assert()
        .success();

    let csv = fs::read_to_string(out).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("council_number,effective_date"));
    assert!(lines.next().unwrap().starts_with("456,"));
}

#[test]
fn test_unsupported_input() {
    let ws = Workspace::new();
    let input = ws.write("receipt.docx", "nope");

    ws.cmd()
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported input format"));
}

#[test]
fn test_project_stored_record() {
    let ws = Workspace::new();
    ws.write_template();
    let record = ws.write(
        "record.json",
        r#"{
            "council_number": "456",
            "effective_date": "2024-03-01",
            "expiration_date": "2025-02-28",
            "term": "12 months",
            "district_name": "Five Creeks",
            "district_number": 9,
            "local_unit_number": "42",
            "program": "Cub Scouts",
            "prices": {"Youth Registration": 7}
        }"#,
    );

    ws.cmd()
        .arg("project")
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::contains("Route_Sheet_Five_Creeks_42_03-01-2024.xlsx"));

    let path = ws
        .path("generated")
        .join("Route_Sheet_Five_Creeks_42_03-01-2024.xlsx");
    let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
    let sheet = book.get_active_sheet();
    assert_eq!(sheet.get_value("E4"), "Pack");
    assert_eq!(sheet.get_value("H4"), "03/01/2024");
    assert_eq!(sheet.get_value("J4"), "02/28/2025");
}

#[test]
fn test_project_rejects_bad_date() {
    let ws = Workspace::new();
    ws.write_template();
    let record = ws.write(
        "record.json",
        r#"{
            "council_number": "456",
            "effective_date": "March 2024",
            "expiration_date": "2025-02-28",
            "term": "12 months",
            "prices": {}
        }"#,
    );

    ws.cmd()
        .arg("project")
        .arg(&record)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date format in effective_date"));
    assert!(!ws.path("generated").exists());
}

#[test]
fn test_batch_continues_and_summarizes() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.path("inbox")).unwrap();
    fs::write(ws.path("inbox/a.txt"), RECEIPT).unwrap();
    fs::write(ws.path("inbox/b.txt"), "Pack 7\n99999999999999999999 Youth Renewal\n").unwrap();
    let pattern = format!("{}/*.txt", ws.path("inbox").display());

    ws.cmd()
        .args(["batch", "--no-sheet", "--continue-on-error", "--summary"])
        .arg(&pattern)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful, 1 failed"));

    assert!(ws.path("data").join("a.json").exists());
    assert!(!ws.path("data").join("b.json").exists());

    let summary = fs::read_to_string(ws.path("data").join("summary.csv")).unwrap();
    assert!(summary.contains("a.txt,success,Calumet,1,123,Scouts BSA"));
    assert!(summary.contains("b.txt,error"));
}

#[test]
fn test_batch_stops_on_error() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.path("inbox")).unwrap();
    fs::write(ws.path("inbox/bad.txt"), "99999999999999999999 Adult New\n").unwrap();
    let pattern = format!("{}/*.txt", ws.path("inbox").display());

    ws.cmd()
        .args(["batch", "--no-sheet"])
        .arg(&pattern)
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_config_set_and_get() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["config", "set", "receipt.council_number", "789"])
        .assert()
        .success();
    ws.cmd()
        .args(["config", "get", "receipt.council_number"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"789\""));
    ws.cmd()
        .args(["config", "set", "pdf.render_dpi", "300"])
        .assert()
        .success();
    ws.cmd()
        .args(["config", "get", "pdf.render_dpi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("300"));
    ws.cmd()
        .args(["config", "set", "receipt.nonexistent", "1"])
        .assert()
        .failure();
}

#[test]
fn test_config_path() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"))
        .stdout(predicate::str::contains("exists"));
}
