//! End-to-end tests for the recr binary.

use assert_cmd::Command;
use predicates::prelude::*;

const RECEIPT_TEXT: &str = "\
WALMART SUPERCENTER
11/01/2019 14:32
2 Milk 3.50 7.00
Bread 2.49
Subtotal 9.49
Tax 0.95
Total 10.44
VISA ****1234
";

fn recr() -> Command {
    Command::cargo_bin("recr").unwrap()
}

#[test]
fn parse_outputs_json_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("receipt.txt");
    std::fs::write(&file, RECEIPT_TEXT).unwrap();

    recr()
        .arg("parse")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"merchant\": \"Walmart\""))
        .stdout(predicate::str::contains("\"date\": \"2019-11-01\""))
        .stdout(predicate::str::contains("Milk"));
}

#[test]
fn parse_reads_stdin() {
    recr()
        .arg("parse")
        .arg("-")
        .write_stdin(RECEIPT_TEXT)
        .assert()
        .success()
        .stdout(predicate::str::contains("Walmart"));
}

#[test]
fn parse_short_input_falls_back_to_sample_data() {
    recr()
        .arg("parse")
        .arg("-")
        .write_stdin("hi")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sample Store"))
        .stdout(predicate::str::contains("\"sample_data\": true"));
}

#[test]
fn parse_text_format() {
    recr()
        .arg("parse")
        .arg("-")
        .arg("--format")
        .arg("text")
        .write_stdin(RECEIPT_TEXT)
        .assert()
        .success()
        .stdout(predicate::str::contains("Merchant: Walmart"))
        .stdout(predicate::str::contains("Return within 90 days"));
}

#[test]
fn parse_missing_file_fails() {
    recr()
        .arg("parse")
        .arg("/no/such/receipt.txt")
        .assert()
        .failure();
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    std::fs::write(dir.path().join("a.txt"), RECEIPT_TEXT).unwrap();
    std::fs::write(dir.path().join("b.txt"), "hi").unwrap();

    recr()
        .arg("batch")
        .arg(format!("{}/*.txt", dir.path().display()))
        .arg("--output-dir")
        .arg(&out)
        .arg("--summary")
        .assert()
        .success();

    assert!(out.join("a.json").exists());
    assert!(out.join("b.json").exists());

    let summary = std::fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.contains("a.txt"));
    assert!(summary.contains("Walmart"));
    assert!(summary.contains("Sample Store"));
}
