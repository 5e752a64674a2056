//! Integration tests for our command-line interface.  We actually run the
//! binary and make sure it produces the expected output.

use std::path::PathBuf;
use std::process::{Command, Output};
use std::str::from_utf8;

fn trailcam_ocr() -> Command {
    Command::new(env!("CARGO_BIN_EXE_trailcam_ocr"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        from_utf8(&output.stderr).unwrap()
    );
    serde_json::from_slice(&output.stdout).expect("stdout was not JSON")
}

#[test]
fn show_help() {
    let output = trailcam_ocr()
        .arg("--help")
        .output()
        .expect("could not run trailcam_ocr");
    assert!(output.status.success());
    assert!(from_utf8(&output.stdout).unwrap().find("Usage").is_some());
}

#[test]
fn show_version() {
    let output = trailcam_ocr()
        .arg("--version")
        .output()
        .expect("could not run trailcam_ocr");
    assert!(output.status.success());
    assert!(from_utf8(&output.stdout)
        .unwrap()
        .find("trailcam_ocr ")
        .is_some());
}

#[test]
fn cmd_normalize() {
    let output = trailcam_ocr()
        .arg("normalize")
        .arg("23c29.09inHg")
        .output()
        .expect("could not run trailcam_ocr");
    assert!(output.status.success());
    assert_eq!(from_utf8(&output.stdout).unwrap(), "23C 29.09 INHG\n");
}

#[test]
fn cmd_extract() {
    let output = trailcam_ocr()
        .args(["extract", "--left", "Z3C Z9.09INHG"])
        .args(["--center", "TRAILCAMQ5"])
        .args(["--right", "12/06/202505:41PM"])
        .output()
        .expect("could not run trailcam_ocr");
    let meta = stdout_json(&output);
    assert_eq!(meta["camera_name"], "TRAILCAM05");
    assert_eq!(meta["date_taken"], "2025-12-06");
    assert_eq!(meta["time_taken"], "17:41:00");
    assert!(meta["temperature_c"].is_null());
    assert!(meta["pressure_inhg"].is_null());
    assert_eq!(
        meta["raw_text"],
        "Z3C Z9.09 INHG | TRAILCAMQ5 | 12/06/2025 05:41PM"
    );
}

#[test]
fn cmd_extract_with_no_text_is_not_an_error() {
    let output = trailcam_ocr()
        .arg("extract")
        .output()
        .expect("could not run trailcam_ocr");
    let meta = stdout_json(&output);
    assert!(meta["camera_name"].is_null());
    assert!(meta["date_taken"].is_null());
}

#[test]
fn cmd_extract_applies_to_photo() {
    let output = trailcam_ocr()
        .args(["extract", "--left", "23C29.09INHG", "--center", "TRAILCAM05"])
        .arg("--config")
        .arg(fixture("config.json"))
        .arg("--photo")
        .arg(fixture("photo.json"))
        .output()
        .expect("could not run trailcam_ocr");
    let record = stdout_json(&output);
    assert_eq!(record["camera"], "TRAILCAM05");
    assert_eq!(record["temperature_c"], 23.0);
    assert_eq!(record["pressure_inhg"], 29.09);
    assert_eq!(record["latitude"], 41.712345);
    assert_eq!(record["longitude"], -87.654321);
    assert!(record["date_taken"].is_null());
}

#[test]
fn cmd_extract_fill_missing_keeps_stored_values() {
    let output = trailcam_ocr()
        .args(["extract", "--left", "23C29.09INHG"])
        .args(["--policy", "fill-missing"])
        .arg("--photo")
        .arg(fixture("photo.json"))
        .output()
        .expect("could not run trailcam_ocr");
    let record = stdout_json(&output);
    assert_eq!(record["temperature_c"], 10.5);
    assert_eq!(record["pressure_inhg"], 29.09);
    // Without a config file, we know no cameras.
    assert!(record["camera"].is_null());
    assert!(record["latitude"].is_null());
}

#[test]
fn cmd_extract_reports_missing_config() {
    let output = trailcam_ocr()
        .args(["extract", "--config"])
        .arg(fixture("does_not_exist.json"))
        .output()
        .expect("could not run trailcam_ocr");
    assert!(!output.status.success());
    assert!(from_utf8(&output.stderr)
        .unwrap()
        .find("Could not load config")
        .is_some());
}

#[test]
fn cmd_batch() {
    let output = trailcam_ocr()
        .arg("batch")
        .arg(fixture("batch.json"))
        .output()
        .expect("could not run trailcam_ocr");
    assert!(output.status.success());
    let lines = from_utf8(&output.stdout)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(lines.len(), 3);

    assert_eq!(lines[0]["id"], 17);
    assert_eq!(lines[0]["meta"]["camera_name"], "TRAILCAM05");
    assert_eq!(lines[0]["meta"]["temperature_c"], 23.0);
    assert_eq!(lines[0]["meta"]["pressure_inhg"], 29.09);

    assert_eq!(lines[1]["id"], "IMG_0042.JPG");
    assert_eq!(lines[1]["meta"]["camera_name"], "TRAILCAM105");
    assert_eq!(lines[1]["meta"]["time_taken"], "09:05:00");
    assert!(lines[1]["meta"]["temperature_c"].is_null());

    assert!(lines[2]["id"].is_null());
    assert!(lines[2]["meta"]["camera_name"].is_null());
}

#[test]
fn cmd_batch_rejects_bad_input() {
    let output = trailcam_ocr()
        .arg("batch")
        .arg(fixture("not_a_batch.json"))
        .output()
        .expect("could not run trailcam_ocr");
    assert!(!output.status.success());
}
