use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

const VALID_SETTINGS: &str = r#"
SERIAL_PORT = "SIM0"
FILAMENT_RATE = 0.05
SUBLIMATION_RATE = 0.50
MUG_RATE = 3.00
"#;

fn write_settings(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("settings.toml");
    fs::write(&path, body).unwrap();
    path
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["filament", "--grams", "120"], 0, "Cost: $6.00", "stdout")]
#[case(&["sublimation", "--pages", "2", "--mugs", "1"], 0, "Cost: $4.00", "stdout")]
#[case(&["mug", "--count", "2"], 0, "Cost: $6.00", "stdout")]
#[case(&["filament"], 2, "required", "stderr")]
#[case(&["filament", "--grams", "0"], 4, "Invalid quantity", "stderr")]
#[case(&["filament", "--grams", "-3"], 4, "Invalid quantity", "stderr")]
#[case(&["sublimation", "--pages", "0"], 4, "Invalid quantity", "stderr")]
#[case(&["quote", "filament", "120"], 0, "Total: $6.00", "stdout")]
#[case(&["quote", "mug", "2.5"], 4, "whole number", "stderr")]
#[case(&["self-check"], 0, "Printer OK on SIM0", "stdout")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_settings(&dir, VALID_SETTINGS);
    let out = dir.path().join("printer.bin");

    let mut cmd = Command::cargo_bin("receipt-o-matic").unwrap();
    cmd.arg("--config").arg(&cfg).arg("--simulate").arg(&out);
    cmd.args(args);

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => assert.stdout(predicate::str::contains(needle)),
        _ => assert.stderr(predicate::str::contains(needle)),
    };
}

#[test]
fn simulated_receipt_lands_in_file() {
    let dir = tempdir().unwrap();
    let cfg = write_settings(&dir, VALID_SETTINGS);
    let out = dir.path().join("printer.bin");

    Command::cargo_bin("receipt-o-matic")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--simulate")
        .arg(&out)
        .args(["filament", "--grams", "120", "--patron", "Ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(simulated)").not());

    let bytes = fs::read(&out).unwrap();
    assert_eq!(&bytes[..2], b"\x1b@");
    assert!(bytes.windows(3).any(|w| w == b"Ada"));
    assert!(bytes.windows(5).any(|w| w == b"$6.00"));
    assert_eq!(&bytes[bytes.len() - 3..], b"\x1dV\x00");
}

#[rstest]
#[case("FILAMENT_RATE = 0.05\nSUBLIMATION_RATE = 0.5\nMUG_RATE = 3\n")]
#[case("SERIAL_PORT = \"SIM0\"\nFILAMENT_RATE = \"lots\"\nSUBLIMATION_RATE = 0.5\nMUG_RATE = 3\n")]
#[case("SERIAL_PORT = \"SIM0\"\nFILAMENT_RATE = -1\nSUBLIMATION_RATE = 0.5\nMUG_RATE = 3\n")]
fn bad_settings_exit_with_config_code(#[case] body: &str) {
    let dir = tempdir().unwrap();
    let cfg = write_settings(&dir, body);

    Command::cargo_bin("receipt-o-matic")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .args(["quote", "filament", "1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid settings"));
}

#[test]
fn missing_settings_file_is_a_config_error() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("receipt-o-matic")
        .unwrap()
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .arg("self-check")
        .assert()
        .code(3);
}

#[test]
fn unreachable_port_exits_unavailable() {
    let dir = tempdir().unwrap();
    let body = format!(
        "SERIAL_PORT = \"{}\"\nFILAMENT_RATE = 0.05\nSUBLIMATION_RATE = 0.5\nMUG_RATE = 3\n",
        dir.path().join("no-such-tty").display()
    );
    let cfg = write_settings(&dir, &body);

    Command::cargo_bin("receipt-o-matic")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .args(["filament", "--grams", "10"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("unavailable"));
}

#[test]
fn json_quote_and_error_are_parseable() {
    let dir = tempdir().unwrap();
    let cfg = write_settings(&dir, VALID_SETTINGS);

    let ok = Command::cargo_bin("receipt-o-matic")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .args(["--json", "quote", "sublimation", "3"])
        .output()
        .unwrap();
    assert!(ok.status.success());
    let v: serde_json::Value = serde_json::from_slice(&ok.stdout).unwrap();
    assert_eq!(v["kind"], "sublimation");
    assert_eq!(v["total"], "1.5");

    let err = Command::cargo_bin("receipt-o-matic")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .args(["--json", "quote", "filament", "0"])
        .output()
        .unwrap();
    assert_eq!(err.status.code(), Some(4));
    let stderr = String::from_utf8(err.stderr).unwrap();
    let line = stderr
        .lines()
        .rev()
        .find(|l| l.contains("\"reason\""))
        .unwrap();
    let v: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["reason"], "InvalidQuantity");
    assert_eq!(v["details"]["kind"], "filament");
}

#[test]
fn json_print_writes_only_the_json_object_to_stdout() {
    let dir = tempdir().unwrap();
    let cfg = write_settings(&dir, VALID_SETTINGS);
    let out = dir.path().join("printer.bin");

    let res = Command::cargo_bin("receipt-o-matic")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--simulate")
        .arg(&out)
        .args(["--json", "filament", "--grams", "120", "--patron", "Ada"])
        .output()
        .unwrap();
    assert!(res.status.success());
    let v: serde_json::Value = serde_json::from_slice(&res.stdout).unwrap();
    assert_eq!(v["status"], "printed");
    assert_eq!(v["receipt"]["patron"], "Ada");
    assert_eq!(v["receipt"]["amount_due"], "6.00");
    assert_eq!(v["receipt"]["items"][0]["kind"], "filament");
    assert!(!fs::read(&out).unwrap().is_empty());
}

#[test]
fn interactive_menu_prints_and_quits() {
    let dir = tempdir().unwrap();
    let cfg = write_settings(&dir, VALID_SETTINGS);
    let out = dir.path().join("printer.bin");

    assert_cmd::Command::cargo_bin("receipt-o-matic")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--simulate")
        .arg(&out)
        .write_stdin("1\nAda\n120\n2\nx\n1\n0\n3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Printed. Cost: $6.00"))
        .stdout(predicate::str::contains("Invalid entry 'x'"))
        .stdout(predicate::str::contains("Printed. Cost: $0.50"));

    assert!(fs::read(&out).unwrap().len() > 20);
}
