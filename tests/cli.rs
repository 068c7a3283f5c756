//! End-to-end tests for the `lanerev` binary.

use std::io::Write;
use std::process::{Command, Stdio};

const BIN: &str = env!("CARGO_BIN_EXE_lanerev");

fn lanerev() -> Command {
    let mut cmd = Command::new(BIN);
    cmd.env("RUST_LOG", "off").env_remove("LANEREV_CONFIG");
    cmd
}

fn stdout_of(args: &[&str]) -> String {
    let out = lanerev().args(args).output().expect("run lanerev");
    assert!(
        out.status.success(),
        "lanerev {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).unwrap().trim().to_string()
}

#[test]
fn reverses_arguments() {
    assert_eq!(stdout_of(&["1", "2", "3", "4", "5"]), "5 4 3 2 1");
}

#[test]
fn accepts_negative_numbers() {
    assert_eq!(stdout_of(&["-1", "2", "-3"]), "-3 2 -1");
}

#[test]
fn json_output() {
    assert_eq!(
        stdout_of(&["--json", "--species", "portable", "1", "2", "3", "4", "5", "6", "7", "8"]),
        "[8,7,6,5,4,3,2,1]"
    );
}

#[test]
fn strict_rejects_partial_block() {
    let out = lanerev()
        .args(["--strict", "--species", "portable", "1", "2", "3"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("not a multiple of the lane width 4"), "{}", stderr);
}

#[test]
fn strict_accepts_full_blocks() {
    assert_eq!(
        stdout_of(&["--strict", "--species", "portable", "1", "2", "3", "4"]),
        "4 3 2 1"
    );
}

#[test]
fn unknown_species_is_a_usage_error() {
    let out = lanerev().args(["--species", "mmx", "1"]).output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("mmx"));
}

#[test]
fn reads_values_from_piped_stdin() {
    let mut child = lanerev()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"10 20\n30\t40 50\n")
        .unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap().trim(), "50 40 30 20 10");
}

#[test]
fn rejects_garbage_on_stdin() {
    let mut child = lanerev()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"1 two 3").unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("'two'"));
}

#[test]
fn config_file_sets_policy() {
    let path = std::env::temp_dir().join(format!("lanerev-cli-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "remainder": "strict", "species": "portable" }"#).unwrap();

    let out = lanerev()
        .arg("--config")
        .arg(&path)
        .args(["1", "2", "3"])
        .output()
        .unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(!out.status.success());
}

#[test]
fn config_env_var_sets_policy() {
    let path = std::env::temp_dir().join(format!("lanerev-env-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"remainder":"strict","species":"portable"}"#).unwrap();

    let out = lanerev()
        .env("LANEREV_CONFIG", &path)
        .args(["1", "2", "3"])
        .output()
        .unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("not a multiple of the lane width 4"), "{}", stderr);
}

#[test]
fn missing_config_env_file_falls_back_to_defaults() {
    let path = std::env::temp_dir().join("lanerev-does-not-exist/config.json");
    let out = lanerev()
        .env("LANEREV_CONFIG", &path)
        .args(["1", "2", "3"])
        .output()
        .unwrap();
    assert!(
        out.status.success(),
        "{}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert_eq!(String::from_utf8(out.stdout).unwrap().trim(), "3 2 1");
}

#[test]
fn features_lists_portable() {
    let text = stdout_of(&["--features"]);
    assert!(text.contains("portable"));
    assert!(text.contains("Preferred:"));
}

#[cfg(unix)]
#[test]
fn interactive_stdin_until_eof() {
    let mut cmd = lanerev();
    cmd.args(["--species", "portable"]);
    let mut session = rexpect::session::spawn_command(cmd, Some(5_000)).unwrap();
    session.send_line("4 5 6").unwrap();
    session.send_control('d').unwrap();
    session.exp_string("6 5 4").unwrap();
    session.exp_eof().unwrap();
}

#[test]
fn features_json_is_structured() {
    let text = stdout_of(&["--features", "--json"]);
    let report: serde_json::Value = serde_json::from_str(&text).unwrap();
    let preferred = report["preferred"].as_str().unwrap();
    let supported = report["supported"].as_array().unwrap();
    assert!(supported.iter().any(|s| s == preferred));
    assert!(supported.iter().any(|s| s == "portable"));
    assert!(report["features"].is_string());
}
