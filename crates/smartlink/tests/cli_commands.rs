#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

const COMMAND_HEX: &str = "021a34120000c03f0000204000006040000090406400c8002c019001e098";
const TELEMETRY_HEX: &str = "4218030000002a420000000000000000000000003412b168de3abfaa";
const TEXT_VALUE_HEX: &str = "8212040048656c6c6f20526f626f7400000000001177";

fn smartlink(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_smartlink"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .output()
        .expect("smartlink should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn unique_temp_file(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "smartlink-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ))
}

#[test]
fn encode_command_prints_hex() {
    let output = smartlink(&[
        "--format",
        "json",
        "encode",
        "command",
        "--json",
        r#"{"command_type":4660,"w":1.5,"x":2.5,"y":3.5,"z":4.5,"s":100,"t":200,"u":300,"v":400}"#,
    ]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains(&format!("\"hex\":\"{COMMAND_HEX}\"")));
    assert!(out.contains("\"size\":30"));
}

#[test]
fn encode_raw_writes_frame_bytes() {
    let output = smartlink(&[
        "--format",
        "raw",
        "encode",
        "value",
        "--json",
        r#"{"Text":"Hello Robot"}"#,
    ]);

    assert!(output.status.success());
    assert_eq!(hex_of(&output.stdout), TEXT_VALUE_HEX);
}

#[test]
fn encode_from_file() {
    let path = unique_temp_file("telemetry.json");
    std::fs::write(
        &path,
        r#"{"value":{"Float32":42.5},"source_id":4660,"timestamp":987654321}"#,
    )
    .expect("record file should be writable");

    let output = smartlink(&[
        "--format",
        "json",
        "encode",
        "telemetry",
        "--file",
        path.to_str().expect("temp path should be utf-8"),
    ]);
    let _ = std::fs::remove_file(&path);

    assert!(output.status.success());
    assert!(stdout(&output).contains(TELEMETRY_HEX));
}

#[test]
fn encode_invalid_json_returns_60() {
    let output = smartlink(&["encode", "command", "--json", "{not json"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn decode_telemetry_prints_record() {
    let output = smartlink(&["--format", "json", "decode", "telemetry", TELEMETRY_HEX]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("\"kind\":\"telemetry\""));
    assert!(out.contains("\"source_id\":4660"));
    assert!(out.contains("\"timestamp\":987654321"));
}

#[test]
fn decode_with_wrong_kind_returns_60() {
    let output = smartlink(&["decode", "command", TELEMETRY_HEX]);

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("frame kind mismatch"));
}

#[test]
fn decode_bad_hex_returns_60() {
    let output = smartlink(&["decode", "value", "0g"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn inspect_reports_crc_values() {
    let output = smartlink(&["--format", "json", "inspect", COMMAND_HEX]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("\"valid\":true"));
    assert!(out.contains("\"declared_length\":26"));
    assert!(out.contains("\"received_crc\":39136"));
}

#[test]
fn inspect_broken_frame_returns_60() {
    let output = smartlink(&["--format", "json", "inspect", "021a00"]);

    assert_eq!(output.status.code(), Some(60));
    assert!(stdout(&output).contains("\"valid\":false"));
}

#[test]
fn crc_of_check_string() {
    let output = smartlink(&["--format", "json", "crc", "313233343536373839"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("\"hex\":\"0x29b1\""));
}

#[test]
fn listen_reads_frames_from_file() {
    let path = unique_temp_file("capture.bin");
    let mut capture = vec![0xFF, 0x13];
    capture.extend_from_slice(&bytes_of(COMMAND_HEX));
    capture.extend_from_slice(&bytes_of(TELEMETRY_HEX));
    capture.extend_from_slice(&bytes_of(TEXT_VALUE_HEX));
    std::fs::write(&path, &capture).expect("capture should be writable");

    let path_str = path.to_str().expect("temp path should be utf-8").to_string();
    let all = smartlink(&["--format", "json", "listen", &path_str]);
    let filtered = smartlink(&[
        "--format",
        "json",
        "listen",
        &path_str,
        "--kinds",
        "value",
    ]);
    let limited = smartlink(&["--format", "json", "listen", &path_str, "--count", "1"]);
    let _ = std::fs::remove_file(&path);

    assert!(all.status.success());
    assert_eq!(stdout(&all).lines().count(), 3);

    let filtered_out = stdout(&filtered);
    assert_eq!(filtered_out.lines().count(), 1);
    assert!(filtered_out.contains("Hello Robot"));

    let limited_out = stdout(&limited);
    assert_eq!(limited_out.lines().count(), 1);
    assert!(limited_out.contains("\"kind\":\"command\""));
}

#[test]
fn listen_missing_file_fails() {
    let path = unique_temp_file("missing.bin");
    let output = smartlink(&["listen", path.to_str().expect("temp path should be utf-8")]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn version_extended_lists_protocol_limits() {
    let output = smartlink(&["version", "--extended"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("name: smartlink"));
    assert!(out.contains("max_payload=64"));
}

fn bytes_of(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("valid hex"))
        .collect()
}

fn hex_of(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
