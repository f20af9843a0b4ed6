#![cfg(all(unix, feature = "cli"))]

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn bufprims(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_bufprims"))
        .args(["--log-level", "error"])
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("bufprims should start");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(stdin)
        .expect("stdin should accept input");
    child.wait_with_output().expect("bufprims should finish")
}

#[test]
fn encode_raw_writes_framed_bytes() {
    let output = bufprims(&["--format", "raw", "encode", "--data", "hello"], b"");
    assert!(output.status.success());
    assert_eq!(output.stdout, b"\x06hello\x00");
}

#[test]
fn encode_json_reports_sizes() {
    let output = bufprims(&["--format", "json", "encode", "--hex", "110033"], b"");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"payload_size\":3"));
    assert!(stdout.contains("\"encoded\":\"0211023300\""));
}

#[test]
fn encode_then_decode_through_stdin() {
    let framed = bufprims(&["--format", "raw", "encode"], b"a\0b");
    assert!(framed.status.success());

    let mut stream = framed.stdout.clone();
    stream.extend_from_slice(&framed.stdout);
    let output = bufprims(&["--format", "json", "decode"], &stream);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("\"hex\":\"610062\"").count(), 2);
    assert!(stdout.contains("\"messages\":2"));
    assert!(stdout.contains("\"bytes_dropped\":0"));
}

#[test]
fn strict_decode_fails_on_loss() {
    // pointer promises four bytes, a delimiter arrives after two
    let output = bufprims(&["--format", "json", "decode", "--strict", "--hex", "05010200"], b"");
    assert_eq!(output.status.code(), Some(60));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"bytes_dropped\":2"));
}

#[test]
fn oversized_frames_are_dropped() {
    let output = bufprims(
        &[
            "--format",
            "json",
            "decode",
            "--max-message-size",
            "2",
            "--hex",
            "0461626300",
        ],
        b"",
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"messages\":0"));
    assert!(stdout.contains("\"bytes_dropped\":3"));
}

#[test]
fn version_prints_package_version() {
    let output = bufprims(&["version"], b"");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("bufprims "));
}
