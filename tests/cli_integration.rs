// CLI integration tests for get/list/require/keys flows.
use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_modeljson");
    Command::new(exe)
}

fn parse_json(value: &str) -> Value {
    serde_json::from_str(value).expect("valid json")
}

fn parse_json_line(output: &[u8]) -> Value {
    let text = String::from_utf8_lossy(output);
    let line = text.lines().next().expect("json line");
    parse_json(line)
}

fn write_doc(dir: &tempfile::TempDir, body: &str) -> String {
    let path = dir.path().join("doc.json");
    std::fs::write(&path, body).expect("write doc");
    path.to_str().expect("utf8 path").to_string()
}

const DOC: &str = r#"{
  "name": "ada",
  "age": 36,
  "score": 9.5,
  "joined": "2024-01-01T01:00:00+01:00",
  "bad_date": "soon",
  "tags": ["a", "b"],
  "mixed": [1, "two"],
  "address": {"city": "London"}
}"#;

#[test]
fn get_returns_typed_values_from_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_doc(&temp, DOC);

    let get = cmd()
        .args(["--file", &path, "get", "age", "--as", "int"])
        .output()
        .expect("get");
    assert!(get.status.success());
    let value = parse_json_line(&get.stdout);
    assert_eq!(value["key"], "age");
    assert_eq!(value["value"], 36);

    let date = cmd()
        .args(["--file", &path, "get", "joined", "--as", "date"])
        .output()
        .expect("get date");
    assert!(date.status.success());
    assert_eq!(
        parse_json_line(&date.stdout)["value"],
        "2024-01-01T00:00:00Z"
    );

    let mapping = cmd()
        .args(["--file", &path, "get", "address", "--as", "mapping"])
        .output()
        .expect("get mapping");
    assert!(mapping.status.success());
    assert_eq!(parse_json_line(&mapping.stdout)["value"]["city"], "London");
}

#[test]
fn get_falls_back_to_default_on_mismatch_or_absence() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_doc(&temp, DOC);

    let mismatch = cmd()
        .args(["--file", &path, "get", "name", "--as", "int", "--default", "0"])
        .output()
        .expect("get");
    assert!(mismatch.status.success());
    assert_eq!(parse_json_line(&mismatch.stdout)["value"], 0);

    let absent = cmd()
        .args(["--file", &path, "get", "missing", "--as", "string"])
        .output()
        .expect("get");
    assert!(absent.status.success());
    assert!(parse_json_line(&absent.stdout)["value"].is_null());

    let bad_date = cmd()
        .args([
            "--file",
            &path,
            "get",
            "bad_date",
            "--as",
            "date",
            "--default",
            "1970-01-01T00:00:00Z",
        ])
        .output()
        .expect("get");
    assert!(bad_date.status.success());
    assert_eq!(
        parse_json_line(&bad_date.stdout)["value"],
        "1970-01-01T00:00:00Z"
    );
}

#[test]
fn list_is_all_or_nothing() {
    let tags = cmd()
        .args(["--json", DOC, "list", "tags", "--as", "string"])
        .output()
        .expect("list");
    assert!(tags.status.success());
    assert_eq!(
        parse_json_line(&tags.stdout)["value"],
        serde_json::json!(["a", "b"])
    );

    let mixed = cmd()
        .args(["--json", DOC, "list", "mixed", "--as", "int"])
        .output()
        .expect("list");
    assert!(mixed.status.success());
    assert!(parse_json_line(&mixed.stdout)["value"].is_null());
}

#[test]
fn float_output_uses_shortest_decimal() {
    let doc = r#"{"x": 0.1, "xs": [0.1, 0.2]}"#;
    for args in [
        ["--json", doc, "get", "x", "--as", "float"],
        ["--json", doc, "require", "x", "--as", "float"],
    ] {
        let out = cmd().args(args).output().expect("float");
        assert!(out.status.success());
        let text = String::from_utf8_lossy(&out.stdout);
        assert!(text.contains("\"value\":0.1"), "unexpected output: {text}");
    }

    let list = cmd()
        .args(["--json", doc, "list", "xs", "--as", "float"])
        .output()
        .expect("list float");
    assert!(list.status.success());
    assert_eq!(
        parse_json_line(&list.stdout)["value"],
        serde_json::json!([0.1, 0.2])
    );
}

#[test]
fn require_reports_distinct_error_kinds() {
    let missing = cmd()
        .args(["--json", DOC, "require", "missing", "--as", "string"])
        .output()
        .expect("require");
    assert_eq!(missing.status.code(), Some(3));
    let err = parse_json_line(&missing.stderr);
    assert_eq!(err["error"]["kind"], "MissingKey");
    assert_eq!(err["error"]["key"], "missing");

    let mismatch = cmd()
        .args(["--json", DOC, "require", "name", "--as", "bool"])
        .output()
        .expect("require");
    assert_eq!(mismatch.status.code(), Some(4));
    assert_eq!(parse_json_line(&mismatch.stderr)["error"]["kind"], "TypeMismatch");

    let bad_date = cmd()
        .args(["--json", DOC, "require", "bad_date", "--as", "date"])
        .output()
        .expect("require");
    assert_eq!(bad_date.status.code(), Some(5));
    assert_eq!(parse_json_line(&bad_date.stderr)["error"]["kind"], "DateParse");
}

#[test]
fn keys_reads_document_from_stdin() {
    let mut child = cmd()
        .arg("keys")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(br#"{"a": 1, "b": [true]}"#)
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");
    assert!(output.status.success());

    let value = parse_json_line(&output.stdout);
    let keys = value["keys"].as_array().expect("keys array");
    assert_eq!(keys.len(), 2);
    assert!(keys.iter().any(|entry| entry["key"] == "a" && entry["type"] == "number"));
    assert!(keys.iter().any(|entry| entry["key"] == "b" && entry["type"] == "array"));
}

#[test]
fn invalid_input_is_a_usage_error() {
    let not_json = cmd()
        .args(["--json", "{nope", "keys"])
        .output()
        .expect("keys");
    assert_eq!(not_json.status.code(), Some(2));
    let err = parse_json_line(&not_json.stderr);
    assert_eq!(err["error"]["kind"], "Usage");
    assert!(
        err["error"]["hint"]
            .as_str()
            .expect("hint")
            .contains("context: --json")
    );

    let not_object = cmd()
        .args(["--json", "[1, 2]", "keys"])
        .output()
        .expect("keys");
    assert_eq!(not_object.status.code(), Some(2));

    let bad_default = cmd()
        .args(["--json", DOC, "get", "age", "--as", "int", "--default", "\"x\""])
        .output()
        .expect("get");
    assert_eq!(bad_default.status.code(), Some(2));
}

#[test]
fn missing_file_is_an_io_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("absent.json");
    let output = cmd()
        .args(["--file", path.to_str().expect("utf8"), "keys"])
        .output()
        .expect("keys");
    assert_eq!(output.status.code(), Some(7));
    assert_eq!(parse_json_line(&output.stderr)["error"]["kind"], "Io");
}
