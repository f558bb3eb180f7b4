use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

#[allow(deprecated)]
fn mindmap() -> Command {
    Command::cargo_bin("mindmap").expect("binary")
}

#[test]
fn prompt_prints_completion_request() {
    let output = mindmap()
        .arg("prompt")
        .arg("--model")
        .arg("gpt-4o-mini")
        .write_stdin("Rust is a systems programming language.")
        .output()
        .expect("command run");

    assert!(output.status.success());
    let request: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(request["model"], "gpt-4o-mini");
    assert_eq!(request["max_tokens"], 2000);

    let messages = request["messages"].as_array().expect("messages array");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert!(messages[0]["content"]
        .as_str()
        .unwrap_or_default()
        .contains("<analysis>"));
    assert!(messages[1]["content"]
        .as_str()
        .unwrap_or_default()
        .contains("Rust is a systems programming language."));
}

#[test]
fn prompt_uses_custom_marker_tag() {
    let output = mindmap()
        .arg("prompt")
        .arg("--marker-tag")
        .arg("outline")
        .write_stdin("Some text.")
        .output()
        .expect("command run");

    assert!(output.status.success());
    let request: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert!(request["messages"][0]["content"]
        .as_str()
        .unwrap_or_default()
        .contains("</outline>"));
}

#[test]
fn prompt_rejects_empty_document() {
    mindmap()
        .arg("prompt")
        .write_stdin("   \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Empty document"));
}

#[test]
fn prompt_rejects_marker_tag_with_spaces() {
    mindmap()
        .arg("prompt")
        .arg("--marker-tag")
        .arg("a b")
        .write_stdin("Some text.")
        .assert()
        .failure()
        .stderr(predicate::str::contains("marker_tag"));
}
