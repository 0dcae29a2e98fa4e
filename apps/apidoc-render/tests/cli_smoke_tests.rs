//! CLI smoke tests for the apidoc-render binary
//!
//! These spawn the built binary and check help output, rendering in both
//! formats, the check subcommand and configuration handling.

use std::fs;
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Helper to run the apidoc-render binary with given arguments
fn run_apidoc_render(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_apidoc-render"))
        .args(args)
        .env_remove("APIDOC__OUTPUT__FORMAT")
        .env_remove("APIDOC__OUTPUT__PATH")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute apidoc-render")
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_cli_help_command() {
    let output = run_apidoc_render(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = stdout_of(&output);
    assert!(stdout.contains("apidoc-render"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("render"), "Should contain 'render' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--format"), "Should mention format option");
}

#[test]
fn test_cli_version_command() {
    let output = run_apidoc_render(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = stdout_of(&output);
    assert!(stdout.contains("apidoc-render"), "Should contain binary name");
    assert!(
        stdout.chars().any(|c| c.is_ascii_digit()),
        "Should contain version numbers"
    );
}

#[test]
fn test_cli_invalid_command() {
    let output = run_apidoc_render(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unrecognized subcommand") || stderr.contains("error"),
        "Should report the unknown subcommand"
    );
}

#[test]
fn test_cli_invalid_format() {
    let output = run_apidoc_render(&["--format", "toml"]);

    assert!(!output.status.success(), "Unknown format should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("toml"), "Should echo the rejected value");
}

#[test]
fn test_render_json_to_stdout_by_default() {
    let output = run_apidoc_render(&[]);
    assert!(output.status.success(), "Render should succeed");

    let doc: serde_json::Value =
        serde_json::from_str(&stdout_of(&output)).expect("stdout should be a JSON document");
    assert_eq!(doc["openapi"], "3.0.0");
    assert_eq!(doc["info"]["title"], "Pet Store");
    assert_eq!(doc["paths"]["/pets"]["get"]["tags"], serde_json::json!(["pets"]));
    assert_eq!(
        doc["paths"]["/pets/{petId}"]["get"]["parameters"][0]["in"],
        "path"
    );
    assert!(doc["components"]["schemas"]["Pet"].is_object());
}

#[test]
fn test_render_yaml_to_file() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("nested/openapi.yaml");
    let out_str = out.to_string_lossy().to_string();

    let output = run_apidoc_render(&["-f", "yaml", "-o", &out_str, "render"]);
    assert!(output.status.success(), "Render to file should succeed");
    assert!(stdout_of(&output).is_empty(), "Nothing should go to stdout");

    let yaml = fs::read_to_string(&out).expect("output file should exist");
    assert!(yaml.starts_with("openapi:"));
    assert!(yaml.contains("/pets/{petId}"));
}

#[test]
fn test_check_prints_summary() {
    let output = run_apidoc_render(&["check"]);
    assert!(output.status.success(), "Check should succeed");

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Document OK"));
    assert!(stdout.contains("paths: 3"));
    assert!(stdout.contains("operations: 5"));
    assert!(stdout.contains("GET /pets"));
    assert!(stdout.contains("DELETE /pets/{petId}"));
}

#[test]
fn test_config_file_sets_document_metadata() {
    let tmp = TempDir::new().unwrap();
    let cfg_path = tmp.path().join("apidoc.yaml");
    fs::write(
        &cfg_path,
        r#"
document:
  openapi: "3.1.0"
  title: "Inventory"
  version: "2.0.0"
builder:
  duplicate_operations: reject
"#,
    )
    .unwrap();
    let cfg_str = cfg_path.to_string_lossy().to_string();

    let output = run_apidoc_render(&["--config", &cfg_str]);
    assert!(output.status.success(), "Render with config should succeed");

    let doc: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(doc["openapi"], "3.1.0");
    assert_eq!(doc["info"]["title"], "Inventory");
    assert_eq!(
        doc["components"]["schemas"]["NewPet"]["properties"]["tag"]["type"],
        serde_json::json!(["string", "null"])
    );
}

#[test]
fn test_print_config() {
    let output = run_apidoc_render(&["--print-config", "-f", "yaml"]);
    assert!(output.status.success(), "Print config should succeed");

    let stdout = stdout_of(&output);
    assert!(stdout.contains("document:"));
    assert!(stdout.contains("format: yaml"));
    assert!(stdout.contains("logging:"));
}

#[test]
fn test_missing_config_file_fails() {
    let output = run_apidoc_render(&["--config", "/definitely/not/here.yaml"]);

    assert!(!output.status.success(), "Missing config should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("here.yaml"));
}
