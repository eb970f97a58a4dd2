//! Integration tests for the fidframe binary
//!
//! Each test runs the built binary with FIDFRAME_DIR pointing at a fresh
//! temporary directory, so no user configuration leaks in.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Helper to get the fidframe binary path
fn fidframe_binary() -> PathBuf {
    // When running tests, the binary is in target/debug/fidframe
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove deps
    path.push("fidframe");
    path
}

/// Helper to run fidframe with a custom config directory
fn run_fidframe(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(fidframe_binary())
        .env("FIDFRAME_DIR", dir)
        .env_remove("FIDFRAME_CONFIG")
        .args(args)
        .output()
        .expect("Failed to execute fidframe")
}

fn run_fidframe_stdout(dir: &Path, args: &[&str]) -> String {
    let output = run_fidframe(dir, args);
    assert!(
        output.status.success(),
        "fidframe {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Config that keeps PNG tests off the host's font directories
fn setup_test_env() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("fidframe.yaml"),
        "raster:\n  load_system_fonts: false\n",
    )
    .unwrap();
    temp
}

#[test]
fn test_select_json_is_deterministic() {
    let temp = setup_test_env();
    let first = run_fidframe_stdout(temp.path(), &["select", "12345", "-o", "json"]);
    let second = run_fidframe_stdout(temp.path(), &["select", "12345", "-o", "json"]);
    assert_eq!(first, second);

    let value: serde_json::Value = serde_json::from_str(&first).unwrap();
    assert_eq!(value["identifier"], "12345");
    let traits = value["traits"].as_object().unwrap();
    assert_eq!(traits.len(), 8);
    assert!(traits["body"].is_string());
}

#[test]
fn test_non_numeric_identifier_is_zero() {
    let temp = setup_test_env();
    let garbage = run_fidframe_stdout(temp.path(), &["select", "not-a-number", "-o", "json"]);
    let zero = run_fidframe_stdout(temp.path(), &["select", "0", "-o", "json"]);
    assert_eq!(garbage, zero);
}

#[test]
fn test_leading_zeros_are_ignored() {
    let temp = setup_test_env();
    let padded = run_fidframe_stdout(temp.path(), &["select", "00042", "-o", "json"]);
    let plain = run_fidframe_stdout(temp.path(), &["select", "42", "-o", "json"]);
    assert_eq!(padded, plain);
}

#[test]
fn test_metadata_json() {
    let temp = setup_test_env();
    let stdout = run_fidframe_stdout(
        temp.path(),
        &["metadata", "7", "--image", "https://frames.example/{id}.png"],
    );
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["name"], "Frame #7");
    assert_eq!(value["image"], "https://frames.example/7.png");
    assert!(!value["attributes"].as_array().unwrap().is_empty());
}

#[test]
fn test_compose_to_file() {
    let temp = setup_test_env();
    let out = temp.path().join("frame.svg");
    run_fidframe_stdout(temp.path(), &["compose", "12345", "-O", out.to_str().unwrap()]);

    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("<g id=\"layer-background\">"));
    assert!(svg.contains("#12345"));
    assert!(!svg.contains("<?xml"));
}

#[test]
fn test_compose_stdout_matches_file() {
    let temp = setup_test_env();
    let out = temp.path().join("frame.svg");
    run_fidframe_stdout(temp.path(), &["compose", "99", "-O", out.to_str().unwrap()]);
    let stdout = run_fidframe_stdout(temp.path(), &["compose", "99"]);
    assert_eq!(stdout, fs::read_to_string(&out).unwrap());
}

#[test]
fn test_render_png() {
    let temp = setup_test_env();
    let out = temp.path().join("frame.png");
    run_fidframe_stdout(temp.path(), &["render", "12345", "-s", "128", "-O", out.to_str().unwrap()]);

    let png = fs::read(&out).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(u32::from_be_bytes([png[16], png[17], png[18], png[19]]), 128);
}

#[test]
fn test_init_creates_files() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("home");
    run_fidframe_stdout(temp.path(), &["init", "--path", target.to_str().unwrap()]);

    assert!(target.join("fidframe.yaml").exists());
    assert!(target.join("traits.yaml").exists());
    assert!(target.join("fragments/eyes/eyes-laser.svg").exists());

    // Second run keeps the existing files
    fs::write(target.join("traits.yaml"), "order: []\n").unwrap();
    run_fidframe_stdout(temp.path(), &["init", "--path", target.to_str().unwrap()]);
    assert_eq!(fs::read_to_string(target.join("traits.yaml")).unwrap(), "order: []\n");
}

#[test]
fn test_custom_trait_file() {
    let temp = setup_test_env();
    fs::write(
        temp.path().join("traits.yaml"),
        "order: [eyes]\ntables:\n  eyes:\n    - { id: laser, svgId: eyes-laser }\n",
    )
    .unwrap();
    fs::write(
        temp.path().join("fidframe.yaml"),
        format!(
            "paths:\n  traits: {}\nraster:\n  load_system_fonts: false\n",
            temp.path().join("traits.yaml").display()
        ),
    )
    .unwrap();

    let stdout = run_fidframe_stdout(temp.path(), &["select", "1", "-o", "json"]);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["traits"]["eyes"], "laser");
    assert_eq!(value["traits"].as_object().unwrap().len(), 1);
}

#[test]
fn test_batch_writes_range() {
    let temp = setup_test_env();
    let out_dir = temp.path().join("frames");
    run_fidframe_stdout(
        temp.path(),
        &["batch", "1", "4", "--out-dir", out_dir.to_str().unwrap(), "--png", "-s", "32", "-j", "2"],
    );

    for fid in 1..=4 {
        assert!(out_dir.join(format!("{}.svg", fid)).exists());
        assert!(out_dir.join(format!("{}.png", fid)).exists());
    }
}

#[test]
fn test_batch_rejects_reversed_range() {
    let temp = setup_test_env();
    let out_dir = temp.path().join("frames");
    let output = run_fidframe(temp.path(), &["batch", "5", "1", "--out-dir", out_dir.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn test_config_get() {
    let temp = setup_test_env();
    let stdout = run_fidframe_stdout(temp.path(), &["config", "get", "selector.salt"]);
    assert_eq!(stdout.trim(), "fidframe-v1");

    let output = run_fidframe(temp.path(), &["config", "get", "no.such.key"]);
    assert!(!output.status.success());
}

#[test]
fn test_doctor_runs() {
    let temp = setup_test_env();
    let stdout = run_fidframe_stdout(temp.path(), &["doctor"]);
    assert!(stdout.contains("fidframe Doctor"));
    assert!(stdout.contains("built-in"));
}
