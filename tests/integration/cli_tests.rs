//! CLI integration tests.
//!
//! Argument and config file merging, plus the built binary's exit codes.

use crate::mocks::ZooTree;
use clap::Parser;
use std::path::PathBuf;
use std::process::Command;
use zoo_status::cli::args::Args;
use zoo_status::data::markers::LimitationKind;
use zoo_status::platform::ci::GitRef;
use zoo_status::{ZooConfig, ZooError};

fn binary(tree: &ZooTree) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_zoo-status"));
    command
        .current_dir(tree.root())
        .env_remove("ZOO_STATUS_MODELS")
        .env_remove("ZOO_STATUS_OUTPUT")
        .env_remove("ZOO_STATUS_CONFIG")
        .env_remove("ZOO_STATUS_PYTHON")
        .env_remove("GITHUB_REF")
        .env("NO_COLOR", "1");
    command
}

#[test]
fn test_config_file_fills_unset_flags() {
    let tree = ZooTree::new();
    let config_path = tree.root().join("zoo-status.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
models = "{}"
output = "{}"
include = ["mnist"]
placeholder_max_bytes = 2048

[[known_limitations]]
pattern = "Unsupported ONNX ops"
kind = "runtime-unsupported"
"#,
            tree.models().display(),
            tree.output().display()
        ),
    )
    .unwrap();

    let args = Args::try_parse_from([
        "zoo-status",
        "--config",
        config_path.to_str().unwrap(),
        "--ref",
        "refs/heads/main",
        "-v",
    ])
    .unwrap();
    let config = ZooConfig::from_args(&args).unwrap();

    assert_eq!(config.models, tree.models());
    assert_eq!(config.output, tree.output());
    assert_eq!(config.include, Some(vec!["mnist".to_string()]));
    assert_eq!(config.placeholder_max_bytes, 2048);
    assert_eq!(config.git_ref, Some(GitRef::Branch("main".to_string())));
    assert!(config.verbose);
    assert!(config.fetch_enabled());

    let extra = config.known_limitations.entries().last().unwrap();
    assert_eq!(extra.pattern, "Unsupported ONNX ops");
    assert_eq!(extra.kind, LimitationKind::RuntimeUnsupported);
    assert!(config.known_limitations.entries().len() > 1);
}

#[test]
fn test_flags_win_over_config_file() {
    let tree = ZooTree::new();
    let config_path = tree.root().join("zoo-status.toml");
    std::fs::write(&config_path, "include = [\"mnist\"]\npython = \"/opt/py\"\n").unwrap();

    let args = Args::try_parse_from([
        "zoo-status",
        "--config",
        config_path.to_str().unwrap(),
        "--include",
        "resnet",
        "--python",
        "python3.11",
    ])
    .unwrap();
    let config = ZooConfig::from_args(&args).unwrap();

    assert_eq!(config.include, Some(vec!["resnet".to_string()]));
    assert_eq!(config.python, PathBuf::from("python3.11"));
}

#[test]
fn test_missing_config_file_is_io_error() {
    let args =
        Args::try_parse_from(["zoo-status", "--config", "/nonexistent/zoo-status.toml"]).unwrap();
    assert!(matches!(ZooConfig::from_args(&args), Err(ZooError::Io { .. })));
}

#[test]
fn test_unknown_config_key_is_config_error() {
    let tree = ZooTree::new();
    let config_path = tree.root().join("zoo-status.toml");
    std::fs::write(&config_path, "format = \"json\"\n").unwrap();

    let args =
        Args::try_parse_from(["zoo-status", "--config", config_path.to_str().unwrap()]).unwrap();
    assert!(matches!(ZooConfig::from_args(&args), Err(ZooError::Config(_))));
}

#[test]
fn test_binary_dry_run_succeeds_without_report() {
    let tree = ZooTree::new();
    tree.model("mnist/model/mnist-8.onnx", 4096);

    let output = binary(&tree)
        .args(["--models", "models", "--output", "wiki", "--dry-run"])
        .args(["--python", "/nonexistent/python3"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Models: 1  Files: 1"));
    assert!(stdout.contains("Dry run: no report written"));
    assert!(!tree.output().join("ModelZoo-Status.md").exists());
}

#[test]
fn test_binary_missing_models_dir_exits_3() {
    let tree = ZooTree::new();
    let output = binary(&tree)
        .args(["--models", "absent", "--output", "wiki", "--dry-run"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Directory not found"));
}

#[test]
fn test_binary_strict_fails_on_unconvertible_models() {
    let tree = ZooTree::new();
    tree.model("mnist/model/mnist-8.onnx", 4096);

    // With no interpreter every model fails to inspect
    let output = binary(&tree)
        .args(["--models", "models", "--output", "wiki", "--no-fetch", "--strict", "-q"])
        .args(["--python", "/nonexistent/python3"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let report = tree.read_report("ModelZoo-Status.md");
    assert!(report.contains(":x: | 1 | mnist/model/mnist-8.onnx | 4K"));
    assert!(report.contains("ProcessError: failed to run /nonexistent/python3"));
}

#[test]
fn test_binary_build_info() {
    let tree = ZooTree::new();
    let output = binary(&tree).arg("--build-info").output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("zoo-status "));
}
