//! Report output tests.
//!
//! Compare the written markdown against expected text for a small zoo.

use crate::mocks::{MockBackend, MockModel, MockStore, ZooTree};
use pretty_assertions::assert_eq;
use zoo_status::cli::output::{MarkdownFormatter, OutputFormatter, TerminalFormatter};
use zoo_status::{ReportOrchestrator, ZooConfig, ZooReport};

fn sample_run(tree: &ZooTree) -> ZooReport {
    tree.model("loose.onnx", 2048);
    tree.model("mnist/model/mnist-7.onnx", 26_454);
    tree.model("mnist/model/mnist-8.onnx", 26_454);
    tree.placeholder("tiny_yolov2/model/tinyyolov2-8.onnx");
    tree.model("yolo/model/yolov3-10.onnx", 5 * 1024 * 1024);

    let backend = MockBackend::new()
        .with_model(
            "mnist-8.onnx",
            MockModel::invalid("ValidationError", "Node (Conv) | has input size 1 not in range"),
        )
        .with_model(
            "yolov3-10.onnx",
            MockModel::inconvertible(
                "OpUnsupportedException",
                "NonMaxSuppression is not supported in Tensorflow.",
            ),
        );
    let config = ZooConfig {
        fetch: false,
        ..tree.config()
    };
    ReportOrchestrator::new(&config, &backend, &MockStore::new())
        .run()
        .expect("report run")
}

fn from_heading<'a>(text: &'a str, heading: &str) -> &'a str {
    let start = text.find(heading).expect("heading present");
    &text[start..]
}

#[test]
fn test_details_tables() {
    let tree = ZooTree::new();
    sample_run(&tree);
    let written = tree.read_report("ModelZoo-Status.md");

    let expected = "\
## Details

### .

Status | # | Model | Size | IR | Opset | Validated | Converted
------ | --- | ----- | ---- | --- | ----- | --------- | ---------
:ok: | 1 | loose.onnx | 2K | 7 | 13 | :heavy_check_mark: | :heavy_check_mark:

### mnist

Status | # | Model | Size | IR | Opset | Validated | Converted
------ | --- | ----- | ---- | --- | ----- | --------- | ---------
:ok: | 1 | mnist/model/mnist-7.onnx | 26K | 7 | 13 | :heavy_check_mark: | :heavy_check_mark:
:x: | 2 | mnist/model/mnist-8.onnx | 26K | 7 | 13 | ValidationError: Node (Conv) \\| has input size 1 not in range | :heavy_minus_sign:

### tiny_yolov2

Status | # | Model | Size | IR | Opset | Validated | Converted
------ | --- | ----- | ---- | --- | ----- | --------- | ---------
:grey_question: | 1 | tiny_yolov2/model/tinyyolov2-8.onnx | 129B |  |  |  |\x20

### yolo

Status | # | Model | Size | IR | Opset | Validated | Converted
------ | --- | ----- | ---- | --- | ----- | --------- | ---------
:warning: | 1 | yolo/model/yolov3-10.onnx | 5M | 7 | 13 | :heavy_check_mark: | OpUnsupportedException: NonMaxSuppression is not supported in Tensorflow.

";
    assert_eq!(from_heading(&written, "## Details"), expected);
}

#[test]
fn test_summary_table() {
    let tree = ZooTree::new();
    sample_run(&tree);
    let written = tree.read_report("ModelZoo-Status.md");

    let summary = from_heading(&written, "## Summary");
    let summary = &summary[..summary.find("Elapsed").expect("elapsed row")];
    assert_eq!(
        summary,
        "\
## Summary

Name | Value
---- | -----
Model count | 3
Total count | 5
:ok: Passed | 2
:warning: Known limitation | 1
:x: Failed | 1
:grey_question: Skipped | 1
"
    );
}

#[test]
fn test_environment_table_lists_libraries() {
    let tree = ZooTree::new();
    sample_run(&tree);
    let written = tree.read_report("ModelZoo-Status.md");

    let environment = from_heading(&written, "## Environment");
    let environment = &environment[..environment.find("## Summary").expect("summary")];
    assert!(environment.contains("\nPython | 3.10.12\n"));
    assert!(environment.contains("\nzoo-status | "));
    assert!(environment.contains("\nONNX | 1.14.0\n"));
    assert!(environment.contains("\nONNX-TF | 1.10.0\n"));
    assert!(environment.contains("\nTensorFlow | 2.12.0\n"));
}

#[test]
fn test_written_file_matches_formatter() {
    let tree = ZooTree::new();
    let report = sample_run(&tree);
    assert_eq!(
        tree.read_report("ModelZoo-Status.md"),
        MarkdownFormatter::new().format(&report)
    );
}

#[test]
fn test_terminal_summary() {
    let tree = ZooTree::new();
    let report = sample_run(&tree);

    let text = TerminalFormatter::new(false, false).format(&report);
    assert!(text.contains("Models: 3  Files: 5\n"));
    assert!(text.contains("Summary: 2 passed, 1 warnings, 1 failed, 1 skipped\n"));
    assert!(text.contains("[WARN] yolo/model/yolov3-10.onnx\n"));
    assert!(text.contains("Report: "));

    let quiet = TerminalFormatter::new(false, true).format(&report);
    assert_eq!(
        quiet,
        "[FAIL] mnist/model/mnist-8.onnx\n       ValidationError: Node (Conv) | has input size 1 not in range\n"
    );
}
