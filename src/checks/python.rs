//! Python backend: `onnx` checker and `onnx-tf` converter.
//!
//! Each call runs the embedded helper script in a fresh interpreter. The
//! script prints a single JSON object as its last stdout line; anything else
//! on stdout (library chatter) is ignored.

use super::{AdapterFailure, LibraryVersion, ModelBackend, ModelInfo};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Error kind used when the interpreter itself misbehaves
pub const PROCESS_ERROR: &str = "ProcessError";

const HELPER_SCRIPT: &str = r#"
import json
import os
import sys

os.environ.setdefault("TF_CPP_MIN_LOG_LEVEL", "3")


def emit(payload):
    sys.stdout.write("\n" + json.dumps(payload) + "\n")
    sys.stdout.flush()


def library(name, module_name, version_attr, revision_attr, repository):
    entry = {"name": name, "version": None, "revision": None, "repository": repository}
    try:
        module = __import__(module_name, fromlist=["_"])
        entry["version"] = str(getattr(module, version_attr, "") or "") or None
        if revision_attr:
            entry["revision"] = str(getattr(module, revision_attr, "") or "") or None
    except Exception:
        pass
    return entry


def versions():
    emit({
        "python": sys.version.split()[0],
        "libraries": [
            library("ONNX", "onnx.version", "version", "git_version",
                    "https://github.com/onnx/onnx"),
            library("ONNX-TF", "onnx_tf.version", "version", "git_version",
                    "https://github.com/onnx/onnx-tensorflow"),
            library("TensorFlow", "tensorflow", "__version__", None,
                    "https://github.com/tensorflow/tensorflow"),
        ],
    })


def main(argv):
    mode = argv[1]
    if mode == "versions":
        versions()
        return
    try:
        import onnx
        model = onnx.load(argv[2])
        if mode == "inspect":
            opset = model.opset_import[0].version if len(model.opset_import) else None
            emit({"ok": True, "ir_version": model.ir_version, "opset_version": opset})
        elif mode == "check":
            onnx.checker.check_model(model)
            emit({"ok": True})
        elif mode == "convert":
            import onnx_tf.backend
            rep = onnx_tf.backend.prepare(model)
            rep.export_graph(argv[3])
            emit({"ok": True})
        else:
            raise ValueError("unknown mode: " + mode)
    except Exception as exc:
        emit({"ok": False, "kind": type(exc).__name__, "message": str(exc)})


main(sys.argv)
"#;

/// Result object printed by the helper for model operations
#[derive(Debug, Deserialize)]
struct Outcome {
    ok: bool,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    ir_version: Option<i64>,
    #[serde(default)]
    opset_version: Option<i64>,
}

impl Outcome {
    fn into_result(self) -> Result<Self, AdapterFailure> {
        if self.ok {
            Ok(self)
        } else {
            Err(AdapterFailure::new(
                self.kind.unwrap_or_else(|| "Exception".to_string()),
                self.message.unwrap_or_default(),
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
struct VersionsPayload {
    python: Option<String>,
    #[serde(default)]
    libraries: Vec<LibraryEntry>,
}

#[derive(Debug, Deserialize)]
struct LibraryEntry {
    name: String,
    version: Option<String>,
    revision: Option<String>,
    repository: Option<String>,
}

impl From<LibraryEntry> for LibraryVersion {
    fn from(entry: LibraryEntry) -> Self {
        let source_url = match (&entry.repository, &entry.revision) {
            (Some(repo), Some(rev)) if !rev.is_empty() && rev != "unknown" => {
                Some(format!("{}/tree/{}", repo.trim_end_matches('/'), rev))
            }
            _ => None,
        };
        LibraryVersion {
            name: entry.name,
            version: entry.version,
            source_url,
        }
    }
}

/// Backend that shells out to a Python interpreter
#[derive(Debug, Clone)]
pub struct PythonBackend {
    python: PathBuf,
}

impl PythonBackend {
    pub fn new(python: PathBuf) -> Self {
        PythonBackend { python }
    }

    /// Run the helper and decode its JSON answer
    fn invoke<T: DeserializeOwned>(&self, mode: &str, args: &[&Path]) -> Result<T, AdapterFailure> {
        let output = Command::new(&self.python)
            .arg("-c")
            .arg(HELPER_SCRIPT)
            .arg(mode)
            .args(args)
            .env("TF_CPP_MIN_LOG_LEVEL", "3")
            .output()
            .map_err(|e| {
                AdapterFailure::new(
                    PROCESS_ERROR,
                    format!("failed to run {}: {}", self.python.display(), e),
                )
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if let Some(payload) = parse_payload(&stdout) {
            return Ok(payload);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(mode, status = %output.status, "helper produced no result");
        Err(AdapterFailure::new(
            PROCESS_ERROR,
            format!(
                "{} exited with {}\n{}",
                self.python.display(),
                output.status,
                stderr.trim()
            ),
        ))
    }
}

impl ModelBackend for PythonBackend {
    fn inspect(&self, model: &Path) -> Result<ModelInfo, AdapterFailure> {
        let outcome: Outcome = self.invoke("inspect", &[model])?;
        let outcome = outcome.into_result()?;
        Ok(ModelInfo {
            ir_version: outcome.ir_version,
            opset_version: outcome.opset_version,
        })
    }

    fn check(&self, model: &Path) -> Result<(), AdapterFailure> {
        let outcome: Outcome = self.invoke("check", &[model])?;
        outcome.into_result().map(|_| ())
    }

    fn convert(&self, model: &Path, artifact: &Path) -> Result<(), AdapterFailure> {
        let outcome: Outcome = self.invoke("convert", &[model, artifact])?;
        outcome.into_result().map(|_| ())
    }

    fn versions(&self) -> Vec<LibraryVersion> {
        match self.invoke::<VersionsPayload>("versions", &[]) {
            Ok(payload) => {
                let mut versions = vec![LibraryVersion::new("Python", payload.python)];
                versions.extend(payload.libraries.into_iter().map(LibraryVersion::from));
                versions
            }
            Err(failure) => {
                warn!(error = %failure, "could not query library versions");
                vec![LibraryVersion::new("Python", None)]
            }
        }
    }
}

/// Decode the last JSON object line of the helper's stdout
fn parse_payload<T: DeserializeOwned>(stdout: &str) -> Option<T> {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| line.starts_with('{'))
        .and_then(|line| serde_json::from_str(line).ok())
}
