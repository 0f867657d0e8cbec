//! Mock model backend.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use zoo_status::checks::{AdapterFailure, LibraryVersion, ModelBackend, ModelInfo};

/// What the backend answers for one model
#[derive(Debug, Clone)]
pub struct MockModel {
    pub inspect: Result<ModelInfo, AdapterFailure>,
    pub check: Result<(), AdapterFailure>,
    pub convert: Result<(), AdapterFailure>,
}

impl Default for MockModel {
    fn default() -> Self {
        MockModel {
            inspect: Ok(ModelInfo {
                ir_version: Some(7),
                opset_version: Some(13),
            }),
            check: Ok(()),
            convert: Ok(()),
        }
    }
}

impl MockModel {
    pub fn invalid(kind: &str, message: &str) -> Self {
        MockModel {
            check: Err(AdapterFailure::new(kind, message)),
            ..Default::default()
        }
    }

    pub fn inconvertible(kind: &str, message: &str) -> Self {
        MockModel {
            convert: Err(AdapterFailure::new(kind, message)),
            ..Default::default()
        }
    }

    pub fn unreadable(kind: &str, message: &str) -> Self {
        MockModel {
            inspect: Err(AdapterFailure::new(kind, message)),
            ..Default::default()
        }
    }
}

/// A backend call as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Inspect(String),
    Check(String),
    Convert(String),
    Versions,
}

/// Backend answering from a table keyed by file name
#[derive(Default)]
pub struct MockBackend {
    models: HashMap<String, MockModel>,
    calls: RefCell<Vec<Call>>,
    /// Artifact paths that existed when a conversion started
    stale_artifacts: RefCell<Vec<PathBuf>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, file_name: &str, model: MockModel) -> Self {
        self.models.insert(file_name.to_string(), model);
        self
    }

    fn model(&self, path: &Path) -> MockModel {
        self.models.get(&file_name(path)).cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn convert_count(&self, name: &str) -> usize {
        self.count(|c| *c == Call::Convert(name.to_string()))
    }

    pub fn check_count(&self, name: &str) -> usize {
        self.count(|c| *c == Call::Check(name.to_string()))
    }

    /// Calls that touched a model (everything but `versions`)
    pub fn model_calls(&self) -> usize {
        self.count(|c| *c != Call::Versions)
    }

    pub fn stale_artifacts(&self) -> Vec<PathBuf> {
        self.stale_artifacts.borrow().clone()
    }

    fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| predicate(c)).count()
    }
}

impl ModelBackend for MockBackend {
    fn inspect(&self, model: &Path) -> Result<ModelInfo, AdapterFailure> {
        self.calls.borrow_mut().push(Call::Inspect(file_name(model)));
        self.model(model).inspect
    }

    fn check(&self, model: &Path) -> Result<(), AdapterFailure> {
        self.calls.borrow_mut().push(Call::Check(file_name(model)));
        self.model(model).check
    }

    fn convert(&self, model: &Path, artifact: &Path) -> Result<(), AdapterFailure> {
        self.calls.borrow_mut().push(Call::Convert(file_name(model)));
        if artifact.exists() {
            self.stale_artifacts.borrow_mut().push(artifact.to_path_buf());
        }
        // Leave an artifact behind like a real exporter, success or not
        std::fs::write(artifact, b"graph")
            .map_err(|e| AdapterFailure::new("IOError", e.to_string()))?;
        self.model(model).convert
    }

    fn versions(&self) -> Vec<LibraryVersion> {
        self.calls.borrow_mut().push(Call::Versions);
        vec![
            LibraryVersion::new("Python", Some("3.10.12".to_string())),
            LibraryVersion::new("ONNX", Some("1.14.0".to_string())),
            LibraryVersion::new("ONNX-TF", Some("1.10.0".to_string())),
            LibraryVersion::new("TensorFlow", Some("2.12.0".to_string())),
        ]
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
