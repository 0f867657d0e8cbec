//! Validation and conversion adapter.
//!
//! The schema checker and the format converter are external libraries
//! reached through [`ModelBackend`]. This module turns their raw failures
//! into the descriptor strings shown in the report.
//!
//! # Graceful Degradation
//!
//! Nothing here returns a run-level error:
//! - Checker failure: `CheckResult::Fail` with `"{kind}: {first line}"`
//! - Converter failure: `ConvertResult::Fail` or `KnownLimitation` with the
//!   last line of the message
//! - Backend process failure: reported as a `ProcessError` failure
//!
//! The scratch artifact is removed before and after every conversion.

pub mod classify;
pub mod python;

use crate::{CheckResult, ConvertResult};
use classify::KnownLimitations;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Header fields read from a model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelInfo {
    pub ir_version: Option<i64>,
    pub opset_version: Option<i64>,
}

/// A failure raised by an external library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterFailure {
    /// Exception or error type name
    pub kind: String,
    pub message: String,
}

impl AdapterFailure {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        AdapterFailure {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Descriptor for checker failures: kind plus the first message line
    pub fn check_descriptor(&self) -> String {
        let first_line = self.message.trim().lines().next().unwrap_or("").trim();
        format!("{}: {}", self.kind, first_line)
    }

    /// Descriptor for converter failures.
    ///
    /// Multi-line messages are usually tracebacks whose last line names the
    /// actual error, so only that line is kept.
    pub fn convert_descriptor(&self) -> String {
        let lines: Vec<&str> = self
            .message
            .trim()
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        match lines.as_slice() {
            [] => format!("{}: ", self.kind),
            [single] => format!("{}: {}", self.kind, single),
            [.., last] => last.to_string(),
        }
    }
}

impl fmt::Display for AdapterFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Version of a library used to produce the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryVersion {
    pub name: String,
    pub version: Option<String>,
    /// Link to the exact source revision, when known
    pub source_url: Option<String>,
}

impl LibraryVersion {
    pub fn new(name: &str, version: Option<String>) -> Self {
        LibraryVersion {
            name: name.to_string(),
            version,
            source_url: None,
        }
    }
}

/// External schema checker and converter
pub trait ModelBackend {
    /// Read IR and opset versions
    fn inspect(&self, model: &Path) -> Result<ModelInfo, AdapterFailure>;

    /// Validate the model against its schema
    fn check(&self, model: &Path) -> Result<(), AdapterFailure>;

    /// Convert the model, writing the result to `artifact`
    fn convert(&self, model: &Path, artifact: &Path) -> Result<(), AdapterFailure>;

    /// Versions of the runtime and libraries behind this backend
    fn versions(&self) -> Vec<LibraryVersion>;
}

/// Run the schema check
pub fn run_check(backend: &dyn ModelBackend, model: &Path) -> CheckResult {
    match backend.check(model) {
        Ok(()) => CheckResult::Pass,
        Err(failure) => {
            debug!(model = %model.display(), error = %failure, "schema check failed");
            CheckResult::Fail(failure.check_descriptor())
        }
    }
}

/// Run the conversion and clean up its artifact
pub fn run_convert(
    backend: &dyn ModelBackend,
    model: &Path,
    artifact: &Path,
    limitations: &KnownLimitations,
) -> ConvertResult {
    discard_artifact(artifact);
    let result = backend.convert(model, artifact);
    discard_artifact(artifact);

    match result {
        Ok(()) => ConvertResult::Pass,
        Err(failure) => {
            debug!(model = %model.display(), error = %failure, "conversion failed");
            limitations.classify(&failure)
        }
    }
}

/// Remove a converted artifact (file or directory) if present
pub fn remove_artifact(artifact: &Path) -> std::io::Result<()> {
    match std::fs::symlink_metadata(artifact) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(artifact),
        Ok(_) => std::fs::remove_file(artifact),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn discard_artifact(artifact: &Path) {
    if let Err(e) = remove_artifact(artifact) {
        warn!(artifact = %artifact.display(), error = %e, "could not remove artifact");
    }
}
