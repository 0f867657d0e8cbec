//! zoo-status library
//!
//! Model zoo status reporting: walks a directory of ONNX model files,
//! validates each with the external schema checker, attempts a conversion
//! with the external converter, and writes a markdown status report.
//!
//! The pipeline is:
//! - Directory walk with an optional inclusion filter
//! - On-demand fetch of Git LFS placeholders (restored afterwards)
//! - Validation and conversion through a [`checks::ModelBackend`]
//! - Aggregation into a [`ZooReport`] rendered as markdown
//!
//! # Example
//!
//! ```no_run
//! use zoo_status::{run_report, ZooConfig};
//!
//! let config = ZooConfig {
//!     dry_run: true,
//!     ..Default::default()
//! };
//! let report = run_report(&config).expect("report failed");
//! println!("Models: {}", report.summary.total_count);
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod data;
pub mod engine;
pub mod platform;
pub mod version;

use checks::classify::KnownLimitations;
use checks::python::PythonBackend;
use cli::args::Args;
use config::FileConfig;
use platform::ci::GitRef;
use platform::lfs::GitLfs;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Re-exports for public API
pub use engine::orchestrator::ReportOrchestrator;
pub use engine::result::{ReportLine, ResultSummary, ZooReport};

/// File extension of serialized models
pub const MODEL_EXTENSION: &str = "onnx";

/// Files at or below this size are treated as LFS placeholders
pub const DEFAULT_PLACEHOLDER_MAX_BYTES: u64 = 1024;

/// Base name of the generated report
pub const REPORT_BASENAME: &str = "ModelZoo-Status";

/// A model file discovered by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFile {
    /// Path on disk
    pub path: PathBuf,
    /// Path relative to the models root
    pub relative: PathBuf,
    /// Size in bytes at discovery time
    pub size: u64,
    /// 1-based position within its parent directory
    pub index: u32,
}

impl ModelFile {
    /// Whether the file is still an unfetched placeholder
    pub fn is_placeholder(&self, max_bytes: u64) -> bool {
        self.size <= max_bytes
    }

    /// Relative path with `/` separators, for reports
    pub fn display_name(&self) -> String {
        display_path(&self.relative)
    }
}

/// Outcome of the schema check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    Pass,
    /// Error descriptor `"{kind}: {first line}"`
    Fail(String),
    Skipped,
}

/// Outcome of the conversion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertResult {
    Pass,
    /// Failure caused by a documented operation gap
    KnownLimitation(String),
    Fail(String),
    Skipped,
}

/// Overall status of one model file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    Warn,
    Fail,
    Skip,
}

impl Status {
    /// Emoji shortcode used in the report's status column
    pub fn glyph(&self) -> &'static str {
        match self {
            Status::Ok => ":ok:",
            Status::Warn => ":warning:",
            Status::Fail => ":x:",
            Status::Skip => ":grey_question:",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "OK"),
            Status::Warn => write!(f, "WARN"),
            Status::Fail => write!(f, "FAIL"),
            Status::Skip => write!(f, "SKIP"),
        }
    }
}

/// Error types for zoo-status operations.
///
/// Only run-level conditions live here. Per-file validation and conversion
/// failures are carried as [`CheckResult`] and [`ConvertResult`] values.
#[derive(Debug, Error)]
pub enum ZooError {
    /// Input or output path is not a directory
    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// A required external extension is not installed
    #[error("{extension} is not available: {message}")]
    ExtensionMissing { extension: String, message: String },

    /// I/O error
    #[error("I/O error in {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// External command failed
    #[error("Command '{command}' error: {message}")]
    Command { command: String, message: String },

    /// Platform information could not be read or parsed
    #[error("Platform error in {context}: {message}")]
    Platform { context: String, message: String },
}

impl ZooError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ZooError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Configuration for one report run.
///
/// Built once from CLI arguments and an optional TOML file, then passed by
/// reference to every stage.
#[derive(Debug, Clone)]
pub struct ZooConfig {
    /// Root directory holding the model files
    pub models: PathBuf,
    /// Directory receiving the report
    pub output: PathBuf,
    /// Inclusion tokens (None = include all)
    pub include: Option<Vec<String>>,
    /// Version-control ref used to suffix the report name
    pub git_ref: Option<GitRef>,
    /// Echo report lines to the console
    pub verbose: bool,
    /// Skip fetch, validation, and conversion
    pub dry_run: bool,
    /// Fetch placeholders through Git LFS
    pub fetch: bool,
    /// Python interpreter running the checker and converter
    pub python: PathBuf,
    /// Scratch path for converted artifacts
    pub scratch: PathBuf,
    /// Placeholder size threshold
    pub placeholder_max_bytes: u64,
    /// Conversion failures downgraded to warnings
    pub known_limitations: KnownLimitations,
}

impl Default for ZooConfig {
    fn default() -> Self {
        ZooConfig {
            models: PathBuf::from("models"),
            output: std::env::temp_dir(),
            include: None,
            git_ref: None,
            verbose: false,
            dry_run: false,
            fetch: true,
            python: PathBuf::from("python3"),
            scratch: std::env::temp_dir().join("model.pb"),
            placeholder_max_bytes: DEFAULT_PLACEHOLDER_MAX_BYTES,
            known_limitations: KnownLimitations::builtin(),
        }
    }
}

impl ZooConfig {
    /// Create configuration from command line arguments.
    ///
    /// Values from `--config` fill in whatever the command line leaves unset.
    pub fn from_args(args: &Args) -> Result<Self, ZooError> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(args, file))
    }

    fn merge(args: &Args, file: FileConfig) -> Self {
        let defaults = ZooConfig::default();

        let include = args
            .include
            .clone()
            .or(file.include)
            .map(|tokens| {
                tokens
                    .into_iter()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|tokens| !tokens.is_empty());

        let mut known_limitations = defaults.known_limitations;
        known_limitations.extend(file.known_limitations);

        ZooConfig {
            models: args.models.clone().or(file.models).unwrap_or(defaults.models),
            output: args.output.clone().or(file.output).unwrap_or(defaults.output),
            include,
            git_ref: args.git_ref.as_deref().and_then(GitRef::parse),
            verbose: args.verbose > 0,
            dry_run: args.dry_run,
            fetch: !args.no_fetch && file.fetch.unwrap_or(true),
            python: args.python.clone().or(file.python).unwrap_or(defaults.python),
            scratch: args.scratch.clone().or(file.scratch).unwrap_or(defaults.scratch),
            placeholder_max_bytes: file
                .placeholder_max_bytes
                .unwrap_or(defaults.placeholder_max_bytes),
            known_limitations,
        }
    }

    /// Whether placeholders are fetched in this run
    pub fn fetch_enabled(&self) -> bool {
        self.fetch && !self.dry_run
    }

    /// Full path of the report file
    pub fn report_path(&self) -> PathBuf {
        self.output.join(report_file_name(self.git_ref.as_ref()))
    }
}

/// Report file name, suffixed with the tag or branch when known
pub fn report_file_name(git_ref: Option<&GitRef>) -> String {
    match git_ref.and_then(|r| r.suffix()) {
        Some(suffix) => format!("{}-{}.md", REPORT_BASENAME, suffix),
        None => format!("{}.md", REPORT_BASENAME),
    }
}

/// Render a relative path with `/` separators ("." for the root)
pub fn display_path(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Generate a status report.
///
/// This is the main entry point. It wires the Python checker/converter and
/// Git LFS into a [`ReportOrchestrator`] and runs it.
pub fn run_report(config: &ZooConfig) -> Result<ZooReport, ZooError> {
    let backend = PythonBackend::new(config.python.clone());
    let store = GitLfs::new(config.models.clone());
    ReportOrchestrator::new(config, &backend, &store).run()
}
