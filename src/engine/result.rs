//! Result aggregation.
//!
//! Collects report lines into per-directory sections and keeps the summary
//! counters. Rendering lives in [`crate::cli::output`].

use crate::checks::{LibraryVersion, ModelInfo};
use crate::platform::ci::Provenance;
use crate::version::BuildInfo;
use crate::{display_path, CheckResult, ConvertResult, ModelFile, Status};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Cell value for a passed check or conversion
pub const PASSED: &str = ":heavy_check_mark:";

/// Cell value for a conversion that was never attempted
pub const NOT_ATTEMPTED: &str = ":heavy_minus_sign:";

/// Column titles of a details table
pub const COLUMNS: [&str; 8] = [
    "Status",
    "#",
    "Model",
    "Size",
    "IR",
    "Opset",
    "Validated",
    "Converted",
];

/// One row of the details table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub status: Status,
    pub index: u32,
    /// Path relative to the models root
    pub filename: String,
    pub size: String,
    pub ir_version: Option<i64>,
    pub opset_version: Option<i64>,
    pub validated: String,
    pub converted: String,
    /// Directory holding the file, relative to the root
    pub parent: PathBuf,
}

impl ReportLine {
    fn base(file: &ModelFile, status: Status) -> Self {
        ReportLine {
            status,
            index: file.index,
            filename: file.display_name(),
            size: format_size(file.size),
            ir_version: None,
            opset_version: None,
            validated: String::new(),
            converted: String::new(),
            parent: file
                .relative
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }

    /// Line for a file that was never handed to the backend
    pub fn skipped(file: &ModelFile) -> Self {
        Self::base(file, Status::Skip)
    }

    /// Line for a file whose header could not be read
    pub fn unreadable(file: &ModelFile, descriptor: String) -> Self {
        let mut line = Self::base(file, Status::Fail);
        line.validated = descriptor;
        line.converted = NOT_ATTEMPTED.to_string();
        line
    }

    /// Line for a fully evaluated file
    pub fn evaluated(
        file: &ModelFile,
        info: &ModelInfo,
        check: &CheckResult,
        convert: &ConvertResult,
        status: Status,
    ) -> Self {
        let mut line = Self::base(file, status);
        line.ir_version = info.ir_version;
        line.opset_version = info.opset_version;
        line.validated = match check {
            CheckResult::Pass => PASSED.to_string(),
            CheckResult::Fail(descriptor) => descriptor.clone(),
            CheckResult::Skipped => String::new(),
        };
        line.converted = match convert {
            ConvertResult::Pass => PASSED.to_string(),
            ConvertResult::KnownLimitation(descriptor) | ConvertResult::Fail(descriptor) => {
                descriptor.clone()
            }
            ConvertResult::Skipped => NOT_ATTEMPTED.to_string(),
        };
        line
    }

    /// The eight table cells, escaped for markdown
    pub fn cells(&self) -> [String; 8] {
        let version = |v: Option<i64>| v.map(|v| v.to_string()).unwrap_or_default();
        [
            self.status.glyph().to_string(),
            self.index.to_string(),
            escape_cell(&self.filename),
            self.size.clone(),
            version(self.ir_version),
            version(self.opset_version),
            escape_cell(&self.validated),
            escape_cell(&self.converted),
        ]
    }

    /// Table row, cells joined by `" | "`
    pub fn to_row(&self) -> String {
        self.cells().join(" | ")
    }

    pub fn header() -> String {
        COLUMNS.join(" | ")
    }

    pub fn separator() -> String {
        COLUMNS
            .iter()
            .map(|c| "-".repeat(c.len().max(3)))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Keep a table cell on one line and stop it from splitting the row
pub fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

/// Human-readable size: bytes below 1 KiB, else rounded K, M or G
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;

    let scaled = |unit: u64| (bytes as f64 / unit as f64).round() as u64;
    if bytes < KIB {
        format!("{}B", bytes)
    } else if bytes < MIB {
        format!("{}K", scaled(KIB))
    } else if bytes < GIB {
        format!("{}M", scaled(MIB))
    } else {
        format!("{}G", scaled(GIB))
    }
}

/// Result summary statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultSummary {
    pub model_count: u32,
    pub total_count: u32,
    pub ok: u32,
    pub warn: u32,
    pub fail: u32,
    pub skip: u32,
}

impl ResultSummary {
    pub fn record(&mut self, status: Status) {
        self.total_count += 1;
        match status {
            Status::Ok => self.ok += 1,
            Status::Warn => self.warn += 1,
            Status::Fail => self.fail += 1,
            Status::Skip => self.skip += 1,
        }
    }

    /// Every file landed in exactly one bucket
    pub fn is_consistent(&self) -> bool {
        self.ok + self.warn + self.fail + self.skip == self.total_count
    }

    /// Process exit code. Without `strict` a produced report is success.
    pub fn exit_code(&self, strict: bool) -> u8 {
        if !strict {
            0
        } else if self.fail > 0 {
            1
        } else if self.warn > 0 {
            2
        } else {
            0
        }
    }
}

/// Lines under one directory heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    /// Directory relative to the root
    pub directory: PathBuf,
    pub title: String,
    /// False for the catch-all section of files outside any model directory
    pub model_bearing: bool,
    pub lines: Vec<ReportLine>,
}

impl ReportSection {
    fn new(directory: PathBuf, model_bearing: bool) -> Self {
        ReportSection {
            title: display_path(&directory),
            directory,
            model_bearing,
            lines: Vec::new(),
        }
    }
}

/// Environment metadata shown at the top of the report
#[derive(Debug, Clone)]
pub struct Environment {
    pub hostname: String,
    pub platform: String,
    pub build: BuildInfo,
    /// Interpreter first, then libraries
    pub libraries: Vec<LibraryVersion>,
}

/// A finished report run
#[derive(Debug, Clone)]
pub struct ZooReport {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub provenance: Provenance,
    pub environment: Environment,
    pub summary: ResultSummary,
    pub sections: Vec<ReportSection>,
    /// Where the report was written (None in dry-run)
    pub destination: Option<PathBuf>,
    pub dry_run: bool,
}

impl ZooReport {
    /// Wall-clock duration in minutes, one decimal
    pub fn elapsed_minutes(&self) -> f64 {
        let seconds = (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0;
        (seconds / 60.0 * 10.0).round() / 10.0
    }

    /// All lines in report order
    pub fn lines(&self) -> impl Iterator<Item = &ReportLine> {
        self.sections.iter().flat_map(|s| s.lines.iter())
    }
}

/// Result aggregator for collecting report lines
#[derive(Debug, Default)]
pub struct ResultAggregator {
    sections: Vec<ReportSection>,
    summary: ResultSummary,
    /// With a filter, only directories that contribute a line are counted
    filtered: bool,
}

impl ResultAggregator {
    pub fn new(filtered: bool) -> Self {
        ResultAggregator {
            filtered,
            ..Default::default()
        }
    }

    /// Start a section for a model-bearing directory
    pub fn open_section(&mut self, directory: PathBuf) {
        if !self.filtered {
            self.summary.model_count += 1;
        }
        self.sections.push(ReportSection::new(directory, true));
    }

    /// Add a line under its nearest model-bearing ancestor
    pub fn add_line(&mut self, line: ReportLine) {
        self.summary.record(line.status);

        let index = match self
            .sections
            .iter()
            .rposition(|s| s.model_bearing && line.parent.starts_with(&s.directory))
        {
            Some(index) => index,
            None => self.root_section(),
        };

        let section = &mut self.sections[index];
        if self.filtered && section.model_bearing && section.lines.is_empty() {
            self.summary.model_count += 1;
        }
        section.lines.push(line);
    }

    /// Index of the catch-all section, created on first use
    fn root_section(&mut self) -> usize {
        match self.sections.iter().position(|s| !s.model_bearing) {
            Some(index) => index,
            None => {
                self.sections.push(ReportSection::new(PathBuf::new(), false));
                self.sections.len() - 1
            }
        }
    }

    /// Sections in report order. Under a filter, empty ones are dropped.
    pub fn into_sections(self) -> (Vec<ReportSection>, ResultSummary) {
        let filtered = self.filtered;
        let sections = self
            .sections
            .into_iter()
            .filter(|s| !filtered || !s.lines.is_empty())
            .collect();
        (sections, self.summary)
    }
}
