//! Output formatting.
//!
//! Markdown for the report file and plain text for the console.
//!
//! # Graceful Degradation
//!
//! - Missing CI environment: generic banner without links
//! - Unknown library versions: rendered as `unknown`
//! - Empty runs: valid report with zero counters
//!
//! All formatters produce valid output for any [`ZooReport`].

use crate::checks::LibraryVersion;
use crate::engine::result::{
    Environment, ReportLine, ReportSection, ResultSummary, ZooReport, PASSED,
};
use crate::{Status, ZooError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a report into a string
    fn format(&self, report: &ZooReport) -> String;
}

/// Markdown report formatter
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        MarkdownFormatter
    }

    /// Title and provenance line
    pub fn banner(&self, report: &ZooReport) -> String {
        let provenance = &report.provenance;
        let finished = report.finished_at.format(TIME_FORMAT);

        let mut origin = match (provenance.run_url(), provenance.commit_url()) {
            (Some(run_url), Some(commit_url)) => format!(
                "Generated by [workflow run {}]({}) for commit [`{}`]({})",
                provenance.run_id.as_deref().unwrap_or_default(),
                run_url,
                provenance.short_commit().unwrap_or_default(),
                commit_url
            ),
            (None, Some(commit_url)) => format!(
                "Generated for commit [`{}`]({})",
                provenance.short_commit().unwrap_or_default(),
                commit_url
            ),
            _ => "Generated locally".to_string(),
        };
        if let Some(git_ref) = &provenance.git_ref {
            origin.push_str(&format!(" on {}", git_ref.describe()));
        }

        format!("# ONNX Model Zoo Status\n\n{} at {}.\n\n", origin, finished)
    }

    /// Environment table
    pub fn environment(&self, environment: &Environment) -> String {
        let mut out = String::from("## Environment\n\nName | Value\n---- | -----\n");
        out.push_str(&format!("Platform | {}\n", environment.platform));

        let (python, libraries): (Vec<&LibraryVersion>, Vec<&LibraryVersion>) = environment
            .libraries
            .iter()
            .partition(|lib| lib.name == "Python");
        for lib in python {
            out.push_str(&format!("{} | {}\n", lib.name, library_cell(lib)));
        }

        let build = &environment.build;
        let tool = match (build.commit, build.source_url()) {
            (Some(commit), Some(url)) => {
                format!("[{} ({})]({})", build.version, short(commit), url)
            }
            (Some(commit), None) => format!("{} ({})", build.version, short(commit)),
            _ => build.version.to_string(),
        };
        out.push_str(&format!("zoo-status | {}\n", tool));

        for lib in libraries {
            out.push_str(&format!("{} | {}\n", lib.name, library_cell(lib)));
        }
        out.push('\n');
        out
    }

    /// Summary counters
    pub fn summary(&self, summary: &ResultSummary, elapsed_minutes: f64) -> String {
        let mut out = String::from("## Summary\n\nName | Value\n---- | -----\n");
        out.push_str(&format!("Model count | {}\n", summary.model_count));
        out.push_str(&format!("Total count | {}\n", summary.total_count));
        for (status, label, count) in [
            (Status::Ok, "Passed", summary.ok),
            (Status::Warn, "Known limitation", summary.warn),
            (Status::Fail, "Failed", summary.fail),
            (Status::Skip, "Skipped", summary.skip),
        ] {
            out.push_str(&format!("{} {} | {}\n", status.glyph(), label, count));
        }
        out.push_str(&format!("Elapsed | {:.1} min\n\n", elapsed_minutes));
        out
    }

    /// One details table
    pub fn section(&self, section: &ReportSection) -> String {
        let mut out = format!("### {}\n\n", section.title);
        if section.lines.is_empty() {
            out.push_str("_No model files._\n\n");
            return out;
        }
        out.push_str(&ReportLine::header());
        out.push('\n');
        out.push_str(&ReportLine::separator());
        out.push('\n');
        for line in &section.lines {
            out.push_str(&line.to_row());
            out.push('\n');
        }
        out.push('\n');
        out
    }

    fn chunks(&self, report: &ZooReport) -> Vec<String> {
        let mut chunks = vec![
            self.banner(report),
            self.environment(&report.environment),
            self.summary(&report.summary, report.elapsed_minutes()),
            "## Details\n\n".to_string(),
        ];
        chunks.extend(report.sections.iter().map(|s| self.section(s)));
        chunks
    }

    /// Append the report to `path`, one section at a time
    pub fn write_report(&self, report: &ZooReport, path: &Path) -> Result<(), ZooError> {
        let context = || format!("writing {}", path.display());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| ZooError::io(context(), e))?;

        for chunk in self.chunks(report) {
            file.write_all(chunk.as_bytes())
                .map_err(|e| ZooError::io(context(), e))?;
        }
        file.flush().map_err(|e| ZooError::io(context(), e))
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format(&self, report: &ZooReport) -> String {
        self.chunks(report).concat()
    }
}

fn library_cell(lib: &LibraryVersion) -> String {
    let version = lib.version.as_deref().unwrap_or("unknown");
    match &lib.source_url {
        Some(url) => format!("[{}]({})", version, url),
        None => version.to_string(),
    }
}

fn short(commit: &str) -> &str {
    commit.get(..7).unwrap_or(commit)
}

/// Console summary formatter
pub struct TerminalFormatter {
    color: bool,
    quiet: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool, quiet: bool) -> Self {
        TerminalFormatter { color, quiet }
    }

    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.colorize(text, "32")
    }

    fn yellow(&self, text: &str) -> String {
        self.colorize(text, "33")
    }

    fn red(&self, text: &str) -> String {
        self.colorize(text, "31")
    }

    fn gray(&self, text: &str) -> String {
        self.colorize(text, "90")
    }

    fn status(&self, status: Status) -> String {
        let label = format!("[{}]", status);
        match status {
            Status::Ok => self.green(&label),
            Status::Warn => self.yellow(&label),
            Status::Fail => self.red(&label),
            Status::Skip => self.gray(&label),
        }
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, report: &ZooReport) -> String {
        let mut output = String::new();
        let summary = &report.summary;

        // Quiet mode lists failures and nothing else
        if !self.quiet {
            output.push_str("--------------------------------------------------------------------------------\n");
            output.push_str("zoo-status report\n");
            output.push_str(&format!("Host:     {}\n", report.environment.hostname));
            output.push_str(&format!("Started:  {}\n", report.started_at.format(TIME_FORMAT)));
            output.push_str(&format!("Finished: {}\n", report.finished_at.format(TIME_FORMAT)));
            output.push_str(&format!("Elapsed:  {:.1} mins\n", report.elapsed_minutes()));
            output.push_str("--------------------------------------------------------------------------------\n\n");
        }

        for line in report.lines() {
            let shown = match line.status {
                Status::Fail => true,
                Status::Warn => !self.quiet,
                Status::Ok | Status::Skip => false,
            };
            if shown {
                let reason = if line.validated == PASSED {
                    &line.converted
                } else {
                    &line.validated
                };
                output.push_str(&format!(
                    "{} {}\n       {}\n",
                    self.status(line.status),
                    line.filename,
                    reason
                ));
            }
        }

        if self.quiet {
            return output;
        }

        if summary.warn + summary.fail > 0 {
            output.push('\n');
        }
        output.push_str(&format!(
            "Models: {}  Files: {}\n",
            summary.model_count, summary.total_count
        ));
        output.push_str(&format!(
            "Summary: {} passed, {} warnings, {} failed, {} skipped\n",
            self.green(&summary.ok.to_string()),
            self.yellow(&summary.warn.to_string()),
            self.red(&summary.fail.to_string()),
            self.gray(&summary.skip.to_string())
        ));

        match &report.destination {
            Some(path) => output.push_str(&format!("Report: {}\n", path.display())),
            None if report.dry_run => output.push_str("Dry run: no report written\n"),
            None => {}
        }
        output
    }
}
