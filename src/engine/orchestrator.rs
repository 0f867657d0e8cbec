//! Report orchestrator.
//!
//! Drives one report run: fatal precondition checks, the walk, per-file
//! fetch and evaluation, then rendering.
//!
//! # Graceful Degradation
//!
//! Only the preconditions are fatal:
//! - Missing models or output directory: `DirectoryNotFound`
//! - Fetch enabled but no LFS extension: `ExtensionMissing`
//! - Stale report that cannot be removed, or report write failure: `Io`
//!
//! Everything after that degrades per file:
//! - Fetch failure: logged, file reported skipped
//! - Restore failure: logged, run continues
//! - Backend failure: descriptor in the report line

use crate::checks::classify::overall_status;
use crate::checks::{run_check, run_convert, ModelBackend};
use crate::cli::output::MarkdownFormatter;
use crate::engine::result::{Environment, ReportLine, ResultAggregator, ZooReport};
use crate::engine::walker::{walk, InclusionFilter, WalkEvent};
use crate::platform::ci::Provenance;
use crate::platform::lfs::LargeFileStore;
use crate::platform::linux;
use crate::version::get_build_info;
use crate::{CheckResult, ConvertResult, ModelFile, ZooConfig, ZooError};
use chrono::Local;
use std::path::Path;
use tracing::{debug, info, warn};

/// Report orchestrator
pub struct ReportOrchestrator<'a> {
    config: &'a ZooConfig,
    backend: &'a dyn ModelBackend,
    store: &'a dyn LargeFileStore,
}

impl<'a> ReportOrchestrator<'a> {
    pub fn new(
        config: &'a ZooConfig,
        backend: &'a dyn ModelBackend,
        store: &'a dyn LargeFileStore,
    ) -> Self {
        ReportOrchestrator {
            config,
            backend,
            store,
        }
    }

    /// Run the whole pipeline and return the finished report
    pub fn run(&self) -> Result<ZooReport, ZooError> {
        let config = self.config;

        require_dir(&config.models)?;
        require_dir(&config.output)?;
        if config.fetch_enabled() {
            self.store.ensure_available()?;
        }

        let destination = config.report_path();
        if !config.dry_run {
            remove_stale_report(&destination)?;
        }

        let provenance = Provenance::from_env();
        let started_at = Local::now();
        info!(
            models = %config.models.display(),
            report = %destination.display(),
            dry_run = config.dry_run,
            fetch = config.fetch_enabled(),
            "starting report"
        );

        let filter = config.include.clone().map(InclusionFilter::new);
        let mut aggregator = ResultAggregator::new(filter.is_some());

        for event in walk(&config.models, filter) {
            match event {
                WalkEvent::Section(directory) => {
                    debug!(directory = %directory.display(), "model directory");
                    aggregator.open_section(directory);
                }
                WalkEvent::Model(file) => {
                    let line = self.process(file);
                    if config.verbose {
                        println!("{}", line.to_row());
                    }
                    aggregator.add_line(line);
                }
            }
        }

        let environment = Environment {
            hostname: linux::get_hostname().unwrap_or_else(|_| "unknown".to_string()),
            platform: linux::platform_description(),
            build: get_build_info(),
            libraries: self.backend.versions(),
        };

        let (sections, summary) = aggregator.into_sections();
        let mut report = ZooReport {
            started_at,
            finished_at: Local::now(),
            provenance,
            environment,
            summary,
            sections,
            destination: None,
            dry_run: config.dry_run,
        };

        if !config.dry_run {
            MarkdownFormatter::new().write_report(&report, &destination)?;
            report.destination = Some(destination);
        }

        info!(
            total = summary.total_count,
            ok = summary.ok,
            warn = summary.warn,
            fail = summary.fail,
            skip = summary.skip,
            "report finished"
        );
        Ok(report)
    }

    /// Produce the report line for one file
    fn process(&self, mut file: ModelFile) -> ReportLine {
        let max_bytes = self.config.placeholder_max_bytes;

        if self.config.dry_run {
            return ReportLine::skipped(&file);
        }

        let mut fetched = false;
        if file.is_placeholder(max_bytes) {
            if !self.config.fetch_enabled() {
                debug!(file = %file.display_name(), "placeholder, fetch disabled");
                return ReportLine::skipped(&file);
            }

            match self.store.fetch(&file.path) {
                Ok(()) => {
                    fetched = true;
                    match std::fs::metadata(&file.path) {
                        Ok(meta) => file.size = meta.len(),
                        Err(e) => {
                            warn!(file = %file.display_name(), error = %e, "cannot stat fetched file")
                        }
                    }
                }
                Err(e) => warn!(file = %file.display_name(), error = %e, "fetch failed"),
            }

            if file.is_placeholder(max_bytes) {
                if fetched {
                    self.restore(&file);
                }
                return ReportLine::skipped(&file);
            }
        }

        let line = self.evaluate(&file);
        if fetched {
            self.restore(&file);
        }
        line
    }

    /// Inspect, validate and (if valid) convert
    fn evaluate(&self, file: &ModelFile) -> ReportLine {
        let info = match self.backend.inspect(&file.path) {
            Ok(info) => info,
            Err(failure) => {
                debug!(file = %file.display_name(), error = %failure, "cannot read model");
                return ReportLine::unreadable(file, failure.check_descriptor());
            }
        };

        let check = run_check(self.backend, &file.path);
        let convert = if check == CheckResult::Pass {
            run_convert(
                self.backend,
                &file.path,
                &self.config.scratch,
                &self.config.known_limitations,
            )
        } else {
            ConvertResult::Skipped
        };

        let status = overall_status(&check, &convert);
        debug!(file = %file.display_name(), %status, "evaluated");
        ReportLine::evaluated(file, &info, &check, &convert, status)
    }

    fn restore(&self, file: &ModelFile) {
        if let Err(e) = self.store.restore_placeholder(&file.path) {
            warn!(file = %file.display_name(), error = %e, "could not restore placeholder");
        }
    }
}

fn require_dir(path: &Path) -> Result<(), ZooError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ZooError::DirectoryNotFound {
            path: path.to_path_buf(),
        })
    }
}

fn remove_stale_report(path: &Path) -> Result<(), ZooError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(report = %path.display(), "removed previous report");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ZooError::io(format!("removing {}", path.display()), e)),
    }
}
