//! Outcome classification.
//!
//! Maps check and convert results onto the four report buckets, in priority
//! order: dry-run and placeholders skip, a failed check fails, a clean
//! conversion passes, and a failed conversion is a warning only when it
//! carries a known-limitation marker.

use super::AdapterFailure;
use crate::data::markers::{builtin_limitations, KnownLimitation};
use crate::{CheckResult, ConvertResult, Status};
use tracing::debug;

/// Marker table used to recognize documented conversion gaps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownLimitations {
    entries: Vec<KnownLimitation>,
}

impl KnownLimitations {
    /// The built-in marker table
    pub fn builtin() -> Self {
        KnownLimitations {
            entries: builtin_limitations(),
        }
    }

    /// An empty table (every conversion failure is a failure)
    pub fn none() -> Self {
        KnownLimitations {
            entries: Vec::new(),
        }
    }

    pub fn extend(&mut self, extra: impl IntoIterator<Item = KnownLimitation>) {
        self.entries.extend(extra);
    }

    pub fn entries(&self) -> &[KnownLimitation] {
        &self.entries
    }

    /// First marker found in the failure, if any
    pub fn find(&self, failure: &AdapterFailure) -> Option<&KnownLimitation> {
        let text = failure.to_string();
        self.entries
            .iter()
            .find(|entry| !entry.pattern.is_empty() && text.contains(&entry.pattern))
    }

    /// Classify a conversion failure
    pub fn classify(&self, failure: &AdapterFailure) -> ConvertResult {
        let descriptor = failure.convert_descriptor();
        match self.find(failure) {
            Some(entry) => {
                debug!(pattern = %entry.pattern, kind = %entry.kind, "known limitation");
                ConvertResult::KnownLimitation(descriptor)
            }
            None => ConvertResult::Fail(descriptor),
        }
    }
}

impl Default for KnownLimitations {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Overall status for a file that was actually evaluated
pub fn overall_status(check: &CheckResult, convert: &ConvertResult) -> Status {
    match (check, convert) {
        (CheckResult::Skipped, _) => Status::Skip,
        (CheckResult::Fail(_), _) => Status::Fail,
        (CheckResult::Pass, ConvertResult::Pass) => Status::Ok,
        (CheckResult::Pass, ConvertResult::KnownLimitation(_)) => Status::Warn,
        (CheckResult::Pass, ConvertResult::Fail(_)) => Status::Fail,
        (CheckResult::Pass, ConvertResult::Skipped) => Status::Skip,
    }
}
