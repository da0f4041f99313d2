//! Run report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::spec::{EnumRunOutcome, SpecRunError};

/// Aggregate counters and diagnostics for one batch run.
#[derive(Debug, Default, Clone)]
pub struct ReportRun {
    /// Input files that passed the include/exclude patterns.
    pub cnt_scanned: u64,
    /// Files processed successfully.
    pub cnt_processed: u64,
    /// Files skipped (no matching area, or area disabled).
    pub cnt_skipped: u64,
    /// Non-fatal warnings collected during the run.
    pub warnings: Vec<String>,
    /// Per-file failures.
    pub errors: Vec<SpecRunError>,
}

impl ReportRun {
    /// Number of collected hard errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// `Success` without errors, `PartialFailure` when something still
    /// succeeded, `TotalFailure` otherwise.
    pub fn outcome(&self) -> EnumRunOutcome {
        if self.errors.is_empty() {
            EnumRunOutcome::Success
        } else if self.cnt_processed > 0 {
            EnumRunOutcome::PartialFailure
        } else {
            EnumRunOutcome::TotalFailure
        }
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_processed".to_string(), self.cnt_processed);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} scanned={} processed={} skipped={} errors={} warnings={}",
            dict_counts["cnt_scanned"],
            dict_counts["cnt_processed"],
            dict_counts["cnt_skipped"],
            dict_counts["cnt_errors"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[RUN]"))
    }
}

/// Mutable accumulator for run statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportRunBuilder {
    /// See [`ReportRun::cnt_scanned`].
    pub cnt_scanned: u64,
    /// See [`ReportRun::cnt_processed`].
    pub cnt_processed: u64,
    /// See [`ReportRun::cnt_skipped`].
    pub cnt_skipped: u64,
    /// See [`ReportRun::errors`].
    pub errors: Vec<SpecRunError>,
    /// See [`ReportRun::warnings`].
    pub warnings: Vec<String>,
}

impl ReportRunBuilder {
    /// Increment scanned count by one.
    pub fn add_scanned(&mut self) {
        self.cnt_scanned += 1;
    }

    /// Increment processed count by one.
    pub fn add_processed(&mut self) {
        self.cnt_processed += 1;
    }

    /// Increment skipped count by one.
    pub fn add_skipped(&mut self) {
        self.cnt_skipped += 1;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Add one path-scoped error.
    pub fn add_error(&mut self, path: PathBuf, exception: String) {
        self.errors.push(SpecRunError { path, exception });
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportRun {
        ReportRun {
            cnt_scanned: self.cnt_scanned,
            cnt_processed: self.cnt_processed,
            cnt_skipped: self.cnt_skipped,
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}
