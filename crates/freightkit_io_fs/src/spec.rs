//! Input scan and template copy specification models and error types.

use std::path::PathBuf;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Existing destination file conflict policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumCopyFileConflictStrategy {
    /// Keep destination file and skip the copy.
    Skip,
    /// Replace destination file with source file.
    #[default]
    Overwrite,
    /// Fail when the destination already exists.
    Error,
}

impl EnumCopyFileConflictStrategy {
    /// Parse a configuration value (`skip` / `overwrite` / `error`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "skip" => Some(Self::Skip),
            "overwrite" => Some(Self::Overwrite),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// What [`crate::copy::copy_template`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopyOutcome {
    /// Destination written from the template.
    Copied,
    /// Destination existed and was kept.
    Skipped,
}

/// Overall run result derived from counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumRunOutcome {
    /// No failures.
    Success,
    /// Some files failed; results were written for the rest.
    PartialFailure,
    /// Failures and no successes.
    TotalFailure,
}

impl EnumRunOutcome {
    /// Process exit code for this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::PartialFailure => 2,
            Self::TotalFailure => 1,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Include/exclude glob lists applied to input file names.
///
/// Matching is case-insensitive. An empty include list accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecInputPatterns {
    /// File names must match at least one of these globs.
    pub patterns_include: Vec<String>,
    /// File names matching any of these globs are dropped.
    pub patterns_exclude: Vec<String>,
}

/// One path-scoped failure recorded in a run report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRunError {
    /// Failed file.
    pub path: PathBuf,
    /// User-facing error text.
    pub exception: String,
}

/// Filesystem failures.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// Include/exclude glob did not compile.
    #[error("Invalid pattern in include/exclude: {0}")]
    InvalidPattern(String),
    /// Path is not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotDirectory(PathBuf),
    /// Source file does not exist.
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// Destination exists and the conflict rule is `Error`.
    #[error("Destination exists: {}", .0.display())]
    DestinationExists(PathBuf),
    /// Underlying IO failure.
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
