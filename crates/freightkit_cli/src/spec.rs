//! Configuration models and application errors.

use std::collections::BTreeMap;
use std::path::PathBuf;

use freightkit_io_fs::{EnumCopyFileConflictStrategy, FsError};
use freightkit_io_xlsx::SheetIoError;
use freightkit_quote::{
    EnumContainerSize, EnumPartnerBlock, EnumReduceMode, QuoteError, SpecQuotationLayout,
    derive_default_layout,
};
use serde::Deserialize;

use crate::conf::{TUP_PATTERNS_EXCLUDE_DEFAULT, TUP_PATTERNS_INCLUDE_DEFAULT};

////////////////////////////////////////////////////////////////////////////////
// #region Config

/// Whole configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpecAppConfig {
    /// Input side.
    pub quotation: SpecQuotationSection,
    /// Output side.
    pub report: SpecReportSection,
    /// Areas keyed by name (`area1`, `area2`, ...).
    #[serde(default)]
    pub areas: BTreeMap<String, SpecAreaSection>,
}

/// `[quotation]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpecQuotationSection {
    /// Directory holding partner files.
    pub input_path: PathBuf,
    /// Sheet read from every partner file.
    pub input_sheet: String,
    /// Rows above the header row.
    #[serde(default)]
    pub n_rows_skip: usize,
    /// `mean` or `min`.
    #[serde(default = "derive_default_reduce_mode")]
    pub reduce_mode: String,
    /// Input include globs.
    #[serde(default = "derive_default_patterns_include")]
    pub patterns_include: Vec<String>,
    /// Input exclude globs.
    #[serde(default = "derive_default_patterns_exclude")]
    pub patterns_exclude: Vec<String>,
    /// Column layout override.
    #[serde(default)]
    pub layout: Option<SpecLayoutSection>,
}

/// `[quotation.layout]`, 0-based column positions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecLayoutSection {
    /// Port column.
    pub col_port: usize,
    /// Shipping-line column.
    #[serde(default)]
    pub col_carrier: Option<usize>,
    /// 20ft cost columns, primary first.
    pub cols_cost_20ft: Vec<usize>,
    /// 40ft cost columns, primary first.
    pub cols_cost_40ft: Vec<usize>,
}

/// `[report]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpecReportSection {
    /// Directory receiving report workbooks.
    pub output_path: PathBuf,
    /// Directory holding area templates.
    pub template_path: PathBuf,
    /// Offers kept per destination.
    #[serde(default = "derive_default_top_k")]
    pub top_k: usize,
    /// `single` or `pair`.
    #[serde(default = "derive_default_partner_block")]
    pub partner_block: String,
    /// `overwrite`, `skip` or `error`.
    #[serde(default = "derive_default_rule_conflict")]
    pub rule_conflict: String,
    /// Audit workbook name inside `output_path`.
    #[serde(default)]
    pub audit_file: Option<String>,
}

/// `[areas.<name>]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpecAreaSection {
    /// Disabled areas still route files but skip them.
    #[serde(default = "derive_default_process")]
    pub process: bool,
    /// File stem suffix routing files to this area.
    pub suffix: String,
    /// Template file name inside `template_path`.
    pub template_file: String,
    /// 20ft sheets.
    pub feet20: SpecSheetPair,
    /// 40ft sheets.
    pub feet40: SpecSheetPair,
}

impl SpecAreaSection {
    /// Sheets for one container size.
    pub fn sheets(&self, size: EnumContainerSize) -> &SpecSheetPair {
        match size {
            EnumContainerSize::Feet20 => &self.feet20,
            EnumContainerSize::Feet40 => &self.feet40,
        }
    }
}

/// Report and summary sheet names for one size.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecSheetPair {
    /// Sheet receiving partner columns.
    pub report_sheet: String,
    /// Sheet receiving ranked best prices.
    pub bestprices_sheet: String,
}

impl SpecQuotationSection {
    /// Configured layout, or the partner file contract.
    pub fn derive_layout(&self) -> SpecQuotationLayout {
        match &self.layout {
            Some(layout) => SpecQuotationLayout {
                col_port: layout.col_port,
                col_carrier: layout.col_carrier,
                cols_cost_20ft: layout.cols_cost_20ft.clone(),
                cols_cost_40ft: layout.cols_cost_40ft.clone(),
            },
            None => derive_default_layout(),
        }
    }
}

/// Validated engine settings resolved from the configuration strings.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecRunSettings {
    /// Column layout of partner files.
    pub layout: SpecQuotationLayout,
    /// Per-port reduction.
    pub reduce_mode: EnumReduceMode,
    /// Partner block in report sheets.
    pub partner_block: EnumPartnerBlock,
    /// Existing report file handling.
    pub rule_conflict: EnumCopyFileConflictStrategy,
}

fn derive_default_reduce_mode() -> String {
    "mean".to_string()
}

fn derive_default_patterns_include() -> Vec<String> {
    TUP_PATTERNS_INCLUDE_DEFAULT.iter().map(|s| s.to_string()).collect()
}

fn derive_default_patterns_exclude() -> Vec<String> {
    TUP_PATTERNS_EXCLUDE_DEFAULT.iter().map(|s| s.to_string()).collect()
}

fn derive_default_top_k() -> usize {
    freightkit_quote::N_TOP_K_DEFAULT
}

fn derive_default_partner_block() -> String {
    "single".to_string()
}

fn derive_default_rule_conflict() -> String {
    "overwrite".to_string()
}

fn derive_default_process() -> bool {
    true
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Configuration load/validation failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File was missing; a template was written in its place.
    #[error("Configuration {} not found, template file has been generated", .0.display())]
    TemplateCreated(PathBuf),
    /// File could not be read or the template could not be written.
    #[error("Failed to access configuration {}: {source}", .path.display())]
    Io {
        /// Configuration path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// TOML syntax or missing required key.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// Semantically invalid value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Dotted key.
        key: String,
        /// What is wrong.
        message: String,
    },
}

/// Fatal run failures. Per-file failures are recorded in the run report
/// instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A configured path is missing.
    #[error("{what} '{}' not found", .path.display())]
    MissingPath {
        /// Role of the path.
        what: String,
        /// Missing path.
        path: PathBuf,
    },
    /// Logger could not be installed.
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
    /// Filesystem failure.
    #[error(transparent)]
    Fs(#[from] FsError),
    /// Engine failure.
    #[error(transparent)]
    Quote(#[from] QuoteError),
    /// Workbook failure.
    #[error(transparent)]
    SheetIo(#[from] SheetIoError),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
