//! Quotation models, engine options, reports and errors.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use freightkit_io_xlsx::SheetIoError;

use crate::conf::{
    C_HEADER_DESTINATION, C_HEADER_POD, C_SUFFIX_LINE_HEADER, N_COLS_SKIP_RANK, N_DECIMALS_COST,
    N_OFFSET_SUMMARY_COST, N_OFFSET_SUMMARY_PARTNER, N_ROW_HEADER_REPORT, N_ROW_HEADER_SUMMARY,
    N_TOP_K_DEFAULT, N_WIDTH_PARTNER_COL, TUP_ANCHOR_HEADERS,
};

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Container size a cost column set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnumContainerSize {
    /// 20ft dry container.
    Feet20,
    /// 40ft high-cube container.
    Feet40,
}

impl EnumContainerSize {
    /// Both sizes in report order.
    pub const ALL: [EnumContainerSize; 2] = [Self::Feet20, Self::Feet40];

    /// Short label used in logs and audit sheet names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Feet20 => "20FT",
            Self::Feet40 => "40HC",
        }
    }
}

/// How many rows per port collapse into one figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumReduceMode {
    /// Cheapest row per port (per shipping line).
    Min,
    /// Arithmetic mean per port (partner aggregate).
    #[default]
    Mean,
}

impl EnumReduceMode {
    /// Parse a configuration value (`min` / `mean`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "min" => Some(Self::Min),
            "mean" => Some(Self::Mean),
            _ => None,
        }
    }
}

/// Column block a partner occupies in a report sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumPartnerBlock {
    /// One cost column headed by the partner name.
    #[default]
    Single,
    /// Shipping-line column followed by the cost column.
    Pair,
}

impl EnumPartnerBlock {
    /// Parse a configuration value (`single` / `pair`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "single" => Some(Self::Single),
            "pair" => Some(Self::Pair),
            _ => None,
        }
    }

    /// Columns per partner.
    pub fn width(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Pair => 2,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Layout

/// Fixed column positions of a partner quotation sheet (0-based).
///
/// The first cost column of each size is the primary (ocean freight)
/// component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecQuotationLayout {
    /// Port column.
    pub col_port: usize,
    /// Shipping-line column, if the sheet has one.
    pub col_carrier: Option<usize>,
    /// 20ft cost columns, primary first.
    pub cols_cost_20ft: Vec<usize>,
    /// 40ft cost columns, primary first.
    pub cols_cost_40ft: Vec<usize>,
}

impl SpecQuotationLayout {
    /// Column subset for one container size.
    pub fn column_set(&self, size: EnumContainerSize) -> SpecColumnSet {
        let cols_cost = match size {
            EnumContainerSize::Feet20 => self.cols_cost_20ft.clone(),
            EnumContainerSize::Feet40 => self.cols_cost_40ft.clone(),
        };
        SpecColumnSet {
            col_port: self.col_port,
            col_carrier: self.col_carrier,
            cols_cost,
        }
    }
}

/// Columns read for one container size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecColumnSet {
    /// Port column.
    pub col_port: usize,
    /// Shipping-line column.
    pub col_carrier: Option<usize>,
    /// Cost columns, primary first.
    pub cols_cost: Vec<usize>,
}

impl SpecColumnSet {
    /// Minimum sheet width this set needs.
    pub fn n_cols_required(&self) -> usize {
        self.cols_cost
            .iter()
            .copied()
            .chain([self.col_port])
            .chain(self.col_carrier)
            .max()
            .map_or(0, |n_col| n_col + 1)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CostModels

/// One raw quotation line.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecQuotationRow {
    /// Port key (trimmed, upper-case); empty when the cell was blank.
    pub port: String,
    /// Shipping-line label.
    pub carrier: Option<String>,
    /// Coerced cost cells, primary first.
    pub cost_components: Vec<Option<f64>>,
}

/// Row total after validity filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecPortCost {
    /// Port key.
    pub port: String,
    /// Shipping-line label.
    pub carrier: Option<String>,
    /// Sum of the row's non-missing components.
    pub total_cost: Option<f64>,
}

/// One representative figure per port.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecReducedPortCost {
    /// Port key, unique within a reduction.
    pub port: String,
    /// Minimum or mean total.
    pub value: f64,
    /// Winning row's shipping line (MIN only).
    pub carrier: Option<String>,
}

/// A partner's reduced costs for one container size.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecPartnerCosts {
    /// Partner display name (column header).
    pub partner_name: String,
    /// Reduced port costs.
    pub costs: Vec<SpecReducedPortCost>,
}

/// A partner's figure for one report destination.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecPartnerOffer {
    /// Partner display name.
    pub partner_name: String,
    /// Destination key.
    pub destination: String,
    /// Cost, `None` when the partner did not quote this port.
    pub cost: Option<f64>,
    /// Shipping line behind the cost.
    pub carrier: Option<String>,
}

/// One ranked offer.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecBestPriceEntry {
    /// Destination key.
    pub destination: String,
    /// Partner header text from the report.
    pub partner_name: String,
    /// Offered cost.
    pub cost: f64,
}

/// Per-destination FIFO of ranked offers, cheapest first.
///
/// Entries are consumed with [`BestPriceBook::pop`] as summary rows are
/// filled, so each offer is placed at most once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BestPriceBook {
    dict_entries: BTreeMap<String, VecDeque<SpecBestPriceEntry>>,
}

impl BestPriceBook {
    /// Empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the ranking for `destination`, replacing any earlier one.
    pub fn insert(&mut self, destination: String, entries: Vec<SpecBestPriceEntry>) {
        self.dict_entries.insert(destination, entries.into());
    }

    /// Take the cheapest remaining entry for `destination`.
    pub fn pop(&mut self, destination: &str) -> Option<SpecBestPriceEntry> {
        self.dict_entries.get_mut(destination)?.pop_front()
    }

    /// Remaining entries for `destination`, cheapest first.
    pub fn get(&self, destination: &str) -> Option<&VecDeque<SpecBestPriceEntry>> {
        self.dict_entries.get(destination)
    }

    /// Destinations in key order.
    pub fn destinations(&self) -> impl Iterator<Item = &str> {
        self.dict_entries.keys().map(String::as_str)
    }

    /// Number of destinations.
    pub fn len(&self) -> usize {
        self.dict_entries.len()
    }

    /// `true` when no destination was ranked.
    pub fn is_empty(&self) -> bool {
        self.dict_entries.is_empty()
    }

    /// Entries not yet consumed, over all destinations.
    pub fn n_entries_remaining(&self) -> usize {
        self.dict_entries.values().map(VecDeque::len).sum()
    }

    /// All remaining entries, by destination then rank.
    pub fn iter_entries(&self) -> impl Iterator<Item = &SpecBestPriceEntry> {
        self.dict_entries.values().flatten()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Partner merge options.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecMergeOptions {
    /// 0-based header row.
    pub n_row_header: usize,
    /// Accepted anchor header names (case-insensitive).
    pub anchor_headers: Vec<String>,
    /// Block layout per partner.
    pub partner_block: EnumPartnerBlock,
    /// Width applied to new columns.
    pub width_partner_col: f64,
}

impl Default for SpecMergeOptions {
    fn default() -> Self {
        Self {
            n_row_header: N_ROW_HEADER_REPORT,
            anchor_headers: TUP_ANCHOR_HEADERS.iter().map(|s| s.to_string()).collect(),
            partner_block: EnumPartnerBlock::Single,
            width_partner_col: N_WIDTH_PARTNER_COL,
        }
    }
}

/// Ranking options.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecRankOptions {
    /// 0-based header row of the report sheet.
    pub n_row_header: usize,
    /// Leading columns ignored.
    pub n_cols_skip: usize,
    /// Offers kept per destination.
    pub top_k: usize,
    /// Destination header of the report.
    pub header_pod: String,
    /// Headers never treated as partners.
    pub headers_excluded: Vec<String>,
    /// Header endings never treated as partners (shipping-line columns).
    pub header_suffixes_excluded: Vec<String>,
}

impl Default for SpecRankOptions {
    fn default() -> Self {
        Self {
            n_row_header: N_ROW_HEADER_REPORT,
            n_cols_skip: N_COLS_SKIP_RANK,
            top_k: N_TOP_K_DEFAULT,
            header_pod: C_HEADER_POD.to_string(),
            headers_excluded: vec![C_HEADER_POD.to_string(), C_HEADER_DESTINATION.to_string()],
            header_suffixes_excluded: vec![C_SUFFIX_LINE_HEADER.to_string()],
        }
    }
}

/// Summary fill options.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecFillOptions {
    /// 0-based header row of the summary sheet.
    pub n_row_header: usize,
    /// Destination header of the summary.
    pub header_destination: String,
    /// Partner column offset from the destination column.
    pub n_offset_partner: usize,
    /// Cost column offset from the destination column.
    pub n_offset_cost: usize,
    /// Decimals kept when writing costs.
    pub n_decimals: usize,
}

impl Default for SpecFillOptions {
    fn default() -> Self {
        Self {
            n_row_header: N_ROW_HEADER_SUMMARY,
            header_destination: C_HEADER_DESTINATION.to_string(),
            n_offset_partner: N_OFFSET_SUMMARY_PARTNER,
            n_offset_cost: N_OFFSET_SUMMARY_COST,
            n_decimals: N_DECIMALS_COST,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Reports

/// Result of one partner merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecMergeReport {
    /// Anchor column used.
    pub col_anchor: usize,
    /// `true` when no anchor header matched and column 0 was used.
    pub if_anchor_fallback: bool,
    /// `(partner, first column)` per merged partner, in merge order.
    pub partner_cols: Vec<(String, usize)>,
    /// Destination rows seen.
    pub cnt_destinations: usize,
    /// Cost cells written.
    pub cnt_cells_written: usize,
}

impl fmt::Display for SpecMergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[MERGE] partners={} destinations={} cells={} anchor_col={}{}",
            self.partner_cols.len(),
            self.cnt_destinations,
            self.cnt_cells_written,
            self.col_anchor,
            if self.if_anchor_fallback { " (fallback)" } else { "" }
        )
    }
}

/// Result of filling a summary sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecFillReport {
    /// Rows that received an entry.
    pub cnt_rows_filled: usize,
    /// Rows with a destination but no entry left.
    pub cnt_rows_untouched: usize,
    /// Ranked entries never placed (summary had too few rows).
    pub cnt_entries_unused: usize,
}

impl fmt::Display for SpecFillReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[BEST] filled={} untouched={} unused={}",
            self.cnt_rows_filled, self.cnt_rows_untouched, self.cnt_entries_unused
        )
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Engine failures.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    /// A required header is absent from the header row.
    #[error("Header {header:?} not found in sheet {sheet_name:?}")]
    HeaderNotFound {
        /// Sheet searched.
        sheet_name: String,
        /// Missing header.
        header: String,
    },
    /// Quotation sheet narrower than the layout.
    #[error("Sheet {sheet_name:?} has {found} columns, layout requires {required}")]
    TooFewColumns {
        /// Sheet read.
        sheet_name: String,
        /// Columns present.
        found: usize,
        /// Columns required.
        required: usize,
    },
    /// Sheet read/write failure.
    #[error(transparent)]
    SheetIo(#[from] SheetIoError),
    /// Audit frame construction failure.
    #[error("Audit frame error: {0}")]
    Frame(#[from] polars::prelude::PolarsError),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
