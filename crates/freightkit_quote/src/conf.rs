//! Report layout constants and default presets.

use crate::spec::SpecQuotationLayout;

/// 0-based header row of report sheets (three title rows above it).
pub const N_ROW_HEADER_REPORT: usize = 3;
/// 0-based header row of best-price summary sheets.
pub const N_ROW_HEADER_SUMMARY: usize = 4;
/// Leading report columns never treated as partner columns.
pub const N_COLS_SKIP_RANK: usize = 2;
/// Best offers kept per destination.
pub const N_TOP_K_DEFAULT: usize = 4;
/// Width of newly written partner columns.
pub const N_WIDTH_PARTNER_COL: f64 = 18.0;
/// Summary column of the partner name, relative to `DESTINATION`.
pub const N_OFFSET_SUMMARY_PARTNER: usize = 2;
/// Summary column of the cost, relative to `DESTINATION`.
pub const N_OFFSET_SUMMARY_COST: usize = 3;
/// Decimals kept for summary costs.
pub const N_DECIMALS_COST: usize = 2;

/// Report header naming the destination column.
pub const C_HEADER_POD: &str = "POD";
/// Summary header naming the destination column.
pub const C_HEADER_DESTINATION: &str = "DESTINATION";
/// Accepted anchor headers for partner merges.
pub const TUP_ANCHOR_HEADERS: [&str; 2] = ["POD", "Port of Discharge"];
/// Header suffix of the shipping-line column in a pair block.
pub const C_SUFFIX_LINE_HEADER: &str = " LINE";

/// Partner quotation contract: port in `A`, shipping line in `B`, then
/// interleaved 20ft/40ft freight and shared surcharges.
pub fn derive_default_layout() -> SpecQuotationLayout {
    SpecQuotationLayout {
        col_port: 0,
        col_carrier: Some(1),
        cols_cost_20ft: vec![2, 4, 6, 7, 8, 9, 10, 11],
        cols_cost_40ft: vec![3, 5, 6, 7, 8, 9, 10, 12],
    }
}
