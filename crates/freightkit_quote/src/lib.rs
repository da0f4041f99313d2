//! `freightkit_quote`:
//! Quotation aggregation and ranking engine.
//!
//! Pipeline: quotation table → `extract` → `aggregate` → `reduce` →
//! `merge` into report sheets → `rank` into summary sheets.
//!
//! - `conf`      : layout constants and default layout
//! - `spec`      : models/options/reports/errors
//! - `extract`   : position-based column sets
//! - `aggregate` : validity filter and row totals
//! - `reduce`    : one figure per port (min / mean)
//! - `merge`     : append-only partner column blocks
//! - `rank`      : best-price book and summary fill
//! - `audit`     : polars frames for the audit workbook
pub mod aggregate;
pub mod audit;
pub mod conf;
pub mod extract;
pub mod merge;
pub mod rank;
pub mod reduce;
pub mod spec;

pub use aggregate::{aggregate, aggregate_rows};
pub use audit::{derive_best_prices_frame, derive_partner_costs_frame};
pub use conf::{N_TOP_K_DEFAULT, derive_default_layout};
pub use extract::extract_rows;
pub use merge::{derive_partner_offers, merge_partner_columns};
pub use rank::{fill_best_prices, rank_and_fill_best_prices, rank_best_prices, round_to_decimals};
pub use reduce::reduce_ports;
pub use spec::{
    BestPriceBook, EnumContainerSize, EnumPartnerBlock, EnumReduceMode, QuoteError,
    SpecBestPriceEntry, SpecColumnSet, SpecFillOptions, SpecFillReport, SpecMergeOptions,
    SpecMergeReport, SpecPartnerCosts, SpecPartnerOffer, SpecPortCost, SpecQuotationLayout,
    SpecQuotationRow, SpecRankOptions, SpecReducedPortCost,
};
