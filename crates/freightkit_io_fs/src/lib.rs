//! `freightkit_io_fs`:
//! Filesystem side of the quotation batch.
//!
//! - `scan`   : input enumeration, suffix routing, partner names
//! - `copy`   : report template copy
//! - `spec`   : enums/options/errors
//! - `report` : run-time report model
//! - `util`   : shared helper functions

pub mod copy;
pub mod report;
pub mod scan;
pub mod spec;
mod util;

pub use copy::copy_template;
pub use report::{ReportRun, ReportRunBuilder};
pub use scan::{derive_partner_name, list_input_files, route_by_suffix};
pub use spec::{
    EnumCopyFileConflictStrategy, EnumCopyOutcome, EnumRunOutcome, FsError, SpecInputPatterns,
    SpecRunError,
};
