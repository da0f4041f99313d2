//! `freightkit_io_xlsx`:
//! Workbook I/O for the quotation engine.
//!
//! Modules:
//! - `conf`     : constants and default format presets
//! - `spec`     : cell values, tables, formats and errors
//! - `util`     : pure helpers (coercion, keys, sheet names, index casts)
//! - `grid`     : `SheetGrid` trait and the in-memory sheet
//! - `reader`   : tabular reads of partner workbooks (`.xls`/`.xlsx`/`.xlsb`)
//! - `workbook` : in-place edits of report workbooks with explicit saves
//! - `writer`   : audit workbook output from polars frames
pub mod conf;
pub mod grid;
pub mod reader;
pub mod spec;
pub mod util;
pub mod workbook;
pub mod writer;

pub use conf::{N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_XLSX_READABLE_EXTENSIONS};
pub use grid::{MemorySheet, SheetGrid};
pub use reader::read_table;
pub use spec::{EnumCellValue, SheetIoError, SpecCellFormat, SpecTable};
pub use util::{convert_cell_to_f64, derive_cell_key, derive_cell_text, normalize_key};
pub use workbook::{XlsxSheetMut, XlsxWorkbook};
pub use writer::AuditWriter;
