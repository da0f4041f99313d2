//! XLSX constants and default preset factories.

use std::collections::BTreeMap;

use crate::spec::SpecCellFormat;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Workbook extensions the tabular reader accepts.
pub const TUP_XLSX_READABLE_EXTENSIONS: [&str; 3] = ["xls", "xlsx", "xlsb"];

/// Autofit lower bound for audit sheets.
pub const N_WIDTH_AUTOFIT_MIN: usize = 8;
/// Autofit upper bound for audit sheets.
pub const N_WIDTH_AUTOFIT_MAX: usize = 60;
/// Padding added after width inference.
pub const N_WIDTH_AUTOFIT_PADDING: usize = 2;

/// Build default named format presets used by [`crate::writer::AuditWriter`].
///
/// Keys: `text`, `header`, `decimal`.
pub fn derive_default_xlsx_formats() -> BTreeMap<String, SpecCellFormat> {
    let cfg_base_fmt_spec = SpecCellFormat {
        font_name: Some("Calibri".to_string()),
        font_size: Some(11),
        border: Some(1),
        align: Some("left".to_string()),
        valign: Some("vcenter".to_string()),
        ..Default::default()
    };

    let mut dict_fmt = BTreeMap::new();
    dict_fmt.insert("text".to_string(), cfg_base_fmt_spec.clone());
    dict_fmt.insert(
        "header".to_string(),
        cfg_base_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            align: Some("center".to_string()),
            bg_color: Some("#D9E1F2".to_string()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        "decimal".to_string(),
        cfg_base_fmt_spec.with_(SpecCellFormat {
            num_format: Some("#,##0.00".to_string()),
            align: Some("right".to_string()),
            ..Default::default()
        }),
    );

    dict_fmt
}
