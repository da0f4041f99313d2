//! Stateless helper utilities shared by readers, sheets and writers.

use crate::conf::{N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL};
use crate::spec::{EnumCellValue, SheetIoError};

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Coerce a cell to a finite number.
///
/// Text is trimmed and parsed; thousands separators are accepted. Blank
/// cells, unparsable text, `NaN` and infinities all yield `None`.
pub fn convert_cell_to_f64(value: &EnumCellValue) -> Option<f64> {
    let n_value = match value {
        EnumCellValue::None => return None,
        EnumCellValue::Number(n) => *n,
        EnumCellValue::String(s) => {
            let c_txt = s.trim().replace(',', "");
            if c_txt.is_empty() {
                return None;
            }
            c_txt.parse::<f64>().ok()?
        }
    };
    n_value.is_finite().then_some(n_value)
}

/// Render a cell as display text (integral numbers without a fraction).
pub fn derive_cell_text(value: &EnumCellValue) -> String {
    match value {
        EnumCellValue::None => String::new(),
        EnumCellValue::String(s) => s.clone(),
        EnumCellValue::Number(n) => {
            if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }
        }
    }
}

/// Join key for ports and destinations: trimmed, upper-case.
pub fn normalize_key(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Join key derived from a cell; `None` when the cell is blank.
pub fn derive_cell_key(value: &EnumCellValue) -> Option<String> {
    let c_key = normalize_key(&derive_cell_text(value));
    (!c_key.is_empty()).then_some(c_key)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Create suffixed sheet name (`base__2`, `base__3`, ...), respecting length cap.
pub fn create_sheet_identifier(base_name: &str, n_idx: usize) -> String {
    let c_sheet_name_suffix = format!("__{n_idx}");
    let n_len_base_name_max = N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_sheet_name_suffix.len());

    let c_sheet_name_base: String = base_name
        .chars()
        .take(usize::max(1, n_len_base_name_max))
        .collect();

    format!("{c_sheet_name_base}{c_sheet_name_suffix}")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region IndexCasting

pub(crate) fn cast_row_num(value: usize) -> Result<u32, SheetIoError> {
    if value >= N_NROWS_EXCEL_MAX {
        return Err(SheetIoError::IndexOverflow(format!("row {value}")));
    }
    u32::try_from(value).map_err(|_| SheetIoError::IndexOverflow(format!("row {value}")))
}

pub(crate) fn cast_col_num(value: usize) -> Result<u16, SheetIoError> {
    if value >= N_NCOLS_EXCEL_MAX {
        return Err(SheetIoError::IndexOverflow(format!("column {value}")));
    }
    u16::try_from(value).map_err(|_| SheetIoError::IndexOverflow(format!("column {value}")))
}

/// Zero-based `(row, col)` to one-based umya `(col, row)`.
pub(crate) fn cast_umya_coordinate(row: usize, col: usize) -> Result<(u32, u32), SheetIoError> {
    let n_row = cast_row_num(row)?;
    let n_col = cast_col_num(col)?;
    Ok((u32::from(n_col) + 1, n_row + 1))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_cell_to_f64_treats_junk_as_missing() {
        assert_eq!(convert_cell_to_f64(&EnumCellValue::Number(12.5)), Some(12.5));
        assert_eq!(
            convert_cell_to_f64(&EnumCellValue::String(" 1,250.5 ".to_string())),
            Some(1250.5)
        );
        assert_eq!(
            convert_cell_to_f64(&EnumCellValue::String("N/A".to_string())),
            None
        );
        assert_eq!(convert_cell_to_f64(&EnumCellValue::String("  ".to_string())), None);
        assert_eq!(convert_cell_to_f64(&EnumCellValue::Number(f64::NAN)), None);
        assert_eq!(convert_cell_to_f64(&EnumCellValue::String("inf".to_string())), None);
        assert_eq!(convert_cell_to_f64(&EnumCellValue::None), None);
    }

    #[test]
    fn test_derive_cell_key_normalizes_case_and_blank() {
        assert_eq!(
            derive_cell_key(&EnumCellValue::String(" busan ".to_string())),
            Some("BUSAN".to_string())
        );
        assert_eq!(derive_cell_key(&EnumCellValue::String("   ".to_string())), None);
        assert_eq!(derive_cell_key(&EnumCellValue::None), None);
        assert_eq!(
            derive_cell_key(&EnumCellValue::Number(2025.0)),
            Some("2025".to_string())
        );
    }

    #[test]
    fn test_sanitize_sheet_name_and_identifier() {
        assert_eq!(sanitize_sheet_name("AREA 1 / 20FT", "_"), "AREA 1 _ 20FT");
        assert_eq!(sanitize_sheet_name("  ", "_"), "Sheet");

        let c_long = "X".repeat(40);
        let c_ident = create_sheet_identifier(&c_long, 2);
        assert_eq!(c_ident.chars().count(), N_LEN_EXCEL_SHEET_NAME_MAX);
        assert!(c_ident.ends_with("__2"));
    }

    #[test]
    fn test_cast_umya_coordinate_is_one_based_col_row() {
        assert_eq!(cast_umya_coordinate(0, 0).expect("cast"), (1, 1));
        assert_eq!(cast_umya_coordinate(4, 2).expect("cast"), (3, 5));
        assert!(cast_umya_coordinate(N_NROWS_EXCEL_MAX, 0).is_err());
    }
}
