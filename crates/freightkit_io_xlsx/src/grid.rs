//! Mutable sheet abstraction used by the report engine.
//!
//! Indices are zero-based `(row, col)`; row 0 is the first sheet row and
//! column 0 is column `A`.

use std::collections::BTreeMap;

use crate::spec::{EnumCellValue, SheetIoError, SpecCellFormat};
use crate::util::derive_cell_text;

/// One worksheet that can be read cell by cell and written in place.
///
/// Implemented by [`crate::workbook::XlsxSheetMut`] (a sheet inside an open
/// workbook) and [`MemorySheet`] (snapshots and tests).
pub trait SheetGrid {
    /// Sheet name.
    fn sheet_name(&self) -> &str;

    /// Row count up to and including the last used row.
    fn n_rows(&self) -> usize;

    /// Column count up to and including the last used column.
    fn n_cols(&self) -> usize;

    /// Cell value; unused cells read as [`EnumCellValue::None`].
    fn get_value(&self, row: usize, col: usize) -> EnumCellValue;

    /// Write a numeric cell.
    fn write_number(&mut self, row: usize, col: usize, value: f64) -> Result<(), SheetIoError>;

    /// Write a text cell.
    fn write_string(&mut self, row: usize, col: usize, value: &str) -> Result<(), SheetIoError>;

    /// Copy font, fill, border and alignment from `src` onto `dst`.
    fn copy_header_format(
        &mut self,
        src: (usize, usize),
        dst: (usize, usize),
    ) -> Result<(), SheetIoError>;

    /// Set an explicit column width.
    fn set_column_width(&mut self, col: usize, width: f64) -> Result<(), SheetIoError>;

    /// Explicit column width, if one was set.
    fn column_width(&self, col: usize) -> Option<f64>;

    /// Cell rendered as text.
    fn get_text(&self, row: usize, col: usize) -> String {
        derive_cell_text(&self.get_value(row, col))
    }

    /// First column in `row` whose text matches any of `names`
    /// (trimmed, case-insensitive).
    fn find_header(&self, row: usize, names: &[&str]) -> Option<usize> {
        (0..self.n_cols()).find(|col| {
            let c_header = self.get_text(row, *col);
            let c_header = c_header.trim();
            names
                .iter()
                .any(|c_name| c_header.eq_ignore_ascii_case(c_name.trim()))
        })
    }
}

/// Sparse in-memory sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySheet {
    sheet_name: String,
    dict_values: BTreeMap<(usize, usize), EnumCellValue>,
    dict_formats: BTreeMap<(usize, usize), SpecCellFormat>,
    dict_widths: BTreeMap<usize, f64>,
}

impl MemorySheet {
    /// Create an empty sheet.
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            ..Default::default()
        }
    }

    /// Build a sheet from dense rows starting at `A1`.
    pub fn from_rows(sheet_name: impl Into<String>, rows: Vec<Vec<EnumCellValue>>) -> Self {
        let mut sheet = Self::new(sheet_name);
        for (n_row, row_values) in rows.into_iter().enumerate() {
            for (n_col, value) in row_values.into_iter().enumerate() {
                sheet.set_value(n_row, n_col, value);
            }
        }
        sheet
    }

    /// Store a value; blanks remove the cell.
    pub fn set_value(&mut self, row: usize, col: usize, value: EnumCellValue) {
        if matches!(value, EnumCellValue::None) {
            self.dict_values.remove(&(row, col));
        } else {
            self.dict_values.insert((row, col), value);
        }
    }

    /// Store a cell format.
    pub fn set_format(&mut self, row: usize, col: usize, format: SpecCellFormat) {
        self.dict_formats.insert((row, col), format);
    }

    /// Cell format, if any.
    pub fn get_format(&self, row: usize, col: usize) -> Option<&SpecCellFormat> {
        self.dict_formats.get(&(row, col))
    }
}

impl SheetGrid for MemorySheet {
    fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    fn n_rows(&self) -> usize {
        self.dict_values
            .keys()
            .map(|(n_row, _)| n_row + 1)
            .max()
            .unwrap_or(0)
    }

    fn n_cols(&self) -> usize {
        self.dict_values
            .keys()
            .map(|(_, n_col)| n_col + 1)
            .max()
            .unwrap_or(0)
    }

    fn get_value(&self, row: usize, col: usize) -> EnumCellValue {
        self.dict_values
            .get(&(row, col))
            .cloned()
            .unwrap_or_default()
    }

    fn write_number(&mut self, row: usize, col: usize, value: f64) -> Result<(), SheetIoError> {
        self.set_value(row, col, EnumCellValue::Number(value));
        Ok(())
    }

    fn write_string(&mut self, row: usize, col: usize, value: &str) -> Result<(), SheetIoError> {
        self.set_value(row, col, EnumCellValue::String(value.to_string()));
        Ok(())
    }

    fn copy_header_format(
        &mut self,
        src: (usize, usize),
        dst: (usize, usize),
    ) -> Result<(), SheetIoError> {
        let Some(fmt_src) = self.dict_formats.get(&src) else {
            return Ok(());
        };
        let fmt_header = fmt_src.derive_header_style();
        let fmt_dst = self
            .dict_formats
            .get(&dst)
            .cloned()
            .unwrap_or_default()
            .merge(&fmt_header);
        self.dict_formats.insert(dst, fmt_dst);
        Ok(())
    }

    fn set_column_width(&mut self, col: usize, width: f64) -> Result<(), SheetIoError> {
        self.dict_widths.insert(col, width);
        Ok(())
    }

    fn column_width(&self, col: usize) -> Option<f64> {
        self.dict_widths.get(&col).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> EnumCellValue {
        EnumCellValue::String(s.to_string())
    }

    #[test]
    fn test_memory_sheet_extent_tracks_used_cells() {
        let mut sheet = MemorySheet::new("S");
        assert_eq!((sheet.n_rows(), sheet.n_cols()), (0, 0));

        sheet.set_value(3, 5, text("x"));
        assert_eq!((sheet.n_rows(), sheet.n_cols()), (4, 6));

        sheet.set_value(3, 5, EnumCellValue::None);
        assert_eq!((sheet.n_rows(), sheet.n_cols()), (0, 0));
    }

    #[test]
    fn test_find_header_is_case_insensitive() {
        let sheet = MemorySheet::from_rows(
            "S",
            vec![vec![text("NO"), text(" Port of Discharge "), text("POD")]],
        );
        assert_eq!(sheet.find_header(0, &["pod", "port of discharge"]), Some(1));
        assert_eq!(sheet.find_header(0, &["DESTINATION"]), None);
    }

    #[test]
    fn test_copy_header_format_keeps_target_number_format() {
        let mut sheet = MemorySheet::new("S");
        sheet.set_format(
            0,
            0,
            SpecCellFormat {
                bold: Some(true),
                bg_color: Some("#FFFF00".to_string()),
                num_format: Some("@".to_string()),
                ..Default::default()
            },
        );
        sheet.set_format(
            0,
            1,
            SpecCellFormat {
                num_format: Some("0.00".to_string()),
                ..Default::default()
            },
        );

        sheet.copy_header_format((0, 0), (0, 1)).expect("copy");
        let fmt = sheet.get_format(0, 1).expect("format");
        assert_eq!(fmt.bold, Some(true));
        assert_eq!(fmt.bg_color.as_deref(), Some("#FFFF00"));
        assert_eq!(fmt.num_format.as_deref(), Some("0.00"));
    }
}
