//! In-memory report workbook with explicit save checkpoints.
//!
//! The caller owns one [`XlsxWorkbook`] per report file for a run phase.
//! Sheets are borrowed through [`XlsxSheetMut`], so at most one writer can
//! touch a sheet at a time; nothing reaches disk until [`XlsxWorkbook::save`].

use std::path::{Path, PathBuf};

use log::debug;
use umya_spreadsheet::{Cell, Spreadsheet, Style, Worksheet};

use crate::grid::{MemorySheet, SheetGrid};
use crate::spec::{EnumCellValue, SheetIoError};
use crate::util::cast_umya_coordinate;

/// Open workbook kept fully in memory.
pub struct XlsxWorkbook {
    path_file: PathBuf,
    book: Spreadsheet,
    if_dirty: bool,
}

impl XlsxWorkbook {
    /// Load a workbook (values, styles and column dimensions).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SheetIoError> {
        let path_file = path.as_ref().to_path_buf();
        let book =
            umya_spreadsheet::reader::xlsx::read(&path_file).map_err(|err| SheetIoError::Open {
                path: path_file.clone(),
                message: err.to_string(),
            })?;
        debug!("Opened report workbook {}", path_file.display());
        Ok(Self {
            path_file,
            book,
            if_dirty: false,
        })
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path_file
    }

    /// `true` when a sheet was written since the last save.
    pub fn is_dirty(&self) -> bool {
        self.if_dirty
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection()
            .iter()
            .map(|worksheet| worksheet.get_name().to_string())
            .collect()
    }

    /// Borrow one sheet for reading and writing.
    pub fn sheet_mut(&mut self, sheet_name: &str) -> Result<XlsxSheetMut<'_>, SheetIoError> {
        let Some(worksheet) = self.book.get_sheet_by_name_mut(sheet_name) else {
            return Err(SheetIoError::SheetNotFound {
                path: self.path_file.clone(),
                sheet_name: sheet_name.to_string(),
            });
        };
        Ok(XlsxSheetMut {
            sheet_name: sheet_name.to_string(),
            worksheet,
            if_dirty: &mut self.if_dirty,
        })
    }

    /// Copy one sheet's values into a detached [`MemorySheet`].
    ///
    /// Used when one sheet is read while another sheet of the same workbook
    /// is being written.
    pub fn snapshot_sheet(&self, sheet_name: &str) -> Result<MemorySheet, SheetIoError> {
        let Some(worksheet) = self.book.get_sheet_by_name(sheet_name) else {
            return Err(SheetIoError::SheetNotFound {
                path: self.path_file.clone(),
                sheet_name: sheet_name.to_string(),
            });
        };

        let mut sheet = MemorySheet::new(sheet_name);
        let n_rows = worksheet.get_highest_row() as usize;
        let n_cols = worksheet.get_highest_column() as usize;
        for n_row in 0..n_rows {
            for n_col in 0..n_cols {
                let value = derive_cell_value_from_worksheet(worksheet, n_row, n_col);
                sheet.set_value(n_row, n_col, value);
            }
        }
        Ok(sheet)
    }

    /// Write the workbook back to its own path.
    pub fn save(&mut self) -> Result<(), SheetIoError> {
        umya_spreadsheet::writer::xlsx::write(&self.book, &self.path_file).map_err(|err| {
            SheetIoError::Save {
                path: self.path_file.clone(),
                message: err.to_string(),
            }
        })?;
        self.if_dirty = false;
        debug!("Saved report workbook {}", self.path_file.display());
        Ok(())
    }
}

/// Mutable handle to one sheet of an [`XlsxWorkbook`].
pub struct XlsxSheetMut<'a> {
    sheet_name: String,
    worksheet: &'a mut Worksheet,
    if_dirty: &'a mut bool,
}

impl XlsxSheetMut<'_> {
    fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut Cell, SheetIoError> {
        let coordinate = cast_umya_coordinate(row, col)?;
        *self.if_dirty = true;
        Ok(self.worksheet.get_cell_mut(coordinate))
    }
}

impl SheetGrid for XlsxSheetMut<'_> {
    fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    fn n_rows(&self) -> usize {
        self.worksheet.get_highest_row() as usize
    }

    fn n_cols(&self) -> usize {
        self.worksheet.get_highest_column() as usize
    }

    fn get_value(&self, row: usize, col: usize) -> EnumCellValue {
        derive_cell_value_from_worksheet(self.worksheet, row, col)
    }

    fn write_number(&mut self, row: usize, col: usize, value: f64) -> Result<(), SheetIoError> {
        self.cell_mut(row, col)?.set_value_number(value);
        Ok(())
    }

    fn write_string(&mut self, row: usize, col: usize, value: &str) -> Result<(), SheetIoError> {
        self.cell_mut(row, col)?.set_value_string(value);
        Ok(())
    }

    fn copy_header_format(
        &mut self,
        src: (usize, usize),
        dst: (usize, usize),
    ) -> Result<(), SheetIoError> {
        let coordinate_src = cast_umya_coordinate(src.0, src.1)?;
        let Some(style_src) = self
            .worksheet
            .get_cell(coordinate_src)
            .map(|cell| cell.get_style().clone())
        else {
            return Ok(());
        };

        let cell_dst = self.cell_mut(dst.0, dst.1)?;
        let style_dst = derive_header_style(&style_src, cell_dst.get_style());
        cell_dst.set_style(style_dst);
        Ok(())
    }

    fn set_column_width(&mut self, col: usize, width: f64) -> Result<(), SheetIoError> {
        let (n_col, _) = cast_umya_coordinate(0, col)?;
        *self.if_dirty = true;
        self.worksheet
            .get_column_dimension_by_number_mut(&n_col)
            .set_width(width);
        Ok(())
    }

    fn column_width(&self, col: usize) -> Option<f64> {
        let (n_col, _) = cast_umya_coordinate(0, col).ok()?;
        self.worksheet
            .get_column_dimension_by_number(&n_col)
            .map(|column| *column.get_width())
    }
}

/// Overlay font, fill, borders and alignment of `style_src` onto `style_dst`.
fn derive_header_style(style_src: &Style, style_dst: &Style) -> Style {
    let mut style_out = style_dst.clone();
    if let Some(font) = style_src.get_font() {
        style_out.set_font(font.clone());
    }
    if let Some(fill) = style_src.get_fill() {
        style_out.set_fill(fill.clone());
    }
    if let Some(borders) = style_src.get_borders() {
        style_out.set_borders(borders.clone());
    }
    if let Some(alignment) = style_src.get_alignment() {
        style_out.set_alignment(alignment.clone());
    }
    style_out
}

fn derive_cell_value_from_worksheet(worksheet: &Worksheet, row: usize, col: usize) -> EnumCellValue {
    let Ok(coordinate) = cast_umya_coordinate(row, col) else {
        return EnumCellValue::None;
    };
    let Some(cell) = worksheet.get_cell(coordinate) else {
        return EnumCellValue::None;
    };
    if let Some(n_value) = cell.get_value_number() {
        return EnumCellValue::Number(n_value);
    }
    let c_value = cell.get_value();
    if c_value.trim().is_empty() {
        EnumCellValue::None
    } else {
        EnumCellValue::String(c_value.to_string())
    }
}
