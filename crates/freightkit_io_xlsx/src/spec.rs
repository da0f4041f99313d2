//! Shared XLSX specification models and error types.

use std::path::PathBuf;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification.
///
/// Every field is optional so formats can be layered with [`SpecCellFormat::merge`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Text wrap.
    pub text_wrap: Option<bool>,

    /// Top border override.
    pub top: Option<i64>,
    /// Bottom border override.
    pub bottom: Option<i64>,
    /// Left border override.
    pub left: Option<i64>,
    /// Right border override.
    pub right: Option<i64>,

    /// Number format code.
    pub num_format: Option<String>,
    /// Background fill color.
    pub bg_color: Option<String>,
    /// Font color.
    pub font_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            text_wrap: other.text_wrap.or(self.text_wrap),
            top: other.top.or(self.top),
            bottom: other.bottom.or(self.bottom),
            left: other.left.or(self.left),
            right: other.right.or(self.right),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
        }
    }

    /// Keep only the header-visual parts: font, fill, border, alignment.
    ///
    /// Number format is dropped so a copied header style never changes how
    /// the target cell renders its value.
    pub fn derive_header_style(&self) -> SpecCellFormat {
        SpecCellFormat {
            num_format: None,
            ..self.clone()
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellValues

/// Normalized cell value shared by readers, sheets and writers.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EnumCellValue {
    /// Missing/blank value.
    #[default]
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
}

impl EnumCellValue {
    /// `true` for missing values and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::None => true,
            Self::String(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }
}

/// Rectangular table read from one worksheet.
///
/// `header` is the row right after the skipped rows; `rows` are the data rows
/// below it. All rows are padded to the same width. Column indices are
/// absolute sheet columns (column `A` is index 0).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecTable {
    /// Source sheet name.
    pub sheet_name: String,
    /// Header cell texts.
    pub header: Vec<String>,
    /// Data rows.
    pub rows: Vec<Vec<EnumCellValue>>,
}

impl SpecTable {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Number of data rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Cell at `(row, col)`; out-of-range cells read as missing.
    pub fn get(&self, row: usize, col: usize) -> &EnumCellValue {
        static VALUE_MISSING: EnumCellValue = EnumCellValue::None;
        self.rows
            .get(row)
            .and_then(|row_values| row_values.get(col))
            .unwrap_or(&VALUE_MISSING)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Workbook I/O failures.
#[derive(Debug, thiserror::Error)]
pub enum SheetIoError {
    /// Workbook could not be opened or parsed.
    #[error("Failed to open workbook {}: {message}", .path.display())]
    Open {
        /// Workbook path.
        path: PathBuf,
        /// Underlying reader error text.
        message: String,
    },
    /// Requested sheet does not exist.
    #[error("Sheet {sheet_name:?} not found in {}", .path.display())]
    SheetNotFound {
        /// Workbook path.
        path: PathBuf,
        /// Requested sheet name.
        sheet_name: String,
    },
    /// Header row is beyond the sheet's used range.
    #[error("Sheet {sheet_name:?} has no header row after skipping {n_rows_skip} rows")]
    MissingHeader {
        /// Sheet name.
        sheet_name: String,
        /// Rows skipped above the header.
        n_rows_skip: usize,
    },
    /// Workbook could not be written back.
    #[error("Failed to save workbook {}: {message}", .path.display())]
    Save {
        /// Output path.
        path: PathBuf,
        /// Underlying writer error text.
        message: String,
    },
    /// Row/column index does not fit the Excel grid.
    #[error("Cell index overflow: {0}")]
    IndexOverflow(String),
    /// Writer-level failure (closed writer, invalid sheet data, xlsx error).
    #[error("xlsx write error: {0}")]
    Write(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
