//! Audit workbook writer: one formatted sheet per polars `DataFrame`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use log::debug;
use polars::prelude::{AnyValue, DataFrame};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::conf::{
    N_WIDTH_AUTOFIT_MAX, N_WIDTH_AUTOFIT_MIN, N_WIDTH_AUTOFIT_PADDING, derive_default_xlsx_formats,
};
use crate::spec::{EnumCellValue, SheetIoError, SpecCellFormat};
use crate::util::{cast_col_num, cast_row_num, create_sheet_identifier, sanitize_sheet_name};

/// Stateful workbook writer for run audit output.
///
/// The workbook is buffered in memory until [`Self::close`] is called.
pub struct AuditWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    fmt_text: SpecCellFormat,
    fmt_decimal: SpecCellFormat,
    fmt_header: SpecCellFormat,
    set_sheet_names_existing: BTreeSet<String>,
    if_closed: bool,
}

impl AuditWriter {
    /// Create writer bound to `path_file_out` with the default format presets.
    pub fn new<P: AsRef<Path>>(path_file_out: P) -> Self {
        let dict_fmt = derive_default_xlsx_formats();
        Self::with_formats(path_file_out, &dict_fmt)
    }

    /// Create writer using named presets (`text`, `header`, `decimal`).
    ///
    /// Missing keys fall back to an empty format.
    pub fn with_formats<P: AsRef<Path>>(
        path_file_out: P,
        dict_fmt: &BTreeMap<String, SpecCellFormat>,
    ) -> Self {
        let derive_fmt = |key: &str| dict_fmt.get(key).cloned().unwrap_or_default();
        Self {
            path_file_out: path_file_out.as_ref().to_path_buf(),
            workbook: Workbook::new(),
            fmt_text: derive_fmt("text"),
            fmt_decimal: derive_fmt("decimal"),
            fmt_header: derive_fmt("header"),
            set_sheet_names_existing: BTreeSet::new(),
            if_closed: false,
        }
    }

    /// Output file path.
    pub fn file_out(&self) -> &Path {
        &self.path_file_out
    }

    /// Write `df` to a new sheet; returns the sheet name actually used.
    ///
    /// Numeric columns use the decimal preset, everything else the text
    /// preset. The header row is frozen and columns are autofit.
    pub fn write_sheet_from_dataframe(
        &mut self,
        df: &DataFrame,
        sheet_name: &str,
    ) -> Result<String, SheetIoError> {
        if self.if_closed {
            return Err(SheetIoError::Write("Cannot write after close().".to_string()));
        }

        let sheet_name_unique = self.derive_unique_sheet_name(&sanitize_sheet_name(sheet_name, "_"));
        let fmt_header = derive_rust_xlsx_format(&self.fmt_header);
        let fmt_text = derive_rust_xlsx_format(&self.fmt_text);
        let fmt_decimal = derive_rust_xlsx_format(&self.fmt_decimal);

        let l_cols = df.get_columns();
        let l_if_numeric: Vec<bool> = l_cols.iter().map(|col| col.dtype().is_numeric()).collect();
        let mut l_widths: Vec<usize> = df
            .get_column_names_str()
            .iter()
            .map(|c_name| estimate_unicode_string_width(c_name))
            .collect();

        let worksheet = self.workbook.add_worksheet();
        worksheet
            .set_name(&sheet_name_unique)
            .map_err(derive_xlsx_error)?;

        for (n_col, c_name) in df.get_column_names_str().iter().enumerate() {
            worksheet
                .write_string_with_format(0, cast_col_num(n_col)?, *c_name, &fmt_header)
                .map_err(derive_xlsx_error)?;
        }

        for (n_col, col) in l_cols.iter().enumerate() {
            let fmt_cell = if l_if_numeric[n_col] {
                &fmt_decimal
            } else {
                &fmt_text
            };
            for n_row in 0..df.height() {
                let value = col
                    .get(n_row)
                    .map_err(|err| SheetIoError::Write(format!("Failed to read cell: {err}")))?;
                let value = derive_cell_value_from_any_value(value);
                l_widths[n_col] = usize::max(l_widths[n_col], estimate_width_len(&value));
                write_cell_with_format(worksheet, n_row + 1, n_col, &value, fmt_cell)?;
            }
        }

        worksheet.set_freeze_panes(1, 0).map_err(derive_xlsx_error)?;
        for (n_col, n_width) in l_widths.iter().enumerate() {
            let n_width = (*n_width + N_WIDTH_AUTOFIT_PADDING)
                .clamp(N_WIDTH_AUTOFIT_MIN, N_WIDTH_AUTOFIT_MAX);
            worksheet
                .set_column_width(cast_col_num(n_col)?, n_width as f64)
                .map_err(derive_xlsx_error)?;
        }

        debug!(
            "Audit sheet {} written: {} rows x {} cols",
            sheet_name_unique,
            df.height(),
            df.width()
        );
        Ok(sheet_name_unique)
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<(), SheetIoError> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook
            .save(&self.path_file_out)
            .map_err(|err| SheetIoError::Save {
                path: self.path_file_out.clone(),
                message: err.to_string(),
            })?;
        self.if_closed = true;
        Ok(())
    }

    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        if self.set_sheet_names_existing.insert(name.to_string()) {
            return name.to_string();
        }

        let mut n_idx = 2usize;
        loop {
            let candidate = create_sheet_identifier(name, n_idx);
            if self.set_sheet_names_existing.insert(candidate.clone()) {
                return candidate;
            }
            n_idx += 1;
        }
    }
}

fn estimate_width_len(value: &EnumCellValue) -> usize {
    match value {
        EnumCellValue::None => 0,
        EnumCellValue::String(s) => estimate_unicode_string_width(s),
        EnumCellValue::Number(n) => format!("{n:.2}").len(),
    }
}

fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        AnyValue::Null => EnumCellValue::None,
        AnyValue::String(val) => EnumCellValue::String(val.to_string()),
        AnyValue::StringOwned(val) => EnumCellValue::String(val.to_string()),
        AnyValue::Boolean(val) => {
            EnumCellValue::String(if val { "True" } else { "False" }.to_string())
        }
        AnyValue::UInt32(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float64(val) => EnumCellValue::Number(val),
        _ => EnumCellValue::String(value.to_string()),
    }
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), SheetIoError> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumCellValue::None => worksheet.write_blank(n_row, n_col, format),
        EnumCellValue::String(val) => worksheet.write_string_with_format(n_row, n_col, val, format),
        EnumCellValue::Number(val) => worksheet.write_number_with_format(n_row, n_col, *val, format),
    }
    .map_err(derive_xlsx_error)?;
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }

    for val in [&spec.align, &spec.valign].into_iter().flatten() {
        if let Some(align) = derive_format_align(val) {
            format = format.set_align(align);
        }
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }

    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if let Some(val) = spec.top {
        format = format.set_border_top(derive_format_border(val));
    }
    if let Some(val) = spec.bottom {
        format = format.set_border_bottom(derive_format_border(val));
    }
    if let Some(val) = spec.left {
        format = format.set_border_left(derive_format_border(val));
    }
    if let Some(val) = spec.right {
        format = format.set_border_right(derive_format_border(val));
    }

    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    match align.trim().to_ascii_lowercase().as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn derive_xlsx_error(err: XlsxError) -> SheetIoError {
    SheetIoError::Write(err.to_string())
}
