//! Tabular region reader for `.xls`, `.xlsx` and `.xlsb` workbooks.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use log::debug;

use crate::conf::TUP_XLSX_READABLE_EXTENSIONS;
use crate::spec::{EnumCellValue, SheetIoError, SpecTable};
use crate::util::derive_cell_text;

/// Read `sheet_name` as a table whose header is the row after `n_rows_skip`
/// skipped rows.
///
/// Positions are absolute: leading empty rows and columns of the sheet are
/// kept, so column `A` is always index 0 in the returned table.
pub fn read_table<P: AsRef<Path>>(
    path: P,
    sheet_name: &str,
    n_rows_skip: usize,
) -> Result<SpecTable, SheetIoError> {
    let path_file = path.as_ref();
    let if_readable = path_file
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| TUP_XLSX_READABLE_EXTENSIONS.contains(&ext.as_str()));
    if !if_readable {
        return Err(SheetIoError::Open {
            path: path_file.to_path_buf(),
            message: "unsupported workbook extension".to_string(),
        });
    }

    let mut workbook = open_workbook_auto(path_file).map_err(|err| SheetIoError::Open {
        path: path_file.to_path_buf(),
        message: err.to_string(),
    })?;

    if !workbook
        .sheet_names()
        .iter()
        .any(|c_name| c_name == sheet_name)
    {
        return Err(SheetIoError::SheetNotFound {
            path: path_file.to_path_buf(),
            sheet_name: sheet_name.to_string(),
        });
    }

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|err| SheetIoError::Open {
            path: path_file.to_path_buf(),
            message: err.to_string(),
        })?;

    let table = derive_table_from_range(&range, sheet_name, n_rows_skip)?;
    debug!(
        "Read {}[{}]: {} rows x {} cols",
        path_file.display(),
        sheet_name,
        table.height(),
        table.width()
    );
    Ok(table)
}

fn derive_table_from_range(
    range: &Range<Data>,
    sheet_name: &str,
    n_rows_skip: usize,
) -> Result<SpecTable, SheetIoError> {
    let (n_row_start, n_col_start) = range
        .start()
        .map(|(n_row, n_col)| (n_row as usize, n_col as usize))
        .unwrap_or((0, 0));
    let n_width = if range.is_empty() {
        0
    } else {
        n_col_start + range.width()
    };

    let mut l_rows_abs: Vec<Vec<EnumCellValue>> = vec![Vec::new(); n_row_start];
    for row in range.rows() {
        let mut l_values = vec![EnumCellValue::None; n_col_start];
        l_values.extend(row.iter().map(derive_cell_value_from_data));
        l_rows_abs.push(l_values);
    }

    if l_rows_abs.len() <= n_rows_skip {
        return Err(SheetIoError::MissingHeader {
            sheet_name: sheet_name.to_string(),
            n_rows_skip,
        });
    }

    let mut iter_rows = l_rows_abs.into_iter().skip(n_rows_skip);
    let mut l_header_values = iter_rows.next().unwrap_or_default();
    l_header_values.resize(n_width, EnumCellValue::None);
    let header = l_header_values
        .iter()
        .map(|value| derive_cell_text(value).trim().to_string())
        .collect();

    let rows = iter_rows
        .map(|mut l_values| {
            l_values.resize(n_width, EnumCellValue::None);
            l_values
        })
        .collect();

    Ok(SpecTable {
        sheet_name: sheet_name.to_string(),
        header,
        rows,
    })
}

fn derive_cell_value_from_data(value: &Data) -> EnumCellValue {
    match value {
        Data::Empty => EnumCellValue::None,
        Data::Error(_) => EnumCellValue::None,
        Data::String(val) => EnumCellValue::String(val.clone()),
        Data::Float(val) => EnumCellValue::Number(*val),
        Data::Int(val) => EnumCellValue::Number(*val as f64),
        Data::Bool(val) => EnumCellValue::String(if *val { "True" } else { "False" }.to_string()),
        _ => EnumCellValue::String(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use rust_xlsxwriter::Workbook;

    use super::*;

    #[test]
    fn test_read_table_keeps_absolute_positions() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_file = tmp.path().join("PARTNER1.xlsx");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("2025").expect("name");
        worksheet.write_string(2, 1, "PORT").expect("write");
        worksheet.write_string(2, 2, "O/F").expect("write");
        worksheet.write_string(3, 1, "Busan").expect("write");
        worksheet.write_number(3, 2, 120.5).expect("write");
        worksheet.write_string(4, 1, "Tokyo").expect("write");
        worksheet.write_string(4, 2, "TBA").expect("write");
        workbook.save(&path_file).expect("save");

        let table = read_table(&path_file, "2025", 2).expect("read");
        assert_eq!(table.header, vec!["", "PORT", "O/F"]);
        assert_eq!(table.height(), 2);
        assert_eq!(table.get(0, 1), &EnumCellValue::String("Busan".to_string()));
        assert_eq!(table.get(0, 2), &EnumCellValue::Number(120.5));
        assert_eq!(table.get(1, 2), &EnumCellValue::String("TBA".to_string()));
        assert_eq!(table.get(9, 9), &EnumCellValue::None);
    }

    #[test]
    fn test_read_table_reports_missing_sheet_and_header() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_file = tmp.path().join("PARTNER1.xlsx");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("2025").expect("name");
        worksheet.write_string(0, 0, "PORT").expect("write");
        workbook.save(&path_file).expect("save");

        assert!(matches!(
            read_table(&path_file, "2024", 0),
            Err(SheetIoError::SheetNotFound { .. })
        ));
        assert!(matches!(
            read_table(&path_file, "2025", 3),
            Err(SheetIoError::MissingHeader { n_rows_skip: 3, .. })
        ));
    }

    #[test]
    fn test_read_table_missing_file_is_open_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let res = read_table(tmp.path().join("absent.xlsx"), "2025", 0);
        assert!(matches!(res, Err(SheetIoError::Open { .. })));
    }

    #[test]
    fn test_read_table_rejects_other_extensions() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_file = tmp.path().join("rates.csv");
        std::fs::write(&path_file, "PORT,COST\nBUSAN,10\n").expect("write");
        assert!(matches!(
            read_table(&path_file, "rates", 0),
            Err(SheetIoError::Open { message, .. }) if message.contains("extension")
        ));
    }
}
