//! Position-based slicing of a quotation table into per-size rows.

use freightkit_io_xlsx::{SpecTable, convert_cell_to_f64, derive_cell_text, normalize_key};

use crate::spec::{QuoteError, SpecColumnSet, SpecQuotationRow};

/// Fail fast when `table` is narrower than `column_set` needs.
pub fn validate_column_set(table: &SpecTable, column_set: &SpecColumnSet) -> Result<(), QuoteError> {
    let n_required = column_set.n_cols_required();
    if table.width() < n_required {
        return Err(QuoteError::TooFewColumns {
            sheet_name: table.sheet_name.clone(),
            found: table.width(),
            required: n_required,
        });
    }
    Ok(())
}

/// One [`SpecQuotationRow`] per table row.
///
/// Ports are trimmed and upper-cased; cost cells are coerced to numbers with
/// junk becoming `None`. No row is filtered here.
pub fn extract_rows(
    table: &SpecTable,
    column_set: &SpecColumnSet,
) -> Result<Vec<SpecQuotationRow>, QuoteError> {
    validate_column_set(table, column_set)?;

    let l_rows = (0..table.height())
        .map(|n_row| {
            let carrier = column_set.col_carrier.and_then(|n_col| {
                let c_carrier = derive_cell_text(table.get(n_row, n_col)).trim().to_string();
                (!c_carrier.is_empty()).then_some(c_carrier)
            });
            SpecQuotationRow {
                port: normalize_key(&derive_cell_text(table.get(n_row, column_set.col_port))),
                carrier,
                cost_components: column_set
                    .cols_cost
                    .iter()
                    .map(|n_col| convert_cell_to_f64(table.get(n_row, *n_col)))
                    .collect(),
            }
        })
        .collect();
    Ok(l_rows)
}
