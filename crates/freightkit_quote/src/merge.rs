//! Append partner column blocks to a shared report sheet.

use std::collections::BTreeMap;

use freightkit_io_xlsx::{SheetGrid, derive_cell_key};
use log::{debug, warn};

use crate::conf::C_SUFFIX_LINE_HEADER;
use crate::spec::{
    EnumPartnerBlock, QuoteError, SpecMergeOptions, SpecMergeReport, SpecPartnerCosts,
    SpecPartnerOffer, SpecReducedPortCost,
};

/// Map reduced port costs onto report destinations.
///
/// Destinations are matched on their trimmed upper-case key; a destination
/// the partner did not quote gets `cost: None`.
pub fn derive_partner_offers(
    partner_name: &str,
    reduced: &[SpecReducedPortCost],
    destinations: &[String],
) -> Vec<SpecPartnerOffer> {
    let dict_by_port: BTreeMap<&str, &SpecReducedPortCost> =
        reduced.iter().map(|r| (r.port.as_str(), r)).collect();

    destinations
        .iter()
        .map(|destination| {
            let hit = dict_by_port.get(destination.as_str());
            SpecPartnerOffer {
                partner_name: partner_name.to_string(),
                destination: destination.clone(),
                cost: hit.map(|r| r.value),
                carrier: hit.and_then(|r| r.carrier.clone()),
            }
        })
        .collect()
}

/// Write each partner into its own column block right of the used columns.
///
/// Partner `i` (slice order) starts at `first_free + i * block_width`, where
/// `first_free` is one past the rightmost column right of the anchor that
/// holds anything in or below the header row. Columns of partners merged
/// earlier are never overwritten, even behind blank spacer columns.
pub fn merge_partner_columns<G: SheetGrid + ?Sized>(
    sheet: &mut G,
    options: &SpecMergeOptions,
    partners: &[SpecPartnerCosts],
) -> Result<SpecMergeReport, QuoteError> {
    let n_row_header = options.n_row_header;
    let l_anchor_names: Vec<&str> = options.anchor_headers.iter().map(String::as_str).collect();
    let (col_anchor, if_anchor_fallback) = match sheet.find_header(n_row_header, &l_anchor_names) {
        Some(n_col) => (n_col, false),
        None => {
            warn!(
                "No anchor header {:?} in sheet {:?}; using column A",
                options.anchor_headers,
                sheet.sheet_name()
            );
            (0, true)
        }
    };

    let l_destinations = derive_destination_rows(&*sheet, n_row_header, col_anchor);
    let l_destination_keys: Vec<String> =
        l_destinations.iter().map(|(_, key)| key.clone()).collect();
    let col_first_free = derive_first_free_column(&*sheet, n_row_header, col_anchor);

    let mut report = SpecMergeReport {
        col_anchor,
        if_anchor_fallback,
        cnt_destinations: l_destinations.len(),
        ..Default::default()
    };

    for (n_idx, partner) in partners.iter().enumerate() {
        let col_start = col_first_free + n_idx * options.partner_block.width();
        let (col_line, col_cost) = match options.partner_block {
            EnumPartnerBlock::Single => (None, col_start),
            EnumPartnerBlock::Pair => (Some(col_start), col_start + 1),
        };

        if let Some(col_line) = col_line {
            let c_header = format!("{}{}", partner.partner_name, C_SUFFIX_LINE_HEADER);
            write_partner_header(sheet, options, col_anchor, col_line, &c_header)?;
        }
        write_partner_header(sheet, options, col_anchor, col_cost, &partner.partner_name)?;

        let l_offers =
            derive_partner_offers(&partner.partner_name, &partner.costs, &l_destination_keys);
        for ((n_row, _), offer) in l_destinations.iter().zip(l_offers) {
            let Some(n_cost) = offer.cost else {
                continue;
            };
            sheet.write_number(*n_row, col_cost, n_cost)?;
            report.cnt_cells_written += 1;
            if let (Some(col_line), Some(c_carrier)) = (col_line, offer.carrier.as_deref()) {
                sheet.write_string(*n_row, col_line, c_carrier)?;
            }
        }

        debug!(
            "Merged partner {:?} into {:?} at column {}",
            partner.partner_name,
            sheet.sheet_name(),
            col_start
        );
        report
            .partner_cols
            .push((partner.partner_name.clone(), col_start));
    }

    Ok(report)
}

/// `(row, key)` for every row below the header with a non-blank anchor cell.
fn derive_destination_rows<G: SheetGrid + ?Sized>(
    sheet: &G,
    n_row_header: usize,
    col_anchor: usize,
) -> Vec<(usize, String)> {
    (n_row_header + 1..sheet.n_rows())
        .filter_map(|n_row| {
            derive_cell_key(&sheet.get_value(n_row, col_anchor)).map(|key| (n_row, key))
        })
        .collect()
}

/// One past the last occupied column right of the anchor.
///
/// A column is occupied when its header cell or any cell below it is
/// non-blank; title rows above the header are ignored.
fn derive_first_free_column<G: SheetGrid + ?Sized>(
    sheet: &G,
    n_row_header: usize,
    col_anchor: usize,
) -> usize {
    let n_rows = sheet.n_rows();
    (col_anchor + 1..sheet.n_cols())
        .rev()
        .find(|n_col| {
            (n_row_header..n_rows).any(|n_row| !sheet.get_value(n_row, *n_col).is_blank())
        })
        .map_or(col_anchor + 1, |n_col| n_col + 1)
}

fn write_partner_header<G: SheetGrid + ?Sized>(
    sheet: &mut G,
    options: &SpecMergeOptions,
    col_anchor: usize,
    n_col: usize,
    c_header: &str,
) -> Result<(), QuoteError> {
    let n_row_header = options.n_row_header;
    sheet.write_string(n_row_header, n_col, c_header)?;
    sheet.copy_header_format((n_row_header, col_anchor), (n_row_header, n_col))?;
    sheet.set_column_width(n_col, options.width_partner_col)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use freightkit_io_xlsx::{EnumCellValue, MemorySheet, SpecCellFormat};

    use super::*;

    fn text(s: &str) -> EnumCellValue {
        EnumCellValue::String(s.to_string())
    }

    fn create_report() -> MemorySheet {
        let mut sheet = MemorySheet::new("REPORT 20FT");
        sheet.set_value(0, 0, text("QUOTATION"));
        sheet.set_value(3, 0, text("REGION"));
        sheet.set_value(3, 1, text("POD"));
        sheet.set_format(
            3,
            1,
            SpecCellFormat {
                bold: Some(true),
                bg_color: Some("#FFC000".to_string()),
                ..Default::default()
            },
        );
        sheet.set_value(4, 1, text("Busan"));
        sheet.set_value(5, 1, text(" tokyo "));
        sheet.set_value(6, 1, text("Osaka"));
        sheet.set_column_width(1, 22.0).expect("width");
        sheet
    }

    fn create_partner(name: &str, costs: &[(&str, f64, Option<&str>)]) -> SpecPartnerCosts {
        SpecPartnerCosts {
            partner_name: name.to_string(),
            costs: costs
                .iter()
                .map(|(port, value, carrier)| SpecReducedPortCost {
                    port: port.to_string(),
                    value: *value,
                    carrier: carrier.map(str::to_string),
                })
                .collect(),
        }
    }

    #[test]
    fn derive_partner_offers_marks_unquoted_destinations() {
        let l_reduced = [SpecReducedPortCost {
            port: "BUSAN".to_string(),
            value: 120.0,
            carrier: None,
        }];
        let l_offers = derive_partner_offers(
            "ACME",
            &l_reduced,
            &["BUSAN".to_string(), "TOKYO".to_string()],
        );
        assert_eq!(l_offers[0].cost, Some(120.0));
        assert_eq!(l_offers[1].cost, None);
        assert_eq!(l_offers[1].partner_name, "ACME");
    }

    #[test]
    fn later_partner_lands_right_of_earlier_one() {
        let mut sheet = create_report();
        let options = SpecMergeOptions::default();

        let report_1 = merge_partner_columns(
            &mut sheet,
            &options,
            &[create_partner("ACME", &[("BUSAN", 120.0, None), ("TOKYO", 98.5, None)])],
        )
        .expect("merge 1");
        assert_eq!(report_1.partner_cols, vec![("ACME".to_string(), 2)]);
        assert_eq!(report_1.cnt_cells_written, 2);

        let report_2 = merge_partner_columns(
            &mut sheet,
            &options,
            &[create_partner("BOLT", &[("OSAKA", 77.0, None), ("BUSAN", 110.0, None)])],
        )
        .expect("merge 2");
        assert_eq!(report_2.partner_cols, vec![("BOLT".to_string(), 3)]);

        assert_eq!(sheet.get_text(3, 2), "ACME");
        assert_eq!(sheet.get_value(4, 2), EnumCellValue::Number(120.0));
        assert_eq!(sheet.get_value(5, 2), EnumCellValue::Number(98.5));
        assert_eq!(sheet.get_value(6, 2), EnumCellValue::None);

        assert_eq!(sheet.get_text(3, 3), "BOLT");
        assert_eq!(sheet.get_value(4, 3), EnumCellValue::Number(110.0));
        assert_eq!(sheet.get_value(5, 3), EnumCellValue::None);
        assert_eq!(sheet.get_value(6, 3), EnumCellValue::Number(77.0));
    }

    #[test]
    fn headers_copy_anchor_style_and_width() {
        let mut sheet = create_report();
        let options = SpecMergeOptions::default();
        merge_partner_columns(
            &mut sheet,
            &options,
            &[
                create_partner("ACME", &[("BUSAN", 1.0, None)]),
                create_partner("BOLT", &[("BUSAN", 2.0, None)]),
            ],
        )
        .expect("merge");

        let fmt = sheet.get_format(3, 3).expect("format");
        assert_eq!(fmt.bold, Some(true));
        assert_eq!(fmt.bg_color.as_deref(), Some("#FFC000"));
        assert_eq!(sheet.column_width(1), Some(22.0));
        assert_eq!(sheet.column_width(2), Some(18.0));
        assert_eq!(sheet.column_width(3), Some(18.0));
    }

    #[test]
    fn pair_block_writes_line_then_cost() {
        let mut sheet = create_report();
        let options = SpecMergeOptions {
            partner_block: EnumPartnerBlock::Pair,
            ..Default::default()
        };
        let report = merge_partner_columns(
            &mut sheet,
            &options,
            &[
                create_partner("ACME", &[("BUSAN", 120.0, Some("MSC"))]),
                create_partner("BOLT", &[("TOKYO", 90.0, Some("ONE"))]),
            ],
        )
        .expect("merge");

        assert_eq!(
            report.partner_cols,
            vec![("ACME".to_string(), 2), ("BOLT".to_string(), 4)]
        );
        assert_eq!(sheet.get_text(3, 2), "ACME LINE");
        assert_eq!(sheet.get_text(3, 3), "ACME");
        assert_eq!(sheet.get_text(4, 2), "MSC");
        assert_eq!(sheet.get_value(4, 3), EnumCellValue::Number(120.0));
        assert_eq!(sheet.get_text(3, 4), "BOLT LINE");
        assert_eq!(sheet.get_text(5, 4), "ONE");
        assert_eq!(sheet.get_value(5, 5), EnumCellValue::Number(90.0));
    }

    #[test]
    fn spacer_column_does_not_expose_earlier_partners() {
        let mut sheet = create_report();
        sheet.set_value(3, 3, text("OLD"));
        sheet.set_value(4, 3, EnumCellValue::Number(77.0));

        let report = merge_partner_columns(
            &mut sheet,
            &SpecMergeOptions::default(),
            &[
                create_partner("ACME", &[("BUSAN", 1.0, None)]),
                create_partner("BOLT", &[("BUSAN", 2.0, None)]),
            ],
        )
        .expect("merge");

        assert_eq!(
            report.partner_cols,
            vec![("ACME".to_string(), 4), ("BOLT".to_string(), 5)]
        );
        assert_eq!(sheet.get_text(3, 2), "");
        assert_eq!(sheet.get_text(3, 3), "OLD");
        assert_eq!(sheet.get_value(4, 3), EnumCellValue::Number(77.0));
        assert_eq!(sheet.get_value(4, 4), EnumCellValue::Number(1.0));
        assert_eq!(sheet.get_value(4, 5), EnumCellValue::Number(2.0));
    }

    #[test]
    fn column_with_blank_header_but_data_counts_as_used() {
        let mut sheet = create_report();
        merge_partner_columns(
            &mut sheet,
            &SpecMergeOptions::default(),
            &[create_partner("", &[("BUSAN", 5.0, None)])],
        )
        .expect("merge 1");
        assert_eq!(sheet.get_value(4, 2), EnumCellValue::Number(5.0));

        let report = merge_partner_columns(
            &mut sheet,
            &SpecMergeOptions::default(),
            &[create_partner("BOLT", &[("BUSAN", 9.0, None)])],
        )
        .expect("merge 2");
        assert_eq!(report.partner_cols, vec![("BOLT".to_string(), 3)]);
        assert_eq!(sheet.get_value(4, 2), EnumCellValue::Number(5.0));
        assert_eq!(sheet.get_value(4, 3), EnumCellValue::Number(9.0));
    }

    #[test]
    fn missing_anchor_falls_back_to_column_a() {
        let mut sheet = MemorySheet::new("REPORT");
        sheet.set_value(3, 0, text("PORT"));
        sheet.set_value(4, 0, text("BUSAN"));

        let report = merge_partner_columns(
            &mut sheet,
            &SpecMergeOptions::default(),
            &[create_partner("ACME", &[("BUSAN", 5.0, None)])],
        )
        .expect("merge");
        assert!(report.if_anchor_fallback);
        assert_eq!(report.col_anchor, 0);
        assert_eq!(sheet.get_value(4, 1), EnumCellValue::Number(5.0));
    }

    #[test]
    fn port_of_discharge_header_is_accepted() {
        let mut sheet = MemorySheet::new("REPORT");
        sheet.set_value(3, 0, text("NO"));
        sheet.set_value(3, 1, text("port of discharge"));
        sheet.set_value(3, 2, text("EXISTING"));
        sheet.set_value(4, 1, text("BUSAN"));

        let report = merge_partner_columns(
            &mut sheet,
            &SpecMergeOptions::default(),
            &[create_partner("ACME", &[("BUSAN", 5.0, None)])],
        )
        .expect("merge");
        assert_eq!(report.col_anchor, 1);
        assert_eq!(report.partner_cols, vec![("ACME".to_string(), 3)]);
    }
}
