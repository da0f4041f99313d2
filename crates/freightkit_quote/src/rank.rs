//! Best-price ranking across partner columns and summary sheet filling.

use freightkit_io_xlsx::{SheetGrid, convert_cell_to_f64, derive_cell_key};
use log::{debug, warn};

use crate::spec::{
    BestPriceBook, QuoteError, SpecBestPriceEntry, SpecFillOptions, SpecFillReport,
    SpecRankOptions,
};

////////////////////////////////////////////////////////////////////////////////
// #region Ranking

/// Rank partner offers per destination row of a populated report sheet.
///
/// Partner columns are those at or right of `n_cols_skip` with a header that
/// is neither blank nor excluded. Only finite numeric cells count. Each
/// destination keeps its `top_k` cheapest offers; a later row for the same
/// destination replaces an earlier one.
pub fn rank_best_prices<G: SheetGrid + ?Sized>(
    sheet: &G,
    options: &SpecRankOptions,
) -> Result<BestPriceBook, QuoteError> {
    let n_row_header = options.n_row_header;
    let col_pod = sheet
        .find_header(n_row_header, &[options.header_pod.as_str()])
        .ok_or_else(|| QuoteError::HeaderNotFound {
            sheet_name: sheet.sheet_name().to_string(),
            header: options.header_pod.clone(),
        })?;

    let l_partner_cols: Vec<(usize, String)> = (options.n_cols_skip..sheet.n_cols())
        .filter(|n_col| *n_col != col_pod)
        .filter_map(|n_col| {
            let c_header = sheet.get_text(n_row_header, n_col).trim().to_string();
            let c_header_upper = c_header.to_uppercase();
            let if_excluded = c_header.is_empty()
                || options
                    .headers_excluded
                    .iter()
                    .any(|c_excluded| c_header.eq_ignore_ascii_case(c_excluded.trim()))
                || options
                    .header_suffixes_excluded
                    .iter()
                    .any(|c_suffix| c_header_upper.ends_with(&c_suffix.to_uppercase()));
            (!if_excluded).then_some((n_col, c_header))
        })
        .collect();

    let mut book = BestPriceBook::new();
    for n_row in n_row_header + 1..sheet.n_rows() {
        let Some(destination) = derive_cell_key(&sheet.get_value(n_row, col_pod)) else {
            continue;
        };

        let mut l_entries: Vec<SpecBestPriceEntry> = l_partner_cols
            .iter()
            .filter_map(|(n_col, c_partner)| {
                convert_cell_to_f64(&sheet.get_value(n_row, *n_col)).map(|cost| {
                    SpecBestPriceEntry {
                        destination: destination.clone(),
                        partner_name: c_partner.clone(),
                        cost,
                    }
                })
            })
            .collect();
        l_entries.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        l_entries.truncate(options.top_k);

        if book.get(&destination).is_some() {
            debug!("Destination {destination} repeated at row {n_row}; keeping the later row");
        }
        book.insert(destination, l_entries);
    }

    debug!(
        "Ranked {} destinations over {} partner columns in {:?}",
        book.len(),
        l_partner_cols.len(),
        sheet.sheet_name()
    );
    Ok(book)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Filling

/// Place ranked entries into a summary sheet, one per destination row.
///
/// Each row with a known destination pops the next cheapest entry and writes
/// the partner name and the rounded cost beside the destination cell. Rows
/// whose destination is exhausted or unknown are left untouched.
pub fn fill_best_prices<G: SheetGrid + ?Sized>(
    sheet: &mut G,
    book: &mut BestPriceBook,
    options: &SpecFillOptions,
) -> Result<SpecFillReport, QuoteError> {
    let n_row_header = options.n_row_header;
    let col_dest = sheet
        .find_header(n_row_header, &[options.header_destination.as_str()])
        .ok_or_else(|| QuoteError::HeaderNotFound {
            sheet_name: sheet.sheet_name().to_string(),
            header: options.header_destination.clone(),
        })?;
    let col_partner = col_dest + options.n_offset_partner;
    let col_cost = col_dest + options.n_offset_cost;

    let mut report = SpecFillReport::default();
    for n_row in n_row_header + 1..sheet.n_rows() {
        let Some(destination) = derive_cell_key(&sheet.get_value(n_row, col_dest)) else {
            continue;
        };
        let Some(entry) = book.pop(&destination) else {
            report.cnt_rows_untouched += 1;
            continue;
        };
        sheet.write_string(n_row, col_partner, &entry.partner_name)?;
        sheet.write_number(n_row, col_cost, round_to_decimals(entry.cost, options.n_decimals))?;
        report.cnt_rows_filled += 1;
    }

    report.cnt_entries_unused = book.n_entries_remaining();
    if report.cnt_entries_unused > 0 {
        warn!(
            "{} ranked offers had no summary row left in {:?}",
            report.cnt_entries_unused,
            sheet.sheet_name()
        );
    }
    Ok(report)
}

/// Rank `report` with default options and `top_k`, then fill `summary`.
pub fn rank_and_fill_best_prices<R, S>(
    report: &R,
    summary: &mut S,
    top_k: usize,
) -> Result<SpecFillReport, QuoteError>
where
    R: SheetGrid + ?Sized,
    S: SheetGrid + ?Sized,
{
    let options_rank = SpecRankOptions {
        top_k,
        ..Default::default()
    };
    let mut book = rank_best_prices(report, &options_rank)?;
    fill_best_prices(summary, &mut book, &SpecFillOptions::default())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Rounding

/// Round half away from zero on the shortest decimal representation of
/// `value`, so `120.505` becomes `120.51` even though its binary value is
/// slightly below the midpoint.
pub fn round_to_decimals(value: f64, n_decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let n_decimals = n_decimals.min(15);
    let c_abs = value.abs().to_string();
    let Some((c_int, c_frac)) = c_abs.split_once('.') else {
        return value;
    };
    if c_frac.len() <= n_decimals {
        return value;
    }

    let c_digits = format!("{c_int}{}", &c_frac[..n_decimals]);
    let Ok(mut n_scaled) = c_digits.parse::<u128>() else {
        let n_factor = 10f64.powi(n_decimals as i32);
        return (value * n_factor).round() / n_factor;
    };
    if c_frac.as_bytes()[n_decimals] >= b'5' {
        n_scaled += 1;
    }

    let n_rounded = n_scaled as f64 / 10f64.powi(n_decimals as i32);
    if value.is_sign_negative() {
        -n_rounded
    } else {
        n_rounded
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use freightkit_io_xlsx::{EnumCellValue, MemorySheet};

    use super::*;

    fn text(s: &str) -> EnumCellValue {
        EnumCellValue::String(s.to_string())
    }

    fn num(n: f64) -> EnumCellValue {
        EnumCellValue::Number(n)
    }

    /// Report with header row 3: `NO | REGION | POD | A | B | C`.
    fn create_report(rows: &[(&str, [Option<f64>; 3])]) -> MemorySheet {
        let mut sheet = MemorySheet::new("REPORT");
        for (n_col, c_header) in ["NO", "REGION", "POD", "A", "B", "C"].iter().enumerate() {
            sheet.set_value(3, n_col, text(c_header));
        }
        for (n_idx, (pod, costs)) in rows.iter().enumerate() {
            let n_row = 4 + n_idx;
            sheet.set_value(n_row, 0, num((n_idx + 1) as f64));
            sheet.set_value(n_row, 2, text(pod));
            for (n_offset, cost) in costs.iter().enumerate() {
                if let Some(n_cost) = cost {
                    sheet.set_value(n_row, 3 + n_offset, num(*n_cost));
                }
            }
        }
        sheet
    }

    /// Summary with header row 4: `AREA | DESTINATION | - | PARTNER | COST`.
    fn create_summary(destinations: &[&str]) -> MemorySheet {
        let mut sheet = MemorySheet::new("AREA 1 - 20FT");
        sheet.set_value(4, 0, text("AREA"));
        sheet.set_value(4, 1, text("DESTINATION"));
        sheet.set_value(4, 3, text("PARTNER"));
        sheet.set_value(4, 4, text("COST"));
        for (n_idx, c_dest) in destinations.iter().enumerate() {
            sheet.set_value(5 + n_idx, 1, text(c_dest));
        }
        sheet
    }

    #[test]
    fn busan_ranking_rounds_and_orders_ties_first() {
        let report = create_report(&[("Busan", [Some(120.505), Some(95.0), Some(95.0)])]);
        let book = rank_best_prices(&report, &SpecRankOptions::default()).expect("rank");
        let l_entries: Vec<(&str, f64)> = book
            .get("BUSAN")
            .expect("busan")
            .iter()
            .map(|e| (e.partner_name.as_str(), e.cost))
            .collect();
        assert_eq!(l_entries.len(), 3);
        assert_eq!(l_entries[0].1, 95.0);
        assert_eq!(l_entries[1].1, 95.0);
        assert_eq!(l_entries[2], ("A", 120.505));

        let mut summary = create_summary(&["BUSAN", "busan", "BUSAN"]);
        let mut book = book;
        let report_fill =
            fill_best_prices(&mut summary, &mut book, &SpecFillOptions::default()).expect("fill");
        assert_eq!(report_fill.cnt_rows_filled, 3);
        assert_eq!(summary.get_value(5, 4), num(95.0));
        assert_eq!(summary.get_value(6, 4), num(95.0));
        assert_eq!(summary.get_text(7, 3), "A");
        assert_eq!(summary.get_value(7, 4), num(120.51));
        let mut l_tied = vec![summary.get_text(5, 3), summary.get_text(6, 3)];
        l_tied.sort();
        assert_eq!(l_tied, vec!["B", "C"]);
    }

    #[test]
    fn each_entry_is_used_once_and_extra_rows_stay_untouched() {
        let report = create_report(&[("TOKYO", [Some(30.0), Some(10.0), Some(20.0)])]);
        let mut summary = create_summary(&["TOKYO", "TOKYO", "TOKYO", "TOKYO", "TOKYO"]);

        let report_fill = rank_and_fill_best_prices(&report, &mut summary, 4).expect("fill");
        assert_eq!(report_fill.cnt_rows_filled, 3);
        assert_eq!(report_fill.cnt_rows_untouched, 2);
        assert_eq!(report_fill.cnt_entries_unused, 0);

        assert_eq!(summary.get_text(5, 3), "B");
        assert_eq!(summary.get_text(6, 3), "C");
        assert_eq!(summary.get_text(7, 3), "A");
        assert_eq!(summary.get_value(8, 3), EnumCellValue::None);
        assert_eq!(summary.get_value(9, 4), EnumCellValue::None);
    }

    #[test]
    fn top_k_truncates_and_leftovers_are_counted() {
        let report = create_report(&[("OSAKA", [Some(3.0), Some(1.0), Some(2.0)])]);
        let options = SpecRankOptions {
            top_k: 2,
            ..Default::default()
        };
        let mut book = rank_best_prices(&report, &options).expect("rank");
        assert_eq!(book.n_entries_remaining(), 2);

        let mut summary = create_summary(&["OSAKA"]);
        let report_fill =
            fill_best_prices(&mut summary, &mut book, &SpecFillOptions::default()).expect("fill");
        assert_eq!(report_fill.cnt_rows_filled, 1);
        assert_eq!(report_fill.cnt_entries_unused, 1);
        assert_eq!(summary.get_text(5, 3), "B");
    }

    #[test]
    fn later_duplicate_destination_replaces_earlier() {
        let report = create_report(&[
            ("BUSAN", [Some(1.0), None, None]),
            ("busan ", [None, Some(7.0), None]),
        ]);
        let book = rank_best_prices(&report, &SpecRankOptions::default()).expect("rank");
        let l_entries = book.get("BUSAN").expect("busan");
        assert_eq!(l_entries.len(), 1);
        assert_eq!(l_entries[0].partner_name, "B");
    }

    #[test]
    fn skipped_blank_and_text_columns_are_ignored() {
        let mut report = create_report(&[("BUSAN", [Some(5.0), None, None])]);
        report.set_value(4, 1, num(1.0));
        report.set_value(4, 4, text("TBA"));
        report.set_value(4, 7, num(0.5));

        let book = rank_best_prices(&report, &SpecRankOptions::default()).expect("rank");
        let l_partners: Vec<&str> = book
            .iter_entries()
            .map(|e| e.partner_name.as_str())
            .collect();
        assert_eq!(l_partners, vec!["A"]);
    }

    #[test]
    fn pair_block_line_columns_are_not_offers() {
        let mut report = MemorySheet::new("REPORT");
        for (n_col, c_header) in ["NO", "REGION", "POD", "ACME LINE", "ACME", "BOLT LINE", "BOLT"]
            .iter()
            .enumerate()
        {
            report.set_value(3, n_col, text(c_header));
        }
        report.set_value(4, 2, text("BUSAN"));
        report.set_value(4, 3, num(2.0));
        report.set_value(4, 4, num(120.0));
        report.set_value(4, 5, text("ONE"));
        report.set_value(4, 6, num(95.0));

        let book = rank_best_prices(&report, &SpecRankOptions::default()).expect("rank");
        let l_ranked: Vec<(&str, f64)> = book
            .iter_entries()
            .map(|e| (e.partner_name.as_str(), e.cost))
            .collect();
        assert_eq!(l_ranked, vec![("BOLT", 95.0), ("ACME", 120.0)]);
    }

    #[test]
    fn missing_headers_are_layout_errors() {
        let sheet = MemorySheet::new("EMPTY");
        assert!(matches!(
            rank_best_prices(&sheet, &SpecRankOptions::default()),
            Err(QuoteError::HeaderNotFound { .. })
        ));

        let mut sheet = MemorySheet::new("EMPTY");
        let mut book = BestPriceBook::new();
        assert!(matches!(
            fill_best_prices(&mut sheet, &mut book, &SpecFillOptions::default()),
            Err(QuoteError::HeaderNotFound { .. })
        ));
    }

    #[test]
    fn round_to_decimals_is_half_away_from_zero_on_decimal_text() {
        assert_eq!(round_to_decimals(120.505, 2), 120.51);
        assert_eq!(round_to_decimals(-120.505, 2), -120.51);
        assert_eq!(round_to_decimals(2.675, 2), 2.68);
        assert_eq!(round_to_decimals(95.0, 2), 95.0);
        assert_eq!(round_to_decimals(1.004, 2), 1.0);
        assert_eq!(round_to_decimals(0.999, 2), 1.0);
    }
}
