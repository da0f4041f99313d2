//! Report naming helpers.

use chrono::NaiveDate;

/// Area number: the area key without its `area` prefix.
pub fn derive_area_number(area_key: &str) -> &str {
    let c_key = area_key.trim();
    match c_key.get(..4) {
        Some(c_head) if c_head.eq_ignore_ascii_case("area") => {
            c_key[4..].trim_start_matches(['_', '-', ' '])
        }
        _ => c_key,
    }
}

/// `QUOTATION_<MONTH>_<YY>_AREA_<n>.XLSX` for the month of `date`.
pub fn derive_report_file_name(area_key: &str, date: NaiveDate) -> String {
    let c_month = date.format("%B").to_string().to_uppercase();
    let c_year = date.format("%y");
    let c_area = derive_area_number(area_key).to_uppercase();
    format!("QUOTATION_{c_month}_{c_year}_AREA_{c_area}.XLSX")
}

/// First day of a `YYYY-MM` period.
pub fn parse_period(period: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", period.trim()), "%Y-%m-%d").ok()
}
