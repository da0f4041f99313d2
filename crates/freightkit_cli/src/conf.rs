//! CLI defaults and the configuration template.

/// Configuration file read when `--config` is not given.
pub const C_CONFIG_FILE_DEFAULT: &str = "freightkit.toml";
/// Log file written when `--log-file` is not given.
pub const C_LOG_FILE_DEFAULT: &str = "quotation.log";
/// `--log-file` value that keeps logs on stderr.
pub const C_LOG_FILE_STDERR: &str = "-";

/// Default input globs.
pub const TUP_PATTERNS_INCLUDE_DEFAULT: [&str; 3] = ["*.xls", "*.xlsx", "*.xlsb"];
/// Default exclude globs (Office lock files).
pub const TUP_PATTERNS_EXCLUDE_DEFAULT: [&str; 1] = ["~$*"];

/// Written to the configuration path when the file does not exist.
pub const C_CONFIG_TEMPLATE: &str = r#"# freightkit configuration

[quotation]
input_path = "sample/inputs"
input_sheet = "2025"
# Rows above the quotation header row.
n_rows_skip = 0
# "mean" (partner aggregate) or "min" (cheapest shipping line).
reduce_mode = "mean"
patterns_include = ["*.xls", "*.xlsx", "*.xlsb"]
patterns_exclude = ["~$*"]

[report]
output_path = "sample/outputs"
template_path = "templates"
top_k = 4
# "single" (cost column) or "pair" (shipping line + cost columns).
partner_block = "single"
# Existing report file: "overwrite", "skip" or "error".
rule_conflict = "overwrite"
# audit_file = "AUDIT.XLSX"

[areas.area1]
process = true
suffix = "1"
template_file = "TEMPLATE_AREA_1.XLSX"
feet20 = { report_sheet = "REPORT 20FT", bestprices_sheet = "AREA 1 - 20FT" }
feet40 = { report_sheet = "REPORT 40FT", bestprices_sheet = "AREA 1 - 40HC" }

[areas.area2]
process = true
suffix = "2"
template_file = "TEMPLATE_AREA_2.XLSX"
feet20 = { report_sheet = "REPORT 20FT", bestprices_sheet = "AREA 2 - 20FT" }
feet40 = { report_sheet = "REPORT 40FT", bestprices_sheet = "AREA 2 - 40HC" }
"#;
