use std::path::PathBuf;

use clap::Parser;

use crate::conf::{C_CONFIG_FILE_DEFAULT, C_LOG_FILE_DEFAULT};

#[derive(Parser, Debug, Clone)]
#[command(name = "freightkit")]
#[command(about = "Merge partner freight quotations into area reports and rank best prices")]
#[command(version)]
pub struct CliArgs {
    /// Configuration file; a template is written when it does not exist
    #[arg(long, short = 'c', value_name = "PATH", default_value = C_CONFIG_FILE_DEFAULT)]
    pub config: PathBuf,

    /// Log file, or "-" for stderr
    #[arg(long, value_name = "PATH", default_value = C_LOG_FILE_DEFAULT)]
    pub log_file: String,

    /// Debug-level logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Reporting period used in report file names (YYYY-MM); defaults to today
    #[arg(long, value_name = "YYYY-MM")]
    pub period: Option<String>,
}
