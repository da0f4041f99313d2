use std::process;

use chrono::Local;
use clap::Parser;
use freightkit_cli::{AppError, CliArgs, ConfigError, init_logging, load_config, parse_period, run};
use log::error;

fn main() {
    let args = CliArgs::parse();

    if let Err(err) = init_logging(&args.log_file, args.verbose) {
        eprintln!("{err}");
        process::exit(1);
    }

    match run_from_args(&args) {
        Ok(code) => process::exit(code),
        Err(AppError::Config(ConfigError::TemplateCreated(path))) => {
            eprintln!(
                "Configuration {} not found; a template was written. Edit it and run again.",
                path.display()
            );
            process::exit(1);
        }
        Err(err) => {
            error!("{err}");
            eprintln!("Error: {err}");
            process::exit(1);
        }
    }
}

fn run_from_args(args: &CliArgs) -> Result<i32, AppError> {
    let date = match &args.period {
        Some(c_period) => parse_period(c_period).ok_or_else(|| ConfigError::InvalidValue {
            key: "--period".to_string(),
            message: format!("expected YYYY-MM, got {c_period:?}"),
        })?,
        None => Local::now().date_naive(),
    };

    let config = load_config(&args.config)?;
    let report = run(&config, date)?;

    println!("{report}");
    for err in &report.errors {
        println!("  failed: {}: {}", err.path.display(), err.exception);
    }
    for c_warning in &report.warnings {
        println!("  warning: {c_warning}");
    }
    Ok(report.outcome().exit_code())
}
