//! Logger installation for the binary.

use std::fs::OpenOptions;

use env_logger::{Builder, Env, Target};

use crate::conf::C_LOG_FILE_STDERR;
use crate::spec::AppError;

/// Install `env_logger` with `info` as default filter (`debug` when
/// `verbose`), overridable through `RUST_LOG`.
///
/// Log lines are appended to `log_file` unless it is `-`.
pub fn init_logging(log_file: &str, verbose: bool) -> Result<(), AppError> {
    let level_default = if verbose { "debug" } else { "info" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(level_default));

    if log_file != C_LOG_FILE_STDERR {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .map_err(|err| AppError::Logging(format!("{log_file}: {err}")))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}
