//! `freightkit_cli`:
//! Batch front end of the quotation engine.
//!
//! - `cli`     : command-line arguments
//! - `conf`    : defaults and the configuration template
//! - `config`  : configuration load/validation
//! - `logging` : `env_logger` setup
//! - `app`     : quotation, best-price and audit phases
//! - `spec`    : configuration models and errors
//! - `util`    : report naming
pub mod app;
pub mod cli;
pub mod conf;
pub mod config;
pub mod logging;
pub mod spec;
pub mod util;

pub use app::run;
pub use cli::CliArgs;
pub use config::{load_config, parse_config, validate_config, validate_environment};
pub use logging::init_logging;
pub use spec::{AppError, ConfigError, SpecAppConfig, SpecRunSettings};
pub use util::{derive_report_file_name, parse_period};
