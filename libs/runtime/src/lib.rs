//! Process-level plumbing shared by the binaries: layered configuration and
//! logging initialisation.

pub mod config;
pub mod logging;

pub use config::{
    default_logging_config, AppConfig, CliArgs, DocumentConfig, LoggingConfig, OutputConfig,
    OutputFormat, Section,
};
pub use logging::init_logging_from_config;
