//! Run configuration for varform.
//!
//! This crate handles:
//! - The resolved per-run configuration (paths, project, policies)
//! - Layering of config-file values under explicit overrides
//! - Parsing of `varform.kdl` config files

pub mod error;
pub mod file;
pub mod run;

pub use error::{ConfigError, ConfigResult};
pub use file::{ConfigFile, parse_config_file};
pub use run::{OutputMode, RunConfig, RunConfigBuilder};
