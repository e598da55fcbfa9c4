//! Config module.
//! Provides configuration types, default paths and XML loading.

pub mod paths;
pub mod types;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor, CONFIG_ENV};
pub use types::{Config, LogLevel};
pub use xml::{load_config, load_config_from_xml, write_template_config};
