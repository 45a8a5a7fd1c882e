//! Configuration loading and parsing for confxform.
//!
//! This module handles:
//! - TOML config file parsing
//! - Directory cascade discovery
//! - Config merging into a deployment variable store

pub mod cascade;
pub mod parser;
pub mod template;
pub mod types;
pub mod variables;

pub use cascade::{
	CONFIG_FILE_NAME, discover_configs, load_merged_config, merge_configs, user_config_path,
};
pub use parser::{parse_config_file, parse_config_str};
pub use template::generate_init_template;
pub use types::{Config, LoadedConfig, MergedConfig, TransformerSpec, VariableValue};
pub use variables::Variables;
