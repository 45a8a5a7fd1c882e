use crate::config::variables::{ADDITIONAL_TRANSFORMS, Variables};
use crate::error::ConfxformError;
use crate::rules::matcher::eq_ignore_case;
use crate::rules::parse_rule_list;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Top-level configuration from a `.confxform.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop the directory cascade here and jump to ~/.confxform.toml.
	#[serde(default)]
	pub root: bool,

	/// Command that applies a transform file to a source file.
	/// Invoked as `<transformer> [transformer-args...] <source> <transform> <destination>`.
	#[serde(default)]
	pub transformer: Option<String>,

	/// Extra arguments passed to the transformer before the file paths.
	#[serde(default)]
	pub transformer_args: Vec<String>,

	/// Deployment variables, e.g. `"Environment.Name" = "Production"`.
	#[serde(default)]
	pub variables: BTreeMap<String, VariableValue>,
}

/// A variable value as written in TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
	Bool(bool),
	Integer(i64),
	Float(f64),
	Text(String),
}

impl fmt::Display for VariableValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			VariableValue::Bool(value) => write!(f, "{}", value),
			VariableValue::Integer(value) => write!(f, "{}", value),
			VariableValue::Float(value) => write!(f, "{}", value),
			VariableValue::Text(value) => f.write_str(value),
		}
	}
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Merged configuration from multiple config files in the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// Variables from all configs; more specific files win per key.
	pub variables: Variables,

	/// Transformer from the most specific config that names one.
	pub transformer: Option<TransformerSpec>,
}

/// The external transform command and where it was configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformerSpec {
	/// Program name or path.
	pub program: String,

	/// Arguments placed before the file paths.
	pub args: Vec<String>,

	/// The config file this transformer came from.
	pub source: PathBuf,
}

impl Config {
	/// Validate that any configured explicit transform rules parse.
	pub fn validate(&self) -> Result<(), ConfxformError> {
		for (name, value) in &self.variables {
			if eq_ignore_case(name, ADDITIONAL_TRANSFORMS) {
				parse_rule_list(&value.to_string())?;
			}
		}
		Ok(())
	}
}
