use std::path::PathBuf;

/// Library-level structured errors for confxform.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum ConfxformError {
	#[error("Malformed transform rule '{rule}': {reason}")]
	MalformedRule { rule: String, reason: String },

	#[error("Failed to transform {source_file} using {transform_file}")]
	TransformApplication {
		source_file: PathBuf,
		transform_file: PathBuf,
		#[source]
		source: Box<ConfxformError>,
	},

	#[error("Failed to enumerate files under: {directory}")]
	EnumerationFailed {
		directory: PathBuf,
		#[source]
		source: walkdir::Error,
	},

	#[error("Invalid file pattern '{pattern}': {reason}")]
	InvalidGlob { pattern: String, reason: String },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid variable assignment '{assignment}', expected KEY=VALUE")]
	InvalidVariableAssignment { assignment: String },

	#[error("Transformer not found: {command}")]
	TransformerNotFound { command: String },

	#[error("Transformer execution failed: {program}")]
	TransformerFailed {
		program: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Transformer returned non-zero exit code: {program} (exit code: {exit_code})")]
	TransformerNonZeroExit { program: PathBuf, exit_code: i32 },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using ConfxformError.
pub type Result<T> = std::result::Result<T, ConfxformError>;
