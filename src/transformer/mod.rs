//! Transform application for confxform.
//!
//! This module handles:
//! - Running an external transform command for each matched file pair
//! - Transform environment variable setup
//! - Dry runs that only report what would be transformed

use crate::convention::TransformApplier;
use crate::error::{ConfxformError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Runs `<program> [args...] <source> <transform> <destination>`.
#[derive(Debug, Clone)]
pub struct CommandTransformer {
	program: PathBuf,
	args: Vec<String>,
	working_dir: Option<PathBuf>,
}

impl CommandTransformer {
	pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
		CommandTransformer {
			program: program.into(),
			args,
			working_dir: None,
		}
	}

	/// Resolve `command` on PATH (or as a path) and build a transformer for it.
	pub fn from_command(command: &str, args: Vec<String>) -> Result<Self> {
		let program = resolve_command(command).ok_or_else(|| ConfxformError::TransformerNotFound {
			command: command.to_string(),
		})?;
		Ok(Self::new(program, args))
	}

	/// Run the transformer from `dir` instead of the current directory.
	pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.working_dir = Some(dir.into());
		self
	}

	pub fn program(&self) -> &Path {
		&self.program
	}
}

impl TransformApplier for CommandTransformer {
	fn perform_transform(
		&self,
		source_file: &Path,
		transform_file: &Path,
		destination_file: &Path,
	) -> Result<()> {
		let env = build_transform_env(source_file, transform_file, destination_file);

		let mut cmd = Command::new(&self.program);
		cmd.args(&self.args)
			.arg(source_file)
			.arg(transform_file)
			.arg(destination_file)
			.stdin(Stdio::null())
			.stdout(Stdio::inherit())
			.stderr(Stdio::inherit())
			.envs(&env);
		if let Some(ref dir) = self.working_dir {
			cmd.current_dir(dir);
		}

		tracing::debug!("Running transformer: {:?}", cmd);

		let status = cmd.status().map_err(|source| ConfxformError::TransformerFailed {
			program: self.program.clone(),
			source,
		})?;

		if !status.success() {
			return Err(ConfxformError::TransformerNonZeroExit {
				program: self.program.clone(),
				exit_code: status.code().unwrap_or(-1),
			});
		}

		Ok(())
	}
}

/// Logs each transform without touching any file.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunTransformer;

impl TransformApplier for DryRunTransformer {
	fn perform_transform(
		&self,
		source_file: &Path,
		transform_file: &Path,
		destination_file: &Path,
	) -> Result<()> {
		tracing::info!(
			"Dry run: would transform {} using {} into {}",
			source_file.display(),
			transform_file.display(),
			destination_file.display()
		);
		Ok(())
	}
}

/// Build environment variables for the transformer process.
pub fn build_transform_env(
	source_file: &Path,
	transform_file: &Path,
	destination_file: &Path,
) -> HashMap<String, String> {
	let mut env = HashMap::new();

	env.insert(
		"CONFXFORM_SOURCE_FILE".to_string(),
		source_file.to_string_lossy().to_string(),
	);
	env.insert(
		"CONFXFORM_TRANSFORM_FILE".to_string(),
		transform_file.to_string_lossy().to_string(),
	);
	env.insert(
		"CONFXFORM_DESTINATION_FILE".to_string(),
		destination_file.to_string_lossy().to_string(),
	);

	env
}

/// Resolve a command name to its full path.
///
/// Absolute paths and paths containing a separator are returned if they
/// exist. Bare names are searched for on PATH.
pub fn resolve_command(command: &str) -> Option<PathBuf> {
	let path = Path::new(command);

	if path.is_absolute() || path.components().count() > 1 {
		return path.exists().then(|| path.to_path_buf());
	}

	let path_var = std::env::var_os("PATH")?;
	std::env::split_paths(&path_var)
		.map(|dir| dir.join(command))
		.find(|full_path| full_path.is_file())
}
