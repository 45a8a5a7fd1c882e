use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, MergedConfig, TransformerSpec};
use crate::config::variables::is_truthy;
use crate::error::{ConfxformError, Result};
use std::path::{Path, PathBuf};

/// File name looked up in the package directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = ".confxform.toml";

/// Environment variable that, if truthy, skips ~/.confxform.toml lookup.
pub const NO_USER_CONFIG_ENV_VAR: &str = "CONFXFORM_NO_USER_CONFIG";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.confxform.toml`
/// 2. If found and `root = true`, stop walking up
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.confxform.toml (unless disabled)
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = Some(start_dir);

	while let Some(dir) = current_dir {
		let config_path = dir.join(CONFIG_FILE_NAME);

		if config_path.is_file() {
			let config = parse_config_file(&config_path)?;
			let is_root = config.root;

			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if is_root {
				break;
			}
		}

		current_dir = dir.parent();
	}

	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load the user's ~/.confxform.toml if it exists and isn't disabled.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	if std::env::var(NO_USER_CONFIG_ENV_VAR).is_ok_and(|value| is_truthy(&value)) {
		return Ok(None);
	}

	let user_config_path = user_config_path()?;

	// Already picked up while walking a directory tree under $HOME
	if existing_configs.iter().any(|loaded| loaded.path == user_config_path) {
		return Ok(None);
	}

	if user_config_path.is_file() {
		let config = parse_config_file(&user_config_path)?;
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

/// Merge multiple configs into a single effective config.
///
/// Variables are applied least specific first so that files nearer the
/// package override the same key set further up. The transformer comes from
/// the most specific config that names one.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let mut merged = MergedConfig::default();

	for loaded in configs.iter().rev() {
		for (name, value) in &loaded.config.variables {
			merged.variables.set(name.as_str(), value.to_string());
		}
	}

	merged.transformer = configs.iter().find_map(|loaded| {
		loaded
			.config
			.transformer
			.as_ref()
			.map(|program| TransformerSpec {
				program: program.clone(),
				args: loaded.config.transformer_args.clone(),
				source: loaded.path.clone(),
			})
	});

	merged
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(ConfxformError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
