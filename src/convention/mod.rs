//! The configuration transforms convention.
//!
//! Given an extracted package directory, finds the configuration files in it,
//! works out which transform files apply to each (implicit `Release` and
//! environment transforms plus explicit rules), and applies every transform
//! that exists on disk in place.

pub mod collaborators;

pub use collaborators::{FileEnumerator, FileExistenceChecker, TransformApplier};

use crate::config::variables::{
	ADDITIONAL_TRANSFORMS, AUTO_RUN_TRANSFORMS, ENVIRONMENT_NAME, IGNORE_TRANSFORM_ERRORS,
	Variables,
};
use crate::error::{ConfxformError, Result};
use crate::rules::matcher::{WILDCARD, eq_ignore_case, split_extension, split_file_name};
use crate::rules::{
	RuleExpression, parse_rule_list, resolve_transform_path, resolve_transform_paths, transform_key,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Glob every package is searched with.
pub const DEFAULT_CONFIG_PATTERN: &str = "*.config";

/// Suffix token of the implicit release transform.
pub const RELEASE_TOKEN: &str = "Release";

/// One transform to apply: `transform_file` merged into `source_file`,
/// written to `destination_file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformApplication {
	pub source_file: PathBuf,
	pub transform_file: PathBuf,
	pub destination_file: PathBuf,
}

impl TransformApplication {
	/// A transform that overwrites its source file.
	pub fn in_place(source_file: &Path, transform_file: &Path) -> Self {
		TransformApplication {
			source_file: source_file.to_path_buf(),
			transform_file: transform_file.to_path_buf(),
			destination_file: source_file.to_path_buf(),
		}
	}
}

/// A transformer failure that was logged and skipped.
#[derive(Debug)]
pub struct IgnoredFailure {
	pub application: TransformApplication,
	pub error: ConfxformError,
}

/// Outcome of running the convention once.
#[derive(Debug, Default)]
pub struct TransformReport {
	/// Transforms applied successfully, in the order they ran.
	pub applied: Vec<TransformApplication>,

	/// Transforms that failed while errors were being ignored.
	pub ignored_failures: Vec<IgnoredFailure>,

	/// Explicit rules that found no transform file for any source file.
	pub unmatched_rules: Vec<RuleExpression>,
}

/// Convention inputs read from the deployment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConventionSettings {
	/// Whether the implicit `Release` and environment transforms run.
	pub auto_run: bool,

	/// Environment name used as an implicit suffix rule.
	pub environment: Option<String>,

	/// User-supplied rules; these run regardless of `auto_run`.
	pub explicit_rules: Vec<RuleExpression>,

	/// Log and continue when a transform fails instead of aborting.
	pub ignore_errors: bool,
}

impl ConventionSettings {
	/// Read the settings, parsing any explicit rules.
	pub fn from_variables(variables: &Variables) -> Result<Self> {
		let explicit_rules = match variables.get(ADDITIONAL_TRANSFORMS) {
			Some(text) => parse_rule_list(&text)?,
			None => Vec::new(),
		};

		let environment = variables
			.get(ENVIRONMENT_NAME)
			.map(|name| name.trim().to_string())
			.filter(|name| !name.is_empty());

		Ok(ConventionSettings {
			auto_run: variables.get_flag(AUTO_RUN_TRANSFORMS, false),
			environment,
			explicit_rules,
			ignore_errors: variables.get_flag(IGNORE_TRANSFORM_ERRORS, false),
		})
	}

	/// The implicit rules enabled by `auto_run`, in evaluation order.
	pub fn implicit_rules(&self) -> Vec<RuleExpression> {
		if !self.auto_run {
			return Vec::new();
		}

		let mut rules = vec![RuleExpression::Suffix {
			token: RELEASE_TOKEN.to_string(),
		}];
		if let Some(environment) = &self.environment {
			rules.push(RuleExpression::Suffix {
				token: environment.clone(),
			});
		}
		rules
	}

	/// Glob patterns used to discover source files.
	///
	/// Always includes `*.config`; explicit pair rules whose source pattern
	/// has another extension add a pattern for that extension too.
	pub fn search_patterns(&self) -> Vec<String> {
		let mut patterns = vec![DEFAULT_CONFIG_PATTERN.to_string()];

		for rule in &self.explicit_rules {
			let RuleExpression::Pair { source_pattern, .. } = rule else {
				continue;
			};
			let (_, name) = split_file_name(source_pattern);
			let (_, ext) = split_extension(name);
			if ext.is_empty() || ext.contains(WILDCARD) {
				continue;
			}

			let pattern = format!("*{}", ext);
			if !patterns.iter().any(|existing| eq_ignore_case(existing, &pattern)) {
				patterns.push(pattern);
			}
		}

		patterns
	}
}

/// Finds and applies configuration transforms within a package directory.
pub struct ConfigurationTransformsConvention<'a> {
	enumerator: &'a dyn FileEnumerator,
	existence: &'a dyn FileExistenceChecker,
	transformer: &'a dyn TransformApplier,
}

impl<'a> ConfigurationTransformsConvention<'a> {
	pub fn new(
		enumerator: &'a dyn FileEnumerator,
		existence: &'a dyn FileExistenceChecker,
		transformer: &'a dyn TransformApplier,
	) -> Self {
		ConfigurationTransformsConvention {
			enumerator,
			existence,
			transformer,
		}
	}

	/// Run the convention against `package_root` using deployment variables.
	pub fn install(&self, package_root: &Path, variables: &Variables) -> Result<TransformReport> {
		let settings = ConventionSettings::from_variables(variables)?;
		self.run(package_root, &settings)
	}

	/// Run the convention with already-parsed settings.
	///
	/// A transformer failure aborts the run unless `ignore_errors` is set.
	/// Transform files that do not exist are skipped silently.
	pub fn run(&self, package_root: &Path, settings: &ConventionSettings) -> Result<TransformReport> {
		let mut rules = settings.implicit_rules();
		let explicit_start = rules.len();
		rules.extend(settings.explicit_rules.iter().cloned());

		if rules.is_empty() {
			tracing::debug!("No configuration transform rules apply");
			return Ok(TransformReport::default());
		}

		let patterns = settings.search_patterns();
		let files = self
			.enumerator
			.enumerate_files_recursively(package_root, &patterns)?;
		tracing::debug!(
			"Found {} candidate configuration files under {} matching {:?}",
			files.len(),
			package_root.display(),
			patterns
		);

		let mut report = TransformReport::default();
		let mut rule_matched = vec![false; rules.len()];

		for source_file in &files {
			let mut found = HashSet::new();

			for candidate in resolve_transform_paths(source_file, &rules) {
				if same_file(source_file, &candidate) {
					continue;
				}

				let Some(transform_file) = self.existence.locate_file(&candidate) else {
					tracing::debug!(
						"No transform {} for {}",
						candidate.display(),
						source_file.display()
					);
					continue;
				};

				found.insert(transform_key(&candidate));
				let application = TransformApplication::in_place(source_file, &transform_file);
				self.apply(application, settings.ignore_errors, &mut report)?;
			}

			for (rule, matched) in rules.iter().zip(rule_matched.iter_mut()) {
				if !*matched {
					*matched = resolve_transform_path(source_file, rule)
						.is_some_and(|path| found.contains(&transform_key(&path)));
				}
			}
		}

		report.unmatched_rules = rules[explicit_start..]
			.iter()
			.zip(&rule_matched[explicit_start..])
			.filter(|(_, matched)| !**matched)
			.map(|(rule, _)| rule.clone())
			.collect();

		for rule in &report.unmatched_rules {
			tracing::warn!(
				"The transform rule \"{}\" was not performed due to a missing file or a mismatched pattern",
				rule
			);
		}

		Ok(report)
	}

	fn apply(
		&self,
		application: TransformApplication,
		ignore_errors: bool,
		report: &mut TransformReport,
	) -> Result<()> {
		tracing::info!(
			"Transforming {} using {}",
			application.source_file.display(),
			application.transform_file.display()
		);

		match self.transformer.perform_transform(
			&application.source_file,
			&application.transform_file,
			&application.destination_file,
		) {
			Ok(()) => {
				report.applied.push(application);
				Ok(())
			}
			Err(error) if ignore_errors => {
				tracing::warn!(
					"Ignoring failed transform of {} using {}: {}",
					application.source_file.display(),
					application.transform_file.display(),
					error
				);
				report.ignored_failures.push(IgnoredFailure { application, error });
				Ok(())
			}
			Err(error) => Err(ConfxformError::TransformApplication {
				source_file: application.source_file,
				transform_file: application.transform_file,
				source: Box::new(error),
			}),
		}
	}
}

fn same_file(a: &Path, b: &Path) -> bool {
	transform_key(a) == transform_key(b)
}
