use crate::error::{ConfxformError, Result};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::LazyLock;

/// Flag enabling the implicit `Release` and environment-named transforms.
pub const AUTO_RUN_TRANSFORMS: &str = "AutomaticallyRunConfigurationTransformationFiles";

/// Name of the environment being deployed to.
pub const ENVIRONMENT_NAME: &str = "Environment.Name";

/// Comma or newline separated list of explicit transform rules.
pub const ADDITIONAL_TRANSFORMS: &str = "AdditionalXmlConfigurationTransforms";

/// Flag turning transformer failures into warnings.
pub const IGNORE_TRANSFORM_ERRORS: &str = "IgnoreConfigurationTransformationErrors";

/// Nested `#{...}` references deeper than this are left unexpanded.
const MAX_EXPANSION_DEPTH: usize = 10;

static REFERENCE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"#\{([^{}]+)\}").expect("reference pattern is valid"));

/// Case-insensitive deployment variable store.
///
/// Values may refer to other variables as `#{Name}`; references are expanded
/// on lookup and unknown ones are left as written.
#[derive(Debug, Clone, Default)]
pub struct Variables {
	/// Lowercased name -> (name as first written, value).
	entries: BTreeMap<String, (String, String)>,
}

impl Variables {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set a variable, replacing any existing value regardless of case.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		let key = name.to_lowercase();
		let value = value.into();
		match self.entries.entry(key) {
			Entry::Occupied(mut entry) => entry.get_mut().1 = value,
			Entry::Vacant(entry) => {
				entry.insert((name, value));
			}
		}
	}

	/// Append a line to a list-valued variable.
	pub fn append_line(&mut self, name: &str, line: &str) {
		let value = match self.get_raw(name) {
			Some(existing) if !existing.trim().is_empty() => format!("{}\n{}", existing, line),
			_ => line.to_string(),
		};
		self.set(name, value);
	}

	/// Parse and set a `KEY=VALUE` assignment.
	pub fn set_assignment(&mut self, assignment: &str) -> Result<()> {
		let (name, value) = assignment
			.split_once('=')
			.filter(|(name, _)| !name.trim().is_empty())
			.ok_or_else(|| ConfxformError::InvalidVariableAssignment {
				assignment: assignment.to_string(),
			})?;
		self.set(name.trim(), value);
		Ok(())
	}

	/// The value exactly as stored, without reference expansion.
	pub fn get_raw(&self, name: &str) -> Option<&str> {
		self.entries
			.get(&name.to_lowercase())
			.map(|(_, value)| value.as_str())
	}

	/// The value with `#{...}` references expanded.
	pub fn get(&self, name: &str) -> Option<String> {
		self.get_raw(name).map(|value| self.expand(value, 0))
	}

	/// The value as a boolean flag, or `default` when unset.
	pub fn get_flag(&self, name: &str, default: bool) -> bool {
		self.get(name).map_or(default, |value| is_truthy(&value))
	}

	/// Iterate over `(name, raw value)` pairs ordered by name.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries
			.values()
			.map(|(name, value)| (name.as_str(), value.as_str()))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	fn expand(&self, value: &str, depth: usize) -> String {
		if depth >= MAX_EXPANSION_DEPTH || !value.contains("#{") {
			return value.to_string();
		}
		REFERENCE
			.replace_all(value, |caps: &Captures| match self.get_raw(caps[1].trim()) {
				Some(inner) => self.expand(inner, depth + 1),
				None => caps[0].to_string(),
			})
			.into_owned()
	}
}

/// Check whether a string reads as an enabled flag.
///
/// Empty, `0`, `false` and `no` (any case) are false; anything else is true.
pub fn is_truthy(value: &str) -> bool {
	let lower = value.trim().to_lowercase();
	!lower.is_empty() && lower != "0" && lower != "false" && lower != "no"
}
