use crate::error::{ConfxformError, Result};
use std::fmt;
use std::str::FromStr;

/// Separator between the transform and source patterns of a pair rule.
pub const PAIR_SEPARATOR: &str = "=>";

/// Characters that separate entries in a configured list of rules.
const RULE_LIST_DELIMITERS: [char; 3] = [',', '\r', '\n'];

/// A parsed transform rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleExpression {
	/// Explicit `TransformPattern=>SourcePattern` mapping. Either side may
	/// contain a single `*` capture.
	Pair {
		transform_pattern: String,
		source_pattern: String,
	},

	/// Bare token inserted before the source file's extension.
	Suffix { token: String },
}

impl RuleExpression {
	/// Parse a single rule.
	///
	/// Anything containing `=>` is a pair rule; everything else is a suffix
	/// rule. Only structurally unusable input is rejected here.
	pub fn parse(input: &str) -> Result<Self> {
		let trimmed = input.trim();
		if trimmed.is_empty() {
			return Err(malformed(input, "rule is empty"));
		}

		let Some((transform, source)) = trimmed.split_once(PAIR_SEPARATOR) else {
			return Ok(RuleExpression::Suffix {
				token: trimmed.to_string(),
			});
		};

		if source.contains(PAIR_SEPARATOR) {
			return Err(malformed(input, "more than one '=>' separator"));
		}

		let transform_pattern = transform.trim();
		let source_pattern = source.trim();

		if transform_pattern.is_empty() {
			return Err(malformed(input, "transform pattern is empty"));
		}
		if source_pattern.is_empty() {
			return Err(malformed(input, "source pattern is empty"));
		}
		if transform_pattern.matches('*').count() > 1 || source_pattern.matches('*').count() > 1 {
			return Err(malformed(input, "a pattern may contain at most one '*'"));
		}

		Ok(RuleExpression::Pair {
			transform_pattern: transform_pattern.to_string(),
			source_pattern: source_pattern.to_string(),
		})
	}

	/// Whether this is an explicit pair rule.
	pub fn is_pair(&self) -> bool {
		matches!(self, RuleExpression::Pair { .. })
	}
}

impl FromStr for RuleExpression {
	type Err = ConfxformError;

	fn from_str(s: &str) -> Result<Self> {
		RuleExpression::parse(s)
	}
}

impl fmt::Display for RuleExpression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RuleExpression::Pair {
				transform_pattern,
				source_pattern,
			} => write!(f, "{} {} {}", transform_pattern, PAIR_SEPARATOR, source_pattern),
			RuleExpression::Suffix { token } => f.write_str(token),
		}
	}
}

/// Parse a delimiter-joined list of rules (comma or newline separated).
///
/// Blank entries are skipped; the first malformed entry fails the whole list.
pub fn parse_rule_list(text: &str) -> Result<Vec<RuleExpression>> {
	text.split(RULE_LIST_DELIMITERS)
		.filter(|entry| !entry.trim().is_empty())
		.map(RuleExpression::parse)
		.collect()
}

fn malformed(rule: &str, reason: &str) -> ConfxformError {
	ConfxformError::MalformedRule {
		rule: rule.to_string(),
		reason: reason.to_string(),
	}
}
