use crate::rules::expression::RuleExpression;
use crate::rules::matcher::{WILDCARD, capture, split_extension, split_file_name, strip_suffix_ignore_case};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Build a transform file name from a transform pattern and a capture.
///
/// A wildcard in the pattern is replaced by the capture. Without one, a
/// non-empty capture is prepended to the pattern's file name as `capture.`.
pub fn substitute(transform_pattern: &str, captured: &str) -> String {
	if transform_pattern.contains(WILDCARD) {
		return transform_pattern.replacen(WILDCARD, captured, 1);
	}
	if captured.is_empty() {
		return transform_pattern.to_string();
	}
	let (dir, name) = split_file_name(transform_pattern);
	format!("{}{}.{}", dir, captured, name)
}

/// Insert a suffix token before a file name's extension.
///
/// If the token already ends with the file's own extension, that trailing
/// extension is dropped first so it is not doubled.
pub fn suffix_file_name(name: &str, token: &str) -> String {
	let (stem, ext) = split_extension(name);
	let insertion = match strip_suffix_ignore_case(token, ext) {
		Some(head) if !ext.is_empty() && !head.is_empty() => head,
		_ => token,
	};
	format!("{}.{}{}", stem, insertion, ext)
}

/// Compute the transform file a rule expects for `source_file`.
///
/// Returns `None` when a pair rule's source pattern does not match, or when
/// the path is not valid UTF-8.
pub fn resolve_transform_path(source_file: &Path, rule: &RuleExpression) -> Option<PathBuf> {
	let source = source_file.to_str()?;
	let (dir, name) = split_file_name(source);

	let file_name = match rule {
		RuleExpression::Pair {
			transform_pattern,
			source_pattern,
		} => {
			let captured = capture(name, source_pattern)?;
			substitute(transform_pattern, &captured)
		}
		RuleExpression::Suffix { token } => suffix_file_name(name, token),
	};

	Some(PathBuf::from(format!("{}{}", dir, file_name)))
}

/// Key under which two paths count as the same file.
///
/// Paths are compared as text without regard to case.
pub fn transform_key(path: &Path) -> String {
	path.to_string_lossy().to_lowercase()
}

/// Resolve every rule for `source_file`, collapsing duplicates.
///
/// Paths that differ only by case count as the same transform; the first one
/// resolved is kept and rule order is otherwise preserved.
pub fn resolve_transform_paths(source_file: &Path, rules: &[RuleExpression]) -> Vec<PathBuf> {
	let mut seen = HashSet::new();
	rules
		.iter()
		.filter_map(|rule| resolve_transform_path(source_file, rule))
		.filter(|path| seen.insert(transform_key(path)))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn resolve(source: &str, rule: &str) -> Option<String> {
		let rule = RuleExpression::parse(rule).unwrap();
		resolve_transform_path(Path::new(source), &rule).map(|p| p.to_string_lossy().into_owned())
	}

	#[test]
	fn test_transform_file_names() {
		let cases = [
			("C:\\Some\\path\\to\\web.config", "Release", "C:\\Some\\path\\to\\web.Release.config"),
			("C:\\Some\\path\\to\\web.config", "Staging.QLD", "C:\\Some\\path\\to\\web.Staging.QLD.config"),
			("C:\\Some\\path\\to\\web.config", "Production.config", "C:\\Some\\path\\to\\web.Production.config"),
			("C:\\Some\\path\\to\\bar.config", "foo.config=>bar.config", "C:\\Some\\path\\to\\foo.config"),
			("C:\\Some\\path\\to\\bar.blah", "foo.baz=>bar.blah", "C:\\Some\\path\\to\\foo.baz"),
			("C:\\Some\\path\\to\\bar.config", "foo.xml=>bar.config", "C:\\Some\\path\\to\\foo.xml"),
			("C:\\Some\\path\\to\\xyz.bar.blah", "*.foo.blah=>*.bar.blah", "C:\\Some\\path\\to\\xyz.foo.blah"),
			("C:\\Some\\path\\to\\xyz.bar.blah", "foo.blah=>*.bar.blah", "C:\\Some\\path\\to\\xyz.foo.blah"),
			("C:\\Some\\path\\to\\xyz.bar.blah", "*.foo.blah=>bar.blah", "C:\\Some\\path\\to\\xyz.foo.blah"),
			(
				"C:\\Some\\path\\to\\crossdomainpolicy.xml",
				"Production.xml",
				"C:\\Some\\path\\to\\crossdomainpolicy.Production.xml",
			),
		];

		for (source, rule, expected) in cases {
			assert_eq!(
				resolve(source, rule).as_deref(),
				Some(expected),
				"source {} with rule {}",
				source,
				rule
			);
		}
	}

	#[test]
	fn test_wildcard_variants_resolve_same_transform() {
		for rule in [
			"*.Foo.config=>*.Bar.config",
			"*.Foo.config=>Bar.config",
			"Foo.config=>*.Bar.config",
		] {
			assert_eq!(
				resolve("/staging/xyz.Bar.config", rule).as_deref(),
				Some("/staging/xyz.Foo.config"),
				"rule {}",
				rule
			);
		}
	}

	#[test]
	fn test_pair_rule_source_mismatch_yields_nothing() {
		assert_eq!(resolve("/app/web.config", "web.Foo.config => app.config"), None);
		assert_eq!(resolve("/app/web.config", "*.Foo.config => *.Bar.config"), None);
	}

	#[test]
	fn test_pair_rule_matches_case_insensitively() {
		assert_eq!(
			resolve("/app/WEB.CONFIG", "web.Foo.config => web.config").as_deref(),
			Some("/app/web.Foo.config")
		);
	}

	#[test]
	fn test_suffix_rule_with_foreign_extension_is_inserted_whole() {
		assert_eq!(
			resolve("/app/web.config", "Production.xml").as_deref(),
			Some("/app/web.Production.xml.config")
		);
	}

	#[test]
	fn test_suffix_rule_equal_to_extension_is_not_stripped() {
		// Stripping would leave nothing to insert
		assert_eq!(
			resolve("/app/web.config", ".config").as_deref(),
			Some("/app/web..config.config")
		);
	}

	#[test]
	fn test_suffix_rule_on_file_without_extension() {
		assert_eq!(
			resolve("/app/Dockerfile", "Release").as_deref(),
			Some("/app/Dockerfile.Release")
		);
	}

	#[test]
	fn test_transform_pattern_with_directory() {
		assert_eq!(
			resolve("/app/web.config", "Transforms/web.Foo.config => web.config").as_deref(),
			Some("/app/Transforms/web.Foo.config")
		);
		assert_eq!(
			resolve("C:\\app\\xyz.Bar.config", "Transforms\\Foo.config => *.Bar.config").as_deref(),
			Some("C:\\app\\Transforms\\xyz.Foo.config")
		);
	}

	#[test]
	fn test_relative_source_path() {
		assert_eq!(resolve("web.config", "Release").as_deref(), Some("web.Release.config"));
	}

	#[test]
	fn test_resolution_is_idempotent() {
		let rule = RuleExpression::parse("*.foo.blah=>*.bar.blah").unwrap();
		let source = Path::new("/pkg/xyz.bar.blah");
		assert_eq!(
			resolve_transform_path(source, &rule),
			resolve_transform_path(source, &rule)
		);
	}

	#[test]
	fn test_substitute() {
		assert_eq!(substitute("*.foo.blah", "xyz"), "xyz.foo.blah");
		assert_eq!(substitute("foo.blah", "xyz"), "xyz.foo.blah");
		assert_eq!(substitute("foo.blah", ""), "foo.blah");
		assert_eq!(substitute("sub/foo.blah", "xyz"), "sub/xyz.foo.blah");
	}

	#[test]
	fn test_suffix_file_name() {
		assert_eq!(suffix_file_name("web.config", "Release"), "web.Release.config");
		assert_eq!(suffix_file_name("web.config", "Production.CONFIG"), "web.Production.config");
	}

	#[test]
	fn test_resolve_transform_paths_collapses_case_duplicates() {
		let rules = vec![
			RuleExpression::parse("Release").unwrap(),
			RuleExpression::parse("release").unwrap(),
			RuleExpression::parse("web.Release.config => web.config").unwrap(),
			RuleExpression::parse("app.Foo.config => app.config").unwrap(),
			RuleExpression::parse("Production").unwrap(),
		];

		let paths = resolve_transform_paths(Path::new("/pkg/web.config"), &rules);
		assert_eq!(
			paths,
			vec![
				PathBuf::from("/pkg/web.Release.config"),
				PathBuf::from("/pkg/web.Production.config"),
			]
		);
	}
}
