//! Case-insensitive file name matching against source patterns.
//!
//! Paths are handled as text so that both `\` and `/` separate directories
//! regardless of the host platform.

/// The wildcard placeholder in a pattern.
pub const WILDCARD: char = '*';

const SEPARATORS: [char; 2] = ['\\', '/'];

/// Match a file name against a source pattern and return the capture.
///
/// Without a wildcard the pattern must be a (case-insensitive) suffix of the
/// name; whatever precedes it is the capture, minus the `.` joining the two.
/// With a wildcard the name must start with the text before `*` and end with
/// the text after it, and the middle is captured verbatim.
pub fn capture(name: &str, source_pattern: &str) -> Option<String> {
	match source_pattern.split_once(WILDCARD) {
		Some((prefix, suffix)) => {
			let rest = strip_prefix_ignore_case(name, prefix)?;
			let middle = strip_suffix_ignore_case(rest, suffix)?;
			Some(middle.to_string())
		}
		None => {
			let leading = strip_suffix_ignore_case(name, source_pattern)?;
			Some(leading.strip_suffix('.').unwrap_or(leading).to_string())
		}
	}
}

/// Split a path into its directory part (separator included) and file name.
pub fn split_file_name(path: &str) -> (&str, &str) {
	match path.rfind(SEPARATORS) {
		Some(idx) => path.split_at(idx + 1),
		None => ("", path),
	}
}

/// Split a file name into stem and extension (leading dot included).
///
/// A name whose only dot is its first character has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
	match name.rfind('.') {
		Some(idx) if idx > 0 => name.split_at(idx),
		_ => (name, ""),
	}
}

/// Compare two strings ignoring case.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
	a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// Remove `suffix` from the end of `value`, ignoring case.
pub fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
	let split = value.len().checked_sub(suffix.len())?;
	if !value.is_char_boundary(split) {
		return None;
	}
	let (head, tail) = value.split_at(split);
	eq_ignore_case(tail, suffix).then_some(head)
}

/// Remove `prefix` from the start of `value`, ignoring case.
pub fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
	if value.len() < prefix.len() || !value.is_char_boundary(prefix.len()) {
		return None;
	}
	let (head, tail) = value.split_at(prefix.len());
	eq_ignore_case(head, prefix).then_some(tail)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_capture_exact_match_is_empty() {
		assert_eq!(capture("bar.config", "bar.config"), Some(String::new()));
		assert_eq!(capture("BAR.Config", "bar.config"), Some(String::new()));
	}

	#[test]
	fn test_capture_suffix_match_drops_joining_dot() {
		assert_eq!(capture("xyz.bar.blah", "bar.blah"), Some("xyz".to_string()));
		assert_eq!(
			capture("xyz.Bar.config", "bar.CONFIG"),
			Some("xyz".to_string())
		);
	}

	#[test]
	fn test_capture_no_match() {
		assert_eq!(capture("web.config", "app.config"), None);
		assert_eq!(capture("config", "web.config"), None);
	}

	#[test]
	fn test_capture_wildcard_prefix() {
		assert_eq!(capture("xyz.bar.blah", "*.bar.blah"), Some("xyz".to_string()));
		assert_eq!(capture("xyz.Bar.config", "*.bar.config"), Some("xyz".to_string()));
	}

	#[test]
	fn test_capture_wildcard_in_middle() {
		assert_eq!(capture("web.Staging.config", "web.*.config"), Some("Staging".to_string()));
		assert_eq!(capture("app.Staging.config", "web.*.config"), None);
	}

	#[test]
	fn test_capture_wildcard_does_not_overlap() {
		// "a.config" cannot satisfy both "a.config" prefix and ".config" suffix
		assert_eq!(capture("a.config", "a.config*.config"), None);
	}

	#[test]
	fn test_capture_wildcard_can_be_empty() {
		assert_eq!(capture("web.config", "web*.config"), Some(String::new()));
	}

	#[test]
	fn test_split_file_name_mixed_separators() {
		assert_eq!(
			split_file_name("C:\\Some\\path\\to\\web.config"),
			("C:\\Some\\path\\to\\", "web.config")
		);
		assert_eq!(split_file_name("/srv/app/web.config"), ("/srv/app/", "web.config"));
		assert_eq!(split_file_name("C:\\pkg/sub\\web.config"), ("C:\\pkg/sub\\", "web.config"));
		assert_eq!(split_file_name("web.config"), ("", "web.config"));
	}

	#[test]
	fn test_split_extension() {
		assert_eq!(split_extension("web.config"), ("web", ".config"));
		assert_eq!(split_extension("web.Release.config"), ("web.Release", ".config"));
		assert_eq!(split_extension("Dockerfile"), ("Dockerfile", ""));
		assert_eq!(split_extension(".config"), (".config", ""));
	}

	#[test]
	fn test_strip_ignore_case_helpers() {
		assert_eq!(strip_suffix_ignore_case("Production.CONFIG", ".config"), Some("Production"));
		assert_eq!(strip_suffix_ignore_case(".config", "web.config"), None);
		assert_eq!(strip_prefix_ignore_case("WEB.config", "web."), Some("config"));
		assert_eq!(strip_prefix_ignore_case("we", "web."), None);
	}

	#[test]
	fn test_strip_respects_char_boundaries() {
		assert_eq!(strip_suffix_ignore_case("é", "x"), None);
		assert_eq!(strip_prefix_ignore_case("é", "x"), None);
	}
}
