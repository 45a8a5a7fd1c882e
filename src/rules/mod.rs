//! Transform rule parsing and resolution for confxform.
//!
//! This module handles:
//! - Parsing pair (`transform => source`) and suffix rules
//! - Matching file names against source patterns with a single wildcard capture
//! - Rewriting a source file path into the transform file path a rule expects

pub mod expression;
pub mod matcher;
pub mod rewriter;

pub use expression::{RuleExpression, parse_rule_list};
pub use matcher::capture;
pub use rewriter::{
	resolve_transform_path, resolve_transform_paths, substitute, suffix_file_name, transform_key,
};
