//! Narrow interfaces to the file system and the transform engine.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Recursive file discovery by glob pattern.
#[cfg_attr(test, mockall::automock)]
pub trait FileEnumerator {
	/// List every file under `directory` whose name matches any of `patterns`.
	fn enumerate_files_recursively(&self, directory: &Path, patterns: &[String]) -> Result<Vec<PathBuf>>;
}

/// File existence queries.
///
/// File names are compared without regard to case, so a lookup may find a
/// file whose name on disk is cased differently from the requested path.
#[cfg_attr(test, mockall::automock)]
pub trait FileExistenceChecker {
	/// The path of the file as it exists on disk, if any.
	fn locate_file(&self, path: &Path) -> Option<PathBuf>;

	fn file_exists(&self, path: &Path) -> bool {
		self.locate_file(path).is_some()
	}
}

/// Applies a transform file to a source file, writing the result to
/// `destination_file`.
#[cfg_attr(test, mockall::automock)]
pub trait TransformApplier {
	fn perform_transform(
		&self,
		source_file: &Path,
		transform_file: &Path,
		destination_file: &Path,
	) -> Result<()>;
}
