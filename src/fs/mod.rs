//! Local file system collaborators for the convention.
//!
//! This module handles:
//! - Recursive discovery of files whose names match glob patterns
//! - File existence checks for candidate transform paths

use crate::convention::{FileEnumerator, FileExistenceChecker};
use crate::error::{ConfxformError, Result};
use crate::rules::matcher::eq_ignore_case;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

/// Enumerates and checks files on the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileEnumerator for LocalFileSystem {
	/// Walk `directory` (following links) and return the files whose names
	/// match any pattern, ignoring case. Results are sorted and rooted at
	/// `directory`.
	fn enumerate_files_recursively(&self, directory: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
		let lowered: Vec<String> = patterns.iter().map(|p| p.to_lowercase()).collect();
		let globs = lowered
			.iter()
			.map(|pattern| {
				Glob::new(pattern).map_err(|e| ConfxformError::InvalidGlob {
					pattern: pattern.clone(),
					reason: e.to_string(),
				})
			})
			.collect::<Result<Vec<_>>>()?;

		let mut files = Vec::new();
		for entry in WalkDir::new(directory).follow_links(true) {
			let entry = entry.map_err(|source| ConfxformError::EnumerationFailed {
				directory: directory.to_path_buf(),
				source,
			})?;
			if !entry.file_type().is_file() {
				continue;
			}

			let name = entry.file_name().to_string_lossy().to_lowercase();
			let candidate = CandidatePath::from(name.as_str());
			if globs.iter().any(|glob| glob.matched(&candidate).is_some()) {
				files.push(entry.into_path());
			}
		}

		files.sort();
		Ok(files)
	}
}

impl FileExistenceChecker for LocalFileSystem {
	/// An exact hit is returned as is. Otherwise the parent directory is
	/// scanned for a file whose name differs only by case; if several do,
	/// the lowest sorted name wins.
	fn locate_file(&self, path: &Path) -> Option<PathBuf> {
		if path.is_file() {
			return Some(path.to_path_buf());
		}

		let name = path.file_name()?.to_str()?;
		let parent = path.parent().unwrap_or(Path::new(""));
		let listing = if parent.as_os_str().is_empty() {
			Path::new(".")
		} else {
			parent
		};

		fs::read_dir(listing)
			.ok()?
			.filter_map(|entry| entry.ok())
			.filter(|entry| {
				entry
					.file_name()
					.to_str()
					.is_some_and(|entry_name| eq_ignore_case(entry_name, name))
			})
			.map(|entry| parent.join(entry.file_name()))
			.filter(|candidate| candidate.is_file())
			.min()
	}
}
