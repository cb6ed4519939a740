use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::WalkBuilder;
use smartylint_core::LintError;
use smartylint_core::LintResult;

/// Build a matcher accepting file names that end in one of `extensions`.
///
/// Extensions may have several parts (`html.tpl`) and may be given with or
/// without a leading dot.
pub fn build_extension_set(extensions: &[String]) -> LintResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();

	for extension in extensions {
		let extension = extension.trim().trim_start_matches('.');
		if extension.is_empty() {
			continue;
		}

		let glob = Glob::new(&format!("*.{extension}")).map_err(|e| {
			LintError::ConfigParse(format!("invalid extension `{extension}`: {e}"))
		})?;
		builder.add(glob);
	}

	builder
		.build()
		.map_err(|e| LintError::ConfigParse(format!("invalid extension list: {e}")))
}

/// Whether `path` carries one of the allowed extensions.
pub fn has_allowed_extension(path: &Path, extensions: &GlobSet) -> bool {
	path.file_name()
		.is_some_and(|name| extensions.is_match(Path::new(name)))
}

/// Collect the files to lint from `paths`.
///
/// Directories are walked with `.gitignore` rules applied and hidden entries
/// skipped. Explicit file arguments are kept regardless of extension. The
/// result is sorted and free of duplicates.
pub fn discover_files(paths: &[PathBuf], extensions: &GlobSet) -> LintResult<Vec<PathBuf>> {
	let mut files = Vec::new();

	for path in paths {
		if path.is_file() {
			files.push(path.clone());
			continue;
		}

		if !path.is_dir() {
			return Err(LintError::Io(std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("path not found: {}", path.display()),
			)));
		}

		let walker = WalkBuilder::new(path)
			.hidden(true)
			.git_ignore(true)
			.require_git(false)
			.build();

		for entry in walker {
			let entry = match entry {
				Ok(entry) => entry,
				Err(e) => {
					tracing::warn!(error = %e, "skipping unreadable entry");
					continue;
				}
			};

			let is_file = entry.file_type().is_some_and(|kind| kind.is_file());
			if is_file && has_allowed_extension(entry.path(), extensions) {
				files.push(entry.into_path());
			}
		}
	}

	files.sort();
	files.dedup();
	tracing::debug!(count = files.len(), "discovered template files");

	Ok(files)
}
