use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::LintResult;
use crate::config::LintConfig;
use crate::context::RunContext;
use crate::dispatcher::Dispatcher;
use crate::dispatcher::RuleFailure;
use crate::dispatcher::panic_message;
use crate::file::Diagnostic;
use crate::file::Position;
use crate::file::ProcessedFile;
use crate::registry::RuleRegistry;
use crate::rule::RuleInstance;
use crate::rules::builtin_rules;
use crate::scanner::detect_line_endings;
use crate::scanner::has_mixed_line_endings;
use crate::scanner::should_skip_file;

/// A file handed to the linter. `contents` is `None` when the file could not
/// be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
	pub path: String,
	pub contents: Option<String>,
}

impl SourceFile {
	pub fn new(path: impl Into<String>, contents: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			contents: Some(contents.into()),
		}
	}

	pub fn unreadable(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			contents: None,
		}
	}

	/// Read the file from disk. Bytes that are not valid UTF-8 are replaced
	/// with U+FFFD so templates in legacy encodings are still checked. Read
	/// failures are logged and surface later as an internal diagnostic on the
	/// file.
	pub fn read(path: &Path) -> Self {
		let shown_path = path.display().to_string();

		match std::fs::read(path) {
			Ok(bytes) => {
				let contents = match String::from_utf8(bytes) {
					Ok(contents) => contents,
					Err(error) => {
						tracing::debug!(path = %shown_path, "decoding file lossily");
						String::from_utf8_lossy(error.as_bytes()).into_owned()
					}
				};

				Self::new(shown_path, contents)
			}
			Err(error) => {
				tracing::warn!(path = %shown_path, %error, "failed to read file");
				Self::unreadable(shown_path)
			}
		}
	}
}

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
	/// The file opted out of linting in its first two lines, or matches a
	/// global ignore pattern.
	Skipped,
	Checked { errors: usize, warnings: usize },
}

/// Diagnostics for one checked file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
	pub path: String,
	pub errors: usize,
	pub warnings: usize,
	pub lines: usize,
	pub diagnostics: Vec<Diagnostic>,
}

impl From<&ProcessedFile> for FileReport {
	fn from(file: &ProcessedFile) -> Self {
		Self {
			path: file.path().to_string(),
			errors: file.error_count(),
			warnings: file.warning_count(),
			lines: file.lines_affected(),
			diagnostics: file.diagnostics(),
		}
	}
}

/// The result of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
	pub files: Vec<FileReport>,
	pub failures: Vec<RuleFailure>,
}

impl Report {
	pub fn total_errors(&self) -> usize {
		self.files.iter().map(|file| file.errors).sum()
	}

	pub fn total_warnings(&self) -> usize {
		self.files.iter().map(|file| file.warnings).sum()
	}

	pub fn has_errors(&self) -> bool {
		self.total_errors() > 0
	}

	/// Files with at least one diagnostic.
	pub fn files_with_problems(&self) -> impl Iterator<Item = &FileReport> {
		self.files
			.iter()
			.filter(|file| file.errors + file.warnings > 0)
	}
}

/// Runs the registered rules over a set of files.
///
/// Files are processed in the order they are given. Multi-file rules run
/// once, after every file has been dispatched, and only when more than one
/// file was given to [`Linter::run`].
#[derive(Debug)]
pub struct Linter {
	context: Arc<RunContext>,
	dispatcher: Dispatcher,
	files: Vec<ProcessedFile>,
	failures: Vec<RuleFailure>,
}

impl Linter {
	/// Validate the configuration and register `rules`. Every configuration
	/// error surfaces here, before any file is read.
	pub fn new(config: LintConfig, rules: Vec<RuleInstance>) -> LintResult<Self> {
		let context = Arc::new(RunContext::new(config)?);
		let registry = RuleRegistry::new(rules, &context)?;

		Ok(Self {
			context,
			dispatcher: Dispatcher::new(registry),
			files: Vec::new(),
			failures: Vec::new(),
		})
	}

	pub fn with_builtin_rules(config: LintConfig) -> LintResult<Self> {
		Self::new(config, builtin_rules())
	}

	pub fn context(&self) -> &RunContext {
		&self.context
	}

	pub fn registry(&self) -> &RuleRegistry {
		self.dispatcher.registry()
	}

	/// Files checked so far.
	pub fn files(&self) -> &[ProcessedFile] {
		&self.files
	}

	/// Scan one file and dispatch its tokens. A rule failure replaces the
	/// file's diagnostics with a single error instead of ending the run.
	pub fn process_file(&mut self, source: SourceFile) -> FileOutcome {
		let SourceFile { path, contents } = source;

		if self.context.ignore_patterns().is_globally_ignored(&path) {
			tracing::debug!(path = %path, "skipping globally ignored file");
			return FileOutcome::Skipped;
		}

		let mut file = ProcessedFile::new(path, Arc::clone(&self.context));

		match contents {
			None => {
				file.add_error(
					"Error opening file; could not auto-detect line endings",
					Position::None,
					"Internal.DetectLineEndings",
					&[],
				);
			}
			Some(contents) => {
				if should_skip_file(&contents) {
					tracing::debug!(path = file.path(), "skipping file with suppression marker");
					return FileOutcome::Skipped;
				}

				self.check_contents(&mut file, &contents);
			}
		}

		let outcome = FileOutcome::Checked {
			errors: file.error_count(),
			warnings: file.warning_count(),
		};

		self.files.push(file);
		outcome
	}

	fn check_contents(&mut self, file: &mut ProcessedFile, contents: &str) {
		let eol = detect_line_endings(contents);
		file.set_eol(eol);
		file.set_tokens(self.context.scanner().tokenize(contents));

		if has_mixed_line_endings(contents, eol) {
			file.add_error(
				"File has mixed line endings; this may cause incorrect results",
				Position::Token(0),
				"Internal.LineEndings.Mixed",
				&[],
			);
		}

		let dispatcher = &mut self.dispatcher;
		let outcome = catch_unwind(AssertUnwindSafe(|| dispatcher.dispatch(file)));

		let failure = match outcome {
			Ok(Ok(())) => None,
			Ok(Err(error)) => Some(error.to_string()),
			Err(payload) => Some(panic_message(payload.as_ref())),
		};

		if let Some(message) = failure {
			tracing::warn!(path = file.path(), %message, "checking aborted");
			file.set_active_rule(None);
			file.record_abort(&message);
		}

		if !self.dispatcher.registry().has_multi_file_rules() {
			file.clean_up();
		}
	}

	/// Run the multi-file rules over every file checked so far, then release
	/// the token streams.
	pub fn process_multi_file_rules(&mut self) {
		if self.dispatcher.registry().has_multi_file_rules() {
			let failures = self.dispatcher.dispatch_multi(&mut self.files);
			self.failures.extend(failures);
		}

		for file in &mut self.files {
			file.clean_up();
		}
	}

	/// Take the accumulated results, leaving the linter ready for another
	/// run with the same rules.
	pub fn report(&mut self) -> Report {
		let files = std::mem::take(&mut self.files);

		Report {
			files: files.iter().map(FileReport::from).collect(),
			failures: std::mem::take(&mut self.failures),
		}
	}

	pub fn run(&mut self, sources: impl IntoIterator<Item = SourceFile>) -> Report {
		let mut total = 0;

		for source in sources {
			total += 1;
			self.process_file(source);
		}

		if total > 1 {
			self.process_multi_file_rules();
		}

		self.report()
	}
}
