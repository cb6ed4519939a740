use crate::LintResult;
use crate::config::LintConfig;
use crate::patterns::IgnorePatterns;
use crate::patterns::scope_covers;
use crate::scanner::Delimiters;
use crate::scanner::Scanner;

/// Validated, run-scoped settings shared by the dispatcher and every file
/// processed during a run.
#[derive(Debug, Clone)]
pub struct RunContext {
	config: LintConfig,
	scanner: Scanner,
	ignore_patterns: IgnorePatterns,
}

impl RunContext {
	pub fn new(config: LintConfig) -> LintResult<Self> {
		let scanner = config.scanner()?;
		let ignore_patterns = config.compile_ignore_patterns()?;

		Ok(Self {
			config,
			scanner,
			ignore_patterns,
		})
	}

	pub fn config(&self) -> &LintConfig {
		&self.config
	}

	pub fn scanner(&self) -> &Scanner {
		&self.scanner
	}

	pub fn delimiters(&self) -> &Delimiters {
		self.scanner.delimiters()
	}

	pub fn ignore_patterns(&self) -> &IgnorePatterns {
		&self.ignore_patterns
	}

	/// Whether `source` has been disabled through `ignore_rules`.
	pub fn is_rule_ignored(&self, source: &str) -> bool {
		self.config
			.ignore_rules
			.iter()
			.any(|scope| scope_covers(scope, source))
	}

	/// Whether a diagnostic with `source` must be dropped for `path`.
	pub fn is_suppressed(&self, path: &str, source: &str) -> bool {
		self.is_rule_ignored(source) || self.ignore_patterns.suppresses(path, source)
	}
}

impl Default for RunContext {
	fn default() -> Self {
		Self {
			config: LintConfig::default(),
			scanner: Scanner::default(),
			ignore_patterns: IgnorePatterns::default(),
		}
	}
}
