use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::sync::Arc;

use serde::Serialize;

use crate::LintError;
use crate::LintResult;
use crate::context::RunContext;
use crate::rule::RuleId;
use crate::tokens::TokenStream;

/// Prefix reserved for diagnostics raised by the linter itself rather than
/// by a rule. Codes with this prefix are recorded verbatim as the source.
pub const INTERNAL_PREFIX: &str = "Internal.";

/// Source recorded when a diagnostic is added while no rule is active.
pub const UNKNOWN_RULE: &str = "unknownRule";

/// Source of the error that replaces a file's diagnostics when checking it
/// was aborted.
pub const ABORTED_SOURCE: &str = "Internal.Exception";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Error,
	Warning,
}

impl Severity {
	pub fn as_str(&self) -> &'static str {
		match self {
			Severity::Error => "ERROR",
			Severity::Warning => "WARNING",
		}
	}
}

impl Display for Severity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Where a diagnostic points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
	/// The file as a whole; resolves to line 1.
	None,
	/// The line recorded on the token at this index.
	Token(usize),
	/// A physical line inside a multi-line token: `base + offset`.
	Line { base: usize, offset: usize },
}

/// One recorded message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
	pub message: String,
	pub source: String,
	pub severity: Severity,
}

/// Diagnostics keyed by line, then column. Entries at the same position keep
/// their insertion order.
pub type DiagnosticMap = BTreeMap<usize, BTreeMap<usize, Vec<Entry>>>;

/// A flattened diagnostic, convenient for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
	pub line: usize,
	pub column: usize,
	pub severity: Severity,
	pub message: String,
	pub source: String,
}

/// A file under inspection together with the diagnostics recorded for it.
///
/// Rules receive a mutable reference to this value and report through
/// [`ProcessedFile::add_error`] and [`ProcessedFile::add_warning`]. The
/// source recorded with each entry is derived from the rule that is active
/// at the time of the call.
#[derive(Debug)]
pub struct ProcessedFile {
	path: String,
	context: Arc<RunContext>,
	eol: &'static str,
	tokens: Option<Arc<TokenStream>>,
	errors: DiagnosticMap,
	warnings: DiagnosticMap,
	error_count: usize,
	warning_count: usize,
	active_rule: Option<RuleId>,
}

impl ProcessedFile {
	pub fn new(path: impl Into<String>, context: Arc<RunContext>) -> Self {
		Self {
			path: path.into(),
			context,
			eol: "\n",
			tokens: None,
			errors: DiagnosticMap::new(),
			warnings: DiagnosticMap::new(),
			error_count: 0,
			warning_count: 0,
			active_rule: None,
		}
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn context(&self) -> &RunContext {
		&self.context
	}

	/// The line ending detected for this file.
	pub fn eol(&self) -> &'static str {
		self.eol
	}

	pub fn set_eol(&mut self, eol: &'static str) {
		self.eol = eol;
	}

	pub fn set_tokens(&mut self, tokens: TokenStream) {
		self.tokens = Some(Arc::new(tokens));
	}

	/// A shared handle to the token stream, so rules can keep reading tokens
	/// while they report.
	pub fn tokens(&self) -> LintResult<Arc<TokenStream>> {
		self.tokens
			.clone()
			.ok_or_else(|| LintError::TokensReleased(self.path.clone()))
	}

	pub fn has_tokens(&self) -> bool {
		self.tokens.is_some()
	}

	/// Release the token stream once no rule needs it anymore.
	pub fn clean_up(&mut self) {
		self.tokens = None;
	}

	pub fn active_rule(&self) -> Option<&RuleId> {
		self.active_rule.as_ref()
	}

	pub fn set_active_rule(&mut self, rule: Option<RuleId>) {
		self.active_rule = rule;
	}

	/// Record an error. Returns `true` when the entry was stored and `false`
	/// when an ignore rule or ignore pattern suppressed it.
	pub fn add_error(
		&mut self,
		message: &str,
		position: Position,
		code: &str,
		args: &[&dyn Display],
	) -> bool {
		self.add_message(Severity::Error, message, position, code, args)
	}

	/// Record a warning. See [`ProcessedFile::add_error`].
	pub fn add_warning(
		&mut self,
		message: &str,
		position: Position,
		code: &str,
		args: &[&dyn Display],
	) -> bool {
		self.add_message(Severity::Warning, message, position, code, args)
	}

	fn add_message(
		&mut self,
		severity: Severity,
		message: &str,
		position: Position,
		code: &str,
		args: &[&dyn Display],
	) -> bool {
		let source = self.source_for(code);

		if self.context.is_suppressed(&self.path, &source) {
			return false;
		}

		let line = self.resolve_line(position);
		let entry = Entry {
			message: format_message(message, args),
			source,
			severity,
		};

		self.insert(line, 1, entry);
		true
	}

	/// The attribution recorded for a diagnostic with `code`.
	pub fn source_for(&self, code: &str) -> String {
		if code.starts_with(INTERNAL_PREFIX) {
			return code.to_string();
		}

		match &self.active_rule {
			Some(rule) => rule.source_for(code),
			None => UNKNOWN_RULE.to_string(),
		}
	}

	fn resolve_line(&self, position: Position) -> usize {
		match position {
			Position::None => 1,
			Position::Token(index) => {
				self.tokens
					.as_ref()
					.and_then(|tokens| tokens.get(index))
					.map_or(1, |token| token.line)
			}
			Position::Line { base, offset } => base + offset,
		}
	}

	fn insert(&mut self, line: usize, column: usize, entry: Entry) {
		let (map, count) = match entry.severity {
			Severity::Error => (&mut self.errors, &mut self.error_count),
			Severity::Warning => (&mut self.warnings, &mut self.warning_count),
		};

		map.entry(line)
			.or_default()
			.entry(column)
			.or_default()
			.push(entry);
		*count += 1;
	}

	/// Drop every recorded diagnostic.
	pub fn clear_diagnostics(&mut self) {
		self.errors.clear();
		self.warnings.clear();
		self.error_count = 0;
		self.warning_count = 0;
	}

	/// Replace all diagnostics with a single error explaining that checking
	/// this file stopped early. Ignore rules and patterns do not apply.
	pub fn record_abort(&mut self, reason: &str) {
		self.clear_diagnostics();
		self.insert(
			1,
			1,
			Entry {
				message: format!(
					"An error occurred during processing; checking has been aborted. The error \
					 message was: {reason}"
				),
				source: ABORTED_SOURCE.to_string(),
				severity: Severity::Error,
			},
		);
	}

	pub fn errors(&self) -> &DiagnosticMap {
		&self.errors
	}

	pub fn warnings(&self) -> &DiagnosticMap {
		&self.warnings
	}

	pub fn error_count(&self) -> usize {
		self.error_count
	}

	pub fn warning_count(&self) -> usize {
		self.warning_count
	}

	/// Number of distinct lines with at least one entry.
	pub fn lines_affected(&self) -> usize {
		self.errors
			.keys()
			.chain(self.warnings.keys())
			.collect::<BTreeSet<_>>()
			.len()
	}

	/// All entries ordered by line and column, errors before warnings at the
	/// same position.
	pub fn diagnostics(&self) -> Vec<Diagnostic> {
		let mut diagnostics = Vec::with_capacity(self.error_count + self.warning_count);

		for map in [&self.errors, &self.warnings] {
			for (line, columns) in map {
				for (column, entries) in columns {
					diagnostics.extend(entries.iter().map(|entry| {
						Diagnostic {
							line: *line,
							column: *column,
							severity: entry.severity,
							message: entry.message.clone(),
							source: entry.source.clone(),
						}
					}));
				}
			}
		}

		diagnostics.sort_by_key(|diagnostic| (diagnostic.line, diagnostic.column, diagnostic.severity));
		diagnostics
	}
}

/// Substitute `args` into `template`. `{}` takes the next argument and
/// `{N}` takes the argument at index `N`. Placeholders without a matching
/// argument are left untouched, as is every template when `args` is empty.
pub fn format_message(template: &str, args: &[&dyn Display]) -> String {
	if args.is_empty() {
		return template.to_string();
	}

	let mut output = String::with_capacity(template.len());
	let mut rest = template;
	let mut next = 0;

	while let Some(open) = rest.find('{') {
		output.push_str(&rest[..open]);
		let after = &rest[open + 1..];

		let Some(close) = after.find('}') else {
			output.push_str(&rest[open..]);
			return output;
		};

		let inner = &after[..close];
		let index = if inner.is_empty() {
			let index = next;
			next += 1;
			Some(index)
		} else {
			inner.parse::<usize>().ok()
		};

		match index.and_then(|index| args.get(index)) {
			Some(arg) => output.push_str(&arg.to_string()),
			None => output.push_str(&rest[open..=open + 1 + close]),
		}

		rest = &after[close + 1..];
	}

	output.push_str(rest);
	output
}
