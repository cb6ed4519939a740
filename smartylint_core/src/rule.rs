use std::fmt::Display;

use serde::Serialize;

use crate::LintError;
use crate::LintResult;
use crate::file::ProcessedFile;
use crate::tokens::TokenType;

const RULE_SUFFIX: &str = "Rule";

/// Identifier of a rule in the form `Category.Name`.
///
/// Derived from the rule's qualified name: `Rules.Commenting.FixmeRule`
/// becomes `Commenting.Fixme`. Segments may be separated by `.`, `_`, `\` or
/// `::`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
	pub fn from_qualified_name(name: &str) -> LintResult<Self> {
		let segments: Vec<&str> = name
			.split(['.', '_', '\\', ':'])
			.filter(|segment| !segment.is_empty())
			.collect();

		let &[_, category, rule, ..] = segments.as_slice() else {
			return Err(LintError::InvalidRuleName(name.to_string()));
		};

		let rule = rule.strip_suffix(RULE_SUFFIX).unwrap_or(rule);

		if rule.is_empty() {
			return Err(LintError::InvalidRuleName(name.to_string()));
		}

		Ok(Self(format!("{category}.{rule}")))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// The diagnostic source for `code` reported by this rule.
	pub fn source_for(&self, code: &str) -> String {
		if code.is_empty() {
			self.0.clone()
		} else {
			format!("{}.{code}", self.0)
		}
	}
}

impl Display for RuleId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A rule that inspects one file at a time.
///
/// The dispatcher calls [`Rule::process`] for every token whose type is
/// returned by [`Rule::register`]. A rule instance lives for the whole run
/// and may keep state between files.
pub trait Rule {
	/// Qualified name, e.g. `Rules.Whitespace.TagsWhitespaceRule`.
	fn name(&self) -> &str;

	/// The token types this rule listens for. Must not be empty.
	fn register(&self) -> Vec<TokenType>;

	/// Inspect the token at `position` of `file`.
	fn process(&mut self, file: &mut ProcessedFile, position: usize) -> LintResult<()>;
}

/// A rule that runs once per run over every checked file.
pub trait MultiFileRule {
	fn name(&self) -> &str;

	fn process(&mut self, files: &mut [ProcessedFile]) -> LintResult<()>;
}

pub enum RuleInstance {
	File(Box<dyn Rule>),
	MultiFile(Box<dyn MultiFileRule>),
}

impl RuleInstance {
	pub fn file(rule: impl Rule + 'static) -> Self {
		Self::File(Box::new(rule))
	}

	pub fn multi_file(rule: impl MultiFileRule + 'static) -> Self {
		Self::MultiFile(Box::new(rule))
	}

	pub fn name(&self) -> &str {
		match self {
			Self::File(rule) => rule.name(),
			Self::MultiFile(rule) => rule.name(),
		}
	}
}

impl std::fmt::Debug for RuleInstance {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::File(rule) => f.debug_tuple("File").field(&rule.name()).finish(),
			Self::MultiFile(rule) => f.debug_tuple("MultiFile").field(&rule.name()).finish(),
		}
	}
}
