use std::collections::BTreeMap;

use regex::Regex;
use regex::RegexBuilder;

use crate::LintError;
use crate::LintResult;

/// Scope for patterns that apply to every rule.
pub const GLOBAL_SCOPE: &str = "global";

/// A compiled path pattern, either global or scoped to one rule identifier.
///
/// Patterns are glob-like: `*` matches any run of characters and `\,`
/// stands for a literal comma. Matching ignores case and is not anchored,
/// so `vendor` matches `lib/vendor/a.tpl`.
#[derive(Debug, Clone)]
pub struct IgnorePattern {
	scope: String,
	pattern: String,
	regex: Regex,
}

impl IgnorePattern {
	pub fn new(scope: impl Into<String>, pattern: impl Into<String>) -> LintResult<Self> {
		let pattern = pattern.into();
		let regex = RegexBuilder::new(&glob_to_regex(&pattern))
			.case_insensitive(true)
			.build()
			.map_err(|error| {
				LintError::InvalidIgnorePattern {
					pattern: pattern.clone(),
					reason: error.to_string(),
				}
			})?;

		Ok(Self {
			scope: scope.into(),
			pattern,
			regex,
		})
	}

	pub fn scope(&self) -> &str {
		&self.scope
	}

	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	pub fn is_global(&self) -> bool {
		self.scope == GLOBAL_SCOPE
	}

	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Whether this pattern is allowed to suppress diagnostics with the given
	/// source.
	pub fn applies_to(&self, source: &str) -> bool {
		self.is_global() || scope_covers(&self.scope, source)
	}
}

/// Every configured ignore pattern for a run.
#[derive(Debug, Clone, Default)]
pub struct IgnorePatterns(Vec<IgnorePattern>);

impl IgnorePatterns {
	pub fn compile(patterns: &BTreeMap<String, Vec<String>>) -> LintResult<Self> {
		let mut compiled = Vec::new();

		for (scope, globs) in patterns {
			for glob in globs {
				compiled.push(IgnorePattern::new(scope.as_str(), glob.as_str())?);
			}
		}

		Ok(Self(compiled))
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &IgnorePattern> {
		self.0.iter()
	}

	/// Whether the whole file is excluded regardless of the rule reporting.
	pub fn is_globally_ignored(&self, path: &str) -> bool {
		self.0
			.iter()
			.any(|pattern| pattern.is_global() && pattern.is_match(path))
	}

	/// Whether a diagnostic with `source` reported for `path` is suppressed.
	pub fn suppresses(&self, path: &str, source: &str) -> bool {
		self.0
			.iter()
			.any(|pattern| pattern.applies_to(source) && pattern.is_match(path))
	}
}

/// Whether `scope` names `source` itself or one of its dotted parents, so
/// `Commenting.Fixme` covers `Commenting.Fixme.TaskFound` but not
/// `Commenting.FixmeStrict`.
pub fn scope_covers(scope: &str, source: &str) -> bool {
	match source.strip_prefix(scope) {
		Some(rest) => rest.is_empty() || rest.starts_with('.'),
		None => false,
	}
}

/// Translate a glob-like ignore pattern into a regular expression.
pub fn glob_to_regex(pattern: &str) -> String {
	let mut output = String::with_capacity(pattern.len() * 2);
	let mut characters = pattern.chars().peekable();
	let mut literal = String::new();

	let flush = |literal: &mut String, output: &mut String| {
		if !literal.is_empty() {
			output.push_str(&regex::escape(literal));
			literal.clear();
		}
	};

	while let Some(character) = characters.next() {
		match character {
			'\\' if characters.peek() == Some(&',') => {
				characters.next();
				literal.push(',');
			}
			'*' => {
				flush(&mut literal, &mut output);
				output.push_str(".*");
			}
			_ => literal.push(character),
		}
	}

	flush(&mut literal, &mut output);
	output
}
