//! Built-in rules.
//!
//! Every rule is named `Rules.<Category>.<Name>Rule`, which gives it the
//! identifier `<Category>.<Name>` used for attribution and for
//! `ignore_rules` / `ignore_patterns` scoping.

mod commenting;
mod files;
mod indent;
mod whitespace;

pub use commenting::*;
pub use files::*;
pub use indent::*;
pub use whitespace::*;

use crate::rule::RuleInstance;
use crate::tokens::TokenStream;
use crate::tokens::TokenType;

/// Every built-in rule, ordered by category and name.
pub fn builtin_rules() -> Vec<RuleInstance> {
	vec![
		RuleInstance::file(FileNoCommentRule),
		RuleInstance::file(FixmeRule),
		RuleInstance::file(NoHtmlCommentRule),
		RuleInstance::file(TodoRule),
		RuleInstance::file(EndFileNewlineRule),
		RuleInstance::file(LineEndingsRule),
		RuleInstance::file(DisallowTabIndentRule),
		RuleInstance::file(SuperfluousWhitespaceRule),
		RuleInstance::file(TagsWhitespaceRule),
	]
}

/// Whether the token at `position` is the first line break of the file.
/// Rules that inspect the file as a whole run from there, once.
pub(crate) fn is_first_new_line(tokens: &TokenStream, position: usize) -> bool {
	position == 0
		|| tokens
			.find_previous(&[TokenType::NewLine], position - 1, None, false, None)
			.is_none()
}

/// Show line-break characters as escapes, e.g. `\r\n`.
pub(crate) fn escape_line_ending(eol: &str) -> String {
	eol.replace('\n', "\\n").replace('\r', "\\r")
}
