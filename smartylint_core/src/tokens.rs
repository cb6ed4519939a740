use std::fmt::Display;
use std::str::FromStr;

use derive_more::Deref;
use serde::Deserialize;
use serde::Serialize;

/// The classification of a scanned [`Token`].
///
/// Comment tokens come in three flavours. The very first Smarty comment of
/// a file is promoted to [`TokenType::SmartyDocComment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum TokenType {
	/// `\n`, `\r` or `\r\n`
	NewLine,
	/// `\t`
	Tab,
	/// A run of spaces.
	Space,
	/// Any other run of text outside template tags.
	HtmlText,
	/// `<!-- ... -->`
	HtmlComment,
	/// A template tag, e.g. `{$name}` or `{if $a}`.
	Smarty,
	/// A template comment, e.g. `{* note *}`.
	SmartyComment,
	/// The first template comment in a file.
	SmartyDocComment,
}

impl TokenType {
	pub const ALL: [TokenType; 8] = [
		TokenType::NewLine,
		TokenType::Tab,
		TokenType::Space,
		TokenType::HtmlText,
		TokenType::HtmlComment,
		TokenType::Smarty,
		TokenType::SmartyComment,
		TokenType::SmartyDocComment,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			TokenType::NewLine => "NEW_LINE",
			TokenType::Tab => "TAB",
			TokenType::Space => "SPACE",
			TokenType::HtmlText => "HTML_TEXT",
			TokenType::HtmlComment => "HTML_COMMENT",
			TokenType::Smarty => "SMARTY",
			TokenType::SmartyComment => "SMARTY_COMMENT",
			TokenType::SmartyDocComment => "SMARTY_DOC_COMMENT",
		}
	}

	/// Template comments, the only tokens that may carry the whole-file
	/// suppression marker.
	pub fn is_smarty_comment(&self) -> bool {
		matches!(self, TokenType::SmartyComment | TokenType::SmartyDocComment)
	}
}

impl Display for TokenType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

impl FromStr for TokenType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		TokenType::ALL
			.into_iter()
			.find(|token_type| token_type.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| format!("unknown token type: {s}"))
	}
}

/// The smallest classified unit of a scanned template.
///
/// `content` is the exact slice of the source the token covers. `line` is the
/// line the token ends on; tokens spanning several lines also record the line
/// they started on in `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
	pub r#type: TokenType,
	pub content: String,
	pub line: usize,
	pub start: Option<usize>,
}

impl Token {
	pub fn new(r#type: TokenType, content: impl Into<String>, line: usize) -> Self {
		Self {
			r#type,
			content: content.into(),
			line,
			start: None,
		}
	}

	pub fn multi_line(
		r#type: TokenType,
		content: impl Into<String>,
		start: usize,
		line: usize,
	) -> Self {
		Self {
			r#type,
			content: content.into(),
			line,
			start: Some(start),
		}
	}

	pub fn is_multi_line(&self) -> bool {
		self.start.is_some()
	}

	/// The line a diagnostic spanning the whole token should point at.
	pub fn first_line(&self) -> usize {
		self.start.unwrap_or(self.line)
	}

	/// Split the content into physical lines using the file's EOL string.
	/// Single-line tokens yield their content unchanged.
	pub fn physical_lines<'a>(&'a self, eol: &'a str) -> Vec<&'a str> {
		if self.is_multi_line() {
			self.content.split(eol).collect()
		} else {
			vec![self.content.as_str()]
		}
	}
}

/// The ordered tokens of one file. Concatenating every token's content
/// reproduces the scanned source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, Serialize)]
pub struct TokenStream(
	#[deref]
	Vec<Token>,
);

impl From<Vec<Token>> for TokenStream {
	fn from(tokens: Vec<Token>) -> Self {
		Self(tokens)
	}
}

impl TokenStream {
	/// Rebuild the source text from the token contents.
	pub fn source(&self) -> String {
		self.0.iter().map(|token| token.content.as_str()).collect()
	}

	/// Walk backwards from `start` down to `end` (inclusive, default `0`) and
	/// return the first position whose token type is in `types`, or, when
	/// `exclude` is set, the first one whose type is not. When `value` is
	/// given the token content must also equal it.
	pub fn find_previous(
		&self,
		types: &[TokenType],
		start: usize,
		end: Option<usize>,
		exclude: bool,
		value: Option<&str>,
	) -> Option<usize> {
		if self.0.is_empty() {
			return None;
		}

		let start = start.min(self.0.len() - 1);
		let end = end.unwrap_or(0);

		(end..=start)
			.rev()
			.find(|&position| self.matches_at(position, types, exclude, value))
	}

	/// Walk forwards from `start` up to `end` (exclusive, default the stream
	/// length). See [`TokenStream::find_previous`] for the matching rules.
	pub fn find_next(
		&self,
		types: &[TokenType],
		start: usize,
		end: Option<usize>,
		exclude: bool,
		value: Option<&str>,
	) -> Option<usize> {
		let end = end.unwrap_or(self.0.len()).min(self.0.len());

		(start..end).find(|&position| self.matches_at(position, types, exclude, value))
	}

	/// Whether any token of the given type exists in the stream.
	pub fn contains_type(&self, r#type: TokenType) -> bool {
		self.0.iter().any(|token| token.r#type == r#type)
	}

	fn matches_at(
		&self,
		position: usize,
		types: &[TokenType],
		exclude: bool,
		value: Option<&str>,
	) -> bool {
		let Some(token) = self.0.get(position) else {
			return false;
		};

		let type_matches = types.contains(&token.r#type) != exclude;
		type_matches && value.is_none_or(|value| token.content == value)
	}
}
