use logos::Lexer;
use logos::Logos;

use crate::LintError;
use crate::LintResult;
use crate::tokens::Token;
use crate::tokens::TokenStream;
use crate::tokens::TokenType;

/// Marker that opts a whole file out of linting when it appears in a
/// template comment, or anywhere in the first two lines of the file.
pub const SUPPRESSION_MARKER: &str = "@noSmartyLint";

/// Raw tokens produced by logos for the text between template tags.
#[derive(Logos, Debug, PartialEq)]
enum RawToken {
	#[token("\r\n")]
	#[token("\n")]
	#[token("\r")]
	Newline,
	#[token("\t")]
	Tab,
	#[regex(" +")]
	Space,
	#[token("<!--", html_comment)]
	HtmlComment,
	#[token("<")]
	Angle,
	#[regex(r"[^ \t\r\n<]+")]
	Text,
}

/// Extend an opened html comment through its closing `-->`, or through the
/// end of the text when it is never closed. The closing marker may share
/// dashes with the opener, so `<!-->` is a complete comment.
fn html_comment(lex: &mut Lexer<'_, RawToken>) -> bool {
	let span = lex.span();
	let search_from = span.start + 2;
	let source = lex.source();

	let end = memstr(source[search_from..].as_bytes(), b"-->")
		.map_or(source.len(), |position| search_from + position + 3);

	lex.bump(end - span.end);
	true
}

/// The left and right markers that open and close a template tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
	left: String,
	right: String,
}

impl Default for Delimiters {
	fn default() -> Self {
		Self {
			left: "{".into(),
			right: "}".into(),
		}
	}
}

impl Delimiters {
	pub fn new(left: impl Into<String>, right: impl Into<String>) -> LintResult<Self> {
		let left = left.into();
		let right = right.into();

		if left.is_empty() {
			return Err(LintError::InvalidDelimiter { side: "left" });
		}

		if right.is_empty() {
			return Err(LintError::InvalidDelimiter { side: "right" });
		}

		Ok(Self { left, right })
	}

	pub fn left(&self) -> &str {
		&self.left
	}

	pub fn right(&self) -> &str {
		&self.right
	}
}

/// The output of the splitting pass. Tag segments include their delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
	Text(&'a str),
	Tag(&'a str),
}

impl<'a> Segment<'a> {
	pub fn as_str(&self) -> &'a str {
		match self {
			Segment::Text(text) | Segment::Tag(text) => text,
		}
	}
}

/// Turns template source into a [`TokenStream`].
///
/// Scanning never fails. A tag or comment that is never closed leaves the
/// rest of the file as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanner {
	delimiters: Delimiters,
	auto_literal: bool,
}

impl Default for Scanner {
	fn default() -> Self {
		Self::new(Delimiters::default(), true)
	}
}

impl Scanner {
	pub fn new(delimiters: Delimiters, auto_literal: bool) -> Self {
		Self {
			delimiters,
			auto_literal,
		}
	}

	pub fn delimiters(&self) -> &Delimiters {
		&self.delimiters
	}

	pub fn auto_literal(&self) -> bool {
		self.auto_literal
	}

	/// Split the source into alternating text and tag segments.
	pub fn split<'s>(&self, source: &'s str) -> Vec<Segment<'s>> {
		let left = self.delimiters.left();
		let mut segments = Vec::new();
		let mut text_start = 0;
		let mut cursor = 0;

		while let Some(offset) = memstr(source[cursor..].as_bytes(), left.as_bytes()) {
			let open = cursor + offset;
			let body_start = open + left.len();

			if self.is_literal_boundary(source[body_start..].chars().next()) {
				cursor = body_start;
				continue;
			}

			let Some(end) = self.find_tag_end(source, body_start) else {
				break;
			};

			let body = &source[body_start..end - self.delimiters.right().len()];

			if body.trim().is_empty() {
				cursor = end;
				continue;
			}

			if open > text_start {
				segments.push(Segment::Text(&source[text_start..open]));
			}

			segments.push(Segment::Tag(&source[open..end]));
			text_start = end;
			cursor = end;
		}

		if text_start < source.len() {
			segments.push(Segment::Text(&source[text_start..]));
		}

		segments
	}

	pub fn tokenize(&self, source: &str) -> TokenStream {
		let mut builder = StreamBuilder::default();

		for segment in self.split(source) {
			match segment {
				Segment::Text(text) => builder.push_text(text),
				Segment::Tag(tag) => builder.push_tag(tag, self.delimiters.left()),
			}
		}

		builder.tokens.into()
	}

	fn is_literal_boundary(&self, character: Option<char>) -> bool {
		self.auto_literal && character.is_some_and(is_literal_whitespace)
	}

	/// Byte offset just past the right delimiter closing the tag whose body
	/// starts at `body_start`.
	fn find_tag_end(&self, source: &str, body_start: usize) -> Option<usize> {
		let left = self.delimiters.left();
		let right = self.delimiters.right();

		if source[body_start..].starts_with('*') {
			let closing = format!("*{right}");
			return memstr(source[body_start..].as_bytes(), closing.as_bytes())
				.map(|position| body_start + position + closing.len());
		}

		let mut depth = 1_usize;
		let mut literal = 0_usize;
		let mut index = body_start;

		while index < source.len() {
			let rest = &source[index..];

			if rest.starts_with(right) {
				if literal > 0 && self.is_literal_boundary(source[..index].chars().next_back()) {
					literal -= 1;
				} else {
					depth -= 1;

					if depth == 0 {
						return Some(index + right.len());
					}
				}

				index += right.len();
				continue;
			}

			if rest.starts_with(left) {
				index += left.len();

				if self.is_literal_boundary(source[index..].chars().next()) {
					literal += 1;
				} else {
					depth += 1;
				}

				continue;
			}

			index += rest.chars().next().map_or(1, char::len_utf8);
		}

		None
	}
}

/// Collects tokens while tracking the running line number.
struct StreamBuilder {
	tokens: Vec<Token>,
	line: usize,
	seen_comment: bool,
}

impl Default for StreamBuilder {
	fn default() -> Self {
		Self {
			tokens: Vec::new(),
			line: 1,
			seen_comment: false,
		}
	}
}

impl StreamBuilder {
	fn push_text(&mut self, text: &str) {
		for (result, span) in RawToken::lexer(text).spanned() {
			let slice = &text[span];

			match result {
				Ok(RawToken::Newline) => {
					self.tokens.push(Token::new(TokenType::NewLine, slice, self.line));
					self.line += 1;
				}
				Ok(RawToken::Tab) => {
					self.tokens.push(Token::new(TokenType::Tab, slice, self.line));
				}
				Ok(RawToken::Space) => {
					self.tokens.push(Token::new(TokenType::Space, slice, self.line));
				}
				Ok(RawToken::HtmlComment) => self.push_spanning(TokenType::HtmlComment, slice),
				Ok(RawToken::Angle | RawToken::Text) | Err(()) => self.push_html_text(slice),
			}
		}
	}

	fn push_tag(&mut self, tag: &str, left: &str) {
		let body = tag.get(left.len()..).unwrap_or_default();

		let r#type = if body.trim_start().starts_with('*') {
			if self.seen_comment {
				TokenType::SmartyComment
			} else {
				self.seen_comment = true;
				TokenType::SmartyDocComment
			}
		} else {
			TokenType::Smarty
		};

		self.push_spanning(r#type, tag);
	}

	fn push_spanning(&mut self, r#type: TokenType, content: &str) {
		let breaks = count_line_breaks(content);

		if breaks == 0 {
			self.tokens.push(Token::new(r#type, content, self.line));
			return;
		}

		let start = self.line;
		self.line += breaks;
		self.tokens
			.push(Token::multi_line(r#type, content, start, self.line));
	}

	fn push_html_text(&mut self, slice: &str) {
		match self.tokens.last_mut() {
			Some(previous) if previous.r#type == TokenType::HtmlText => {
				previous.content.push_str(slice);
				return;
			}
			_ => {}
		}

		self.tokens
			.push(Token::new(TokenType::HtmlText, slice, self.line));
	}
}

fn is_literal_whitespace(character: char) -> bool {
	matches!(character, ' ' | '\t' | '\r' | '\n')
}

/// Iterate over every line break in `text`, treating `\r\n` as one break.
pub fn line_breaks(text: &str) -> impl Iterator<Item = &'static str> + '_ {
	let bytes = text.as_bytes();
	let mut index = 0;

	std::iter::from_fn(move || {
		while index < bytes.len() {
			let current = bytes[index];
			index += 1;

			match current {
				b'\r' if bytes.get(index) == Some(&b'\n') => {
					index += 1;
					return Some("\r\n");
				}
				b'\r' => return Some("\r"),
				b'\n' => return Some("\n"),
				_ => {}
			}
		}

		None
	})
}

pub fn count_line_breaks(text: &str) -> usize {
	line_breaks(text).count()
}

/// The line ending used by the file: the first line break found, or `\n`
/// when the text has none.
pub fn detect_line_endings(contents: &str) -> &'static str {
	line_breaks(contents).next().unwrap_or("\n")
}

/// Whether any line break in `contents` differs from `eol`.
pub fn has_mixed_line_endings(contents: &str, eol: &str) -> bool {
	line_breaks(contents).any(|line_break| line_break != eol)
}

pub fn has_suppression_marker(text: &str) -> bool {
	text.contains(SUPPRESSION_MARKER)
}

/// Whether the file opts out of linting in one of its first two lines.
pub fn should_skip_file(contents: &str) -> bool {
	let eol = detect_line_endings(contents);

	contents.split(eol).take(2).any(has_suppression_marker)
}

pub fn memstr(haystack: &[u8], needle: &[u8]) -> Option<usize> {
	if needle.is_empty() {
		return Some(0);
	}

	haystack
		.windows(needle.len())
		.position(|window| window == needle)
}
