use crate::LintResult;
use crate::file::Position;
use crate::file::ProcessedFile;
use crate::rule::Rule;
use crate::tokens::TokenType;

/// More consecutive line breaks than this are reported.
const MAX_CONSECUTIVE_NEW_LINES: usize = 3;

/// Flags trailing whitespace and runs of empty lines.
#[derive(Debug, Default)]
pub struct SuperfluousWhitespaceRule;

impl Rule for SuperfluousWhitespaceRule {
	fn name(&self) -> &str {
		"Rules.Whitespace.SuperfluousWhitespaceRule"
	}

	fn register(&self) -> Vec<TokenType> {
		vec![TokenType::NewLine]
	}

	fn process(&mut self, file: &mut ProcessedFile, position: usize) -> LintResult<()> {
		let tokens = file.tokens()?;

		let trailing = position
			.checked_sub(1)
			.and_then(|previous| tokens.get(previous))
			.is_some_and(|token| matches!(token.r#type, TokenType::Tab | TokenType::Space));

		if trailing {
			file.add_error(
				"Whitespace found at end of line",
				Position::Token(position),
				"EndLine",
				&[],
			);
		}

		let new_lines = 1 + tokens[..position]
			.iter()
			.rev()
			.take_while(|token| token.r#type == TokenType::NewLine)
			.count();

		if new_lines > MAX_CONSECUTIVE_NEW_LINES {
			let at = position
				.checked_sub(new_lines)
				.map_or(Position::None, Position::Token);

			file.add_error(
				"Found {} empty lines in a row.",
				at,
				"EmptyLines",
				&[&new_lines],
			);
		}

		Ok(())
	}
}

/// Flags single-line tags with a space before the right delimiter, e.g.
/// `{$name }`. Multi-line tags are skipped since they usually hold inline
/// CSS or JavaScript.
#[derive(Debug, Default)]
pub struct TagsWhitespaceRule;

impl Rule for TagsWhitespaceRule {
	fn name(&self) -> &str {
		"Rules.Whitespace.TagsWhitespaceRule"
	}

	fn register(&self) -> Vec<TokenType> {
		vec![TokenType::Smarty]
	}

	fn process(&mut self, file: &mut ProcessedFile, position: usize) -> LintResult<()> {
		let tokens = file.tokens()?;
		let Some(token) = tokens.get(position) else {
			return Ok(());
		};

		if token.is_multi_line() {
			return Ok(());
		}

		let right = file.context().delimiters().right();
		let padded = token
			.content
			.strip_suffix(right)
			.is_some_and(|body| body.ends_with(' '));

		if padded {
			file.add_error(
				"Whitespace found before end of one line smarty tag",
				Position::Token(position),
				"Smarty",
				&[],
			);
		}

		Ok(())
	}
}
