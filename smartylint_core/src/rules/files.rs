use super::escape_line_ending;
use super::is_first_new_line;
use crate::LintResult;
use crate::file::Position;
use crate::file::ProcessedFile;
use crate::rule::Rule;
use crate::tokens::TokenType;

/// Checks that the file ends with exactly one line break.
#[derive(Debug, Default)]
pub struct EndFileNewlineRule;

impl Rule for EndFileNewlineRule {
	fn name(&self) -> &str {
		"Rules.Files.EndFileNewlineRule"
	}

	fn register(&self) -> Vec<TokenType> {
		vec![TokenType::NewLine]
	}

	fn process(&mut self, file: &mut ProcessedFile, position: usize) -> LintResult<()> {
		let tokens = file.tokens()?;

		if !is_first_new_line(&tokens, position) {
			return Ok(());
		}

		let Some(last) = tokens.len().checked_sub(1) else {
			return Ok(());
		};

		if tokens[last].r#type != TokenType::NewLine {
			file.add_error(
				"Expected 1 newline at end of file; 0 found",
				Position::Token(last),
				"NoneFound",
				&[],
			);
			return Ok(());
		}

		let Some(last_content) = tokens.find_previous(
			&[TokenType::NewLine, TokenType::Space, TokenType::Tab],
			last,
			None,
			true,
			None,
		) else {
			return Ok(());
		};

		let blank_lines = tokens[last].line - tokens[last_content].line;

		if blank_lines > 0 {
			file.add_error(
				"Expected 1 blank line at end of file; {} found",
				Position::Token(last_content),
				"TooMany",
				&[&(blank_lines + 1)],
			);
		}

		Ok(())
	}
}

/// Checks the line ending detected for the file against `rules.eol_char`.
#[derive(Debug, Default)]
pub struct LineEndingsRule;

impl Rule for LineEndingsRule {
	fn name(&self) -> &str {
		"Rules.Files.LineEndingsRule"
	}

	fn register(&self) -> Vec<TokenType> {
		vec![TokenType::NewLine]
	}

	fn process(&mut self, file: &mut ProcessedFile, position: usize) -> LintResult<()> {
		let tokens = file.tokens()?;

		if !is_first_new_line(&tokens, position) {
			return Ok(());
		}

		let found = file.eol();
		let expected = file.context().config().rules.expected_eol().to_string();

		if found == expected {
			return Ok(());
		}

		file.add_error(
			"End of line character is invalid; expected \"{}\" but found \"{}\"",
			Position::Token(position),
			"InvalidEOLChar",
			&[&escape_line_ending(&expected), &escape_line_ending(found)],
		);

		Ok(())
	}
}
