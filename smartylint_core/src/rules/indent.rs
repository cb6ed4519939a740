use crate::LintResult;
use crate::file::Position;
use crate::file::ProcessedFile;
use crate::rule::Rule;
use crate::tokens::TokenType;

#[derive(Debug, Default)]
pub struct DisallowTabIndentRule;

impl Rule for DisallowTabIndentRule {
	fn name(&self) -> &str {
		"Rules.Indent.DisallowTabIndentRule"
	}

	fn register(&self) -> Vec<TokenType> {
		vec![TokenType::Tab]
	}

	fn process(&mut self, file: &mut ProcessedFile, position: usize) -> LintResult<()> {
		let tokens = file.tokens()?;

		if tokens
			.get(position)
			.is_some_and(|token| token.content.contains('\t'))
		{
			file.add_error(
				"Spaces must be used to indent lines; tabs are not allowed",
				Position::Token(position),
				"TabsUsed",
				&[],
			);
		}

		Ok(())
	}
}
