use std::sync::LazyLock;

use regex::Regex;

use super::is_first_new_line;
use crate::LintResult;
use crate::file::Position;
use crate::file::ProcessedFile;
use crate::file::Severity;
use crate::rule::Rule;
use crate::tokens::TokenType;

static FIXME_PATTERN: LazyLock<Regex> = LazyLock::new(|| task_pattern("fixme"));
static TODO_PATTERN: LazyLock<Regex> = LazyLock::new(|| task_pattern("todo"));

fn task_pattern(keyword: &str) -> Regex {
	Regex::new(&format!(r"(?i)[^a-z]+{keyword}[^a-z]+(.*)")).expect("task pattern is valid")
}

/// Report every physical line of a comment that mentions a task keyword.
fn report_tasks(
	file: &mut ProcessedFile,
	position: usize,
	pattern: &Regex,
	label: &str,
	severity: Severity,
) -> LintResult<()> {
	let tokens = file.tokens()?;
	let Some(token) = tokens.get(position) else {
		return Ok(());
	};

	let right = file.context().delimiters().right().to_string();
	let base = token.first_line();

	for (offset, line) in token.physical_lines(file.eol()).into_iter().enumerate() {
		let Some(captures) = pattern.captures(line) else {
			continue;
		};

		let task = captures
			.get(1)
			.map_or("", |task| task.as_str())
			.trim_matches(|character: char| {
				character.is_whitespace() || "[]().*".contains(character) || right.contains(character)
			});

		let (message, code) = if task.is_empty() {
			(format!("Comment refers to a {label} task"), "CommentFound")
		} else {
			(format!("Comment refers to a {label} task \"{{}}\""), "TaskFound")
		};

		let at = Position::Line { base, offset };

		match severity {
			Severity::Error => file.add_error(&message, at, code, &[&task]),
			Severity::Warning => file.add_warning(&message, at, code, &[&task]),
		};
	}

	Ok(())
}

/// Flags comments mentioning FIXME.
#[derive(Debug, Default)]
pub struct FixmeRule;

impl Rule for FixmeRule {
	fn name(&self) -> &str {
		"Rules.Commenting.FixmeRule"
	}

	fn register(&self) -> Vec<TokenType> {
		vec![
			TokenType::SmartyComment,
			TokenType::SmartyDocComment,
			TokenType::HtmlComment,
		]
	}

	fn process(&mut self, file: &mut ProcessedFile, position: usize) -> LintResult<()> {
		report_tasks(file, position, &FIXME_PATTERN, "FIXME", Severity::Error)
	}
}

/// Warns about comments mentioning TODO.
#[derive(Debug, Default)]
pub struct TodoRule;

impl Rule for TodoRule {
	fn name(&self) -> &str {
		"Rules.Commenting.TodoRule"
	}

	fn register(&self) -> Vec<TokenType> {
		vec![TokenType::SmartyComment, TokenType::SmartyDocComment]
	}

	fn process(&mut self, file: &mut ProcessedFile, position: usize) -> LintResult<()> {
		report_tasks(file, position, &TODO_PATTERN, "TODO", Severity::Warning)
	}
}

#[derive(Debug, Default)]
pub struct NoHtmlCommentRule;

impl Rule for NoHtmlCommentRule {
	fn name(&self) -> &str {
		"Rules.Commenting.NoHTMLCommentRule"
	}

	fn register(&self) -> Vec<TokenType> {
		vec![TokenType::HtmlComment]
	}

	fn process(&mut self, file: &mut ProcessedFile, position: usize) -> LintResult<()> {
		let tokens = file.tokens()?;
		let Some(token) = tokens.get(position) else {
			return Ok(());
		};

		let delimiters = file.context().delimiters();
		let message = format!(
			"Don't use HTML Comments. Use smarty comments {}* *{}",
			delimiters.left(),
			delimiters.right()
		);

		file.add_warning(
			&message,
			Position::Line {
				base: token.first_line(),
				offset: 0,
			},
			"HTMLCommentFound",
			&[],
		);

		Ok(())
	}
}

/// Requires a file doc comment, i.e. at least one template comment.
#[derive(Debug, Default)]
pub struct FileNoCommentRule;

impl Rule for FileNoCommentRule {
	fn name(&self) -> &str {
		"Rules.Commenting.FileNoCommentRule"
	}

	fn register(&self) -> Vec<TokenType> {
		vec![TokenType::NewLine]
	}

	fn process(&mut self, file: &mut ProcessedFile, position: usize) -> LintResult<()> {
		let tokens = file.tokens()?;

		if !is_first_new_line(&tokens, position) {
			return Ok(());
		}

		if !tokens.contains_type(TokenType::SmartyDocComment) {
			file.add_error(
				"Missing file doc comment",
				Position::Token(position),
				"Missing",
				&[],
			);
		}

		Ok(())
	}
}
