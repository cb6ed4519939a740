use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::LintConfig;
use crate::LintError;
use crate::LintResult;
use crate::MultiFileRule;
use crate::ProcessedFile;
use crate::Rule;
use crate::RunContext;
use crate::Scanner;
use crate::TokenStream;
use crate::TokenType;

pub type Log = Rc<RefCell<Vec<String>>>;
pub type Counts = Rc<RefCell<HashMap<TokenType, usize>>>;

pub fn context_with(config: LintConfig) -> Arc<RunContext> {
	Arc::new(RunContext::new(config).unwrap())
}

pub fn default_context() -> Arc<RunContext> {
	context_with(LintConfig::default())
}

pub fn tokenize(source: &str) -> TokenStream {
	Scanner::default().tokenize(source)
}

pub fn types(stream: &TokenStream) -> Vec<TokenType> {
	stream.iter().map(|token| token.r#type).collect()
}

/// A file with tokens for `source`, scanned with the default settings.
pub fn processed_file(path: &str, source: &str, context: Arc<RunContext>) -> ProcessedFile {
	let mut file = ProcessedFile::new(path, context);
	file.set_tokens(tokenize(source));
	file
}

/// Counts the token types it is invoked for.
pub struct CountingRule {
	pub listens_for: Vec<TokenType>,
	pub counts: Counts,
}

impl CountingRule {
	pub fn new(listens_for: Vec<TokenType>) -> (Self, Counts) {
		let counts = Counts::default();
		let rule = Self {
			listens_for,
			counts: Rc::clone(&counts),
		};

		(rule, counts)
	}
}

impl Rule for CountingRule {
	fn name(&self) -> &str {
		"Rules.Test.CountingRule"
	}

	fn register(&self) -> Vec<TokenType> {
		self.listens_for.clone()
	}

	fn process(&mut self, file: &mut ProcessedFile, position: usize) -> LintResult<()> {
		let tokens = file.tokens()?;
		*self
			.counts
			.borrow_mut()
			.entry(tokens[position].r#type)
			.or_default() += 1;

		Ok(())
	}
}

/// Records every file it sees in a shared log.
pub struct SequenceRule {
	pub log: Log,
}

impl Rule for SequenceRule {
	fn name(&self) -> &str {
		"Rules.Test.SequenceRule"
	}

	fn register(&self) -> Vec<TokenType> {
		vec![TokenType::HtmlText]
	}

	fn process(&mut self, file: &mut ProcessedFile, _position: usize) -> LintResult<()> {
		self.log.borrow_mut().push(format!("file:{}", file.path()));
		Ok(())
	}
}

pub struct SequenceMultiFileRule {
	pub log: Log,
}

impl MultiFileRule for SequenceMultiFileRule {
	fn name(&self) -> &str {
		"Rules.Test.SequenceMultiFileRule"
	}

	fn process(&mut self, files: &mut [ProcessedFile]) -> LintResult<()> {
		let retained = files.iter().all(ProcessedFile::has_tokens);
		self.log
			.borrow_mut()
			.push(format!("multi:{}:tokens={retained}", files.len()));

		for file in files.iter_mut() {
			file.add_warning("Seen by the whole run", crate::Position::None, "Seen", &[]);
		}

		Ok(())
	}
}

pub struct FailingMultiFileRule;

impl MultiFileRule for FailingMultiFileRule {
	fn name(&self) -> &str {
		"Rules.Test.FailingMultiFileRule"
	}

	fn process(&mut self, _files: &mut [ProcessedFile]) -> LintResult<()> {
		Err(LintError::RuleFailure {
			rule: "Test.FailingMultiFile".into(),
			message: "cannot compare files".into(),
		})
	}
}

/// Reports an error on every tag and fails on any tag containing `fail`.
pub struct FailingRule;

impl Rule for FailingRule {
	fn name(&self) -> &str {
		"Rules.Test.FailingRule"
	}

	fn register(&self) -> Vec<TokenType> {
		vec![TokenType::Smarty]
	}

	fn process(&mut self, file: &mut ProcessedFile, position: usize) -> LintResult<()> {
		let tokens = file.tokens()?;
		file.add_error("Tag found", crate::Position::Token(position), "Found", &[]);

		if tokens[position].content.contains("fail") {
			return Err(LintError::RuleFailure {
				rule: "Test.Failing".into(),
				message: "boom".into(),
			});
		}

		Ok(())
	}
}

pub struct PanickingRule;

impl Rule for PanickingRule {
	fn name(&self) -> &str {
		"Rules.Test.PanickingRule"
	}

	fn register(&self) -> Vec<TokenType> {
		vec![TokenType::Smarty]
	}

	fn process(&mut self, _file: &mut ProcessedFile, _position: usize) -> LintResult<()> {
		panic!("kaboom");
	}
}

pub struct SilentRule;

impl Rule for SilentRule {
	fn name(&self) -> &str {
		"Rules.Test.SilentRule"
	}

	fn register(&self) -> Vec<TokenType> {
		vec![]
	}

	fn process(&mut self, _file: &mut ProcessedFile, _position: usize) -> LintResult<()> {
		Ok(())
	}
}

pub struct BadlyNamedRule;

impl Rule for BadlyNamedRule {
	fn name(&self) -> &str {
		"TabRule"
	}

	fn register(&self) -> Vec<TokenType> {
		vec![TokenType::Tab]
	}

	fn process(&mut self, _file: &mut ProcessedFile, _position: usize) -> LintResult<()> {
		Ok(())
	}
}
