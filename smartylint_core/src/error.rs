use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum LintError {
	#[error(transparent)]
	#[diagnostic(code(smartylint::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(smartylint::config_parse),
		help("check that smartylint.toml is valid TOML")
	)]
	ConfigParse(String),

	#[error("invalid {side} delimiter: delimiters must not be empty")]
	#[diagnostic(
		code(smartylint::invalid_delimiter),
		help("set `left_delimiter` and `right_delimiter` to the values configured in Smarty")
	)]
	InvalidDelimiter { side: &'static str },

	#[error("invalid rule name `{0}`")]
	#[diagnostic(
		code(smartylint::invalid_rule_name),
		help("rule names must look like `Rules.<Category>.<Name>Rule`")
	)]
	InvalidRuleName(String),

	#[error("rule `{0}` does not listen for any token type")]
	#[diagnostic(
		code(smartylint::empty_registration),
		help("`Rule::register` must return at least one token type")
	)]
	EmptyRegistration(String),

	#[error("invalid ignore pattern `{pattern}`: {reason}")]
	#[diagnostic(code(smartylint::invalid_ignore_pattern))]
	InvalidIgnorePattern { pattern: String, reason: String },

	#[error("the token stream for `{0}` has already been released")]
	#[diagnostic(
		code(smartylint::tokens_released),
		help("token streams are only retained after dispatch when multi-file rules are registered")
	)]
	TokensReleased(String),

	#[error("rule `{rule}` failed: {message}")]
	#[diagnostic(code(smartylint::rule_failure))]
	RuleFailure { rule: String, message: String },
}

pub type LintResult<T> = Result<T, LintError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
