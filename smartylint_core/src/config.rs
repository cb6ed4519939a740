use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::LintError;
use crate::LintResult;
use crate::patterns::IgnorePatterns;
use crate::scanner::Delimiters;
use crate::scanner::Scanner;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["smartylint.toml", ".smartylint.toml"];

/// Configuration loaded from a `smartylint.toml` file.
///
/// ```toml
/// left_delimiter = "{"
/// right_delimiter = "}"
/// auto_literal = true
/// extensions = ["tpl", "smarty"]
/// ignore_rules = ["Commenting.Todo"]
///
/// [ignore_patterns]
/// global = ["*vendor*"]
/// "Whitespace.SuperfluousWhitespace" = ["*generated*"]
///
/// [rules]
/// eol_char = "lf"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
	/// String that opens a template tag.
	pub left_delimiter: String,
	/// String that closes a template tag.
	pub right_delimiter: String,
	/// Treat delimiters next to whitespace as literal text.
	pub auto_literal: bool,
	/// File extensions checked when walking directories. Multi-part
	/// extensions such as `html.tpl` are allowed.
	pub extensions: Vec<String>,
	/// Rule identifiers (or diagnostic sources) that never report.
	pub ignore_rules: BTreeSet<String>,
	/// Path patterns keyed by scope: `global` or a rule identifier.
	pub ignore_patterns: BTreeMap<String, Vec<String>>,
	/// Settings consumed by individual built-in rules.
	pub rules: RulesConfig,
}

impl Default for LintConfig {
	fn default() -> Self {
		Self {
			left_delimiter: "{".into(),
			right_delimiter: "}".into(),
			auto_literal: true,
			extensions: vec!["tpl".into(), "smarty".into()],
			ignore_rules: BTreeSet::new(),
			ignore_patterns: BTreeMap::new(),
			rules: RulesConfig::default(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
	/// Expected line ending for `Files.LineEndings`. Accepts the literal
	/// characters or one of `lf`, `crlf` and `cr`.
	pub eol_char: String,
}

impl Default for RulesConfig {
	fn default() -> Self {
		Self {
			eol_char: "\n".into(),
		}
	}
}

impl RulesConfig {
	pub fn expected_eol(&self) -> &str {
		match self.eol_char.to_ascii_lowercase().as_str() {
			"lf" | "\\n" => "\n",
			"crlf" | "\\r\\n" => "\r\n",
			"cr" | "\\r" => "\r",
			_ => self.eol_char.as_str(),
		}
	}
}

impl LintConfig {
	/// Resolve the first existing config path for `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> LintResult<Option<LintConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::from_path(&config_path).map(Some)
	}

	pub fn from_path(path: &Path) -> LintResult<LintConfig> {
		let content = std::fs::read_to_string(path)?;
		let config: LintConfig =
			toml::from_str(&content).map_err(|e| LintError::ConfigParse(e.to_string()))?;

		Ok(config)
	}

	pub fn delimiters(&self) -> LintResult<Delimiters> {
		Delimiters::new(self.left_delimiter.as_str(), self.right_delimiter.as_str())
	}

	pub fn scanner(&self) -> LintResult<Scanner> {
		Ok(Scanner::new(self.delimiters()?, self.auto_literal))
	}

	pub fn compile_ignore_patterns(&self) -> LintResult<IgnorePatterns> {
		IgnorePatterns::compile(&self.ignore_patterns)
	}

	/// Add a pattern under the given scope.
	pub fn add_ignore_pattern(&mut self, scope: impl Into<String>, pattern: impl Into<String>) {
		self.ignore_patterns
			.entry(scope.into())
			.or_default()
			.push(pattern.into());
	}
}
