use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

pub use discovery::*;
pub use output::*;

mod discovery;
mod output;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Lint Smarty templates for whitespace, comment and line-ending problems.",
	long_about = "smartylint scans Smarty templates into tokens and runs a set of rules \
	              over them, reporting errors and warnings per file and line.\n\nQuick \
	              start:\n  smartylint check   Lint every template below the current \
	              directory\n  smartylint rules   List the built-in rules"
)]
pub struct SmartyLintCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory. Config files are discovered here.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Explicit config file, used instead of `smartylint.toml` discovery.
	#[arg(long, global = true)]
	pub config: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Lint template files.
	///
	/// Directories are walked recursively, honouring `.gitignore` and
	/// skipping hidden entries. Files named explicitly are always checked,
	/// whatever their extension. Exits with code 1 when any error was
	/// recorded.
	Check {
		/// Files or directories to check. Defaults to the project root.
		paths: Vec<PathBuf>,

		/// Extensions to check when walking directories, e.g. `tpl,html.tpl`.
		#[arg(long, value_delimiter = ',')]
		extensions: Option<Vec<String>>,

		/// String that opens a template tag.
		#[arg(long)]
		left_delimiter: Option<String>,

		/// String that closes a template tag.
		#[arg(long)]
		right_delimiter: Option<String>,

		/// Treat delimiters next to whitespace as tags rather than literal
		/// text.
		#[arg(long, default_value_t = false)]
		no_auto_literal: bool,

		/// Rule identifiers or diagnostic sources to silence, e.g.
		/// `Commenting.Todo,Whitespace.SuperfluousWhitespace.EndLine`.
		#[arg(long, value_delimiter = ',')]
		ignore_rules: Vec<String>,

		/// Glob-like path pattern excluded from every rule. Repeatable.
		#[arg(long = "ignore")]
		ignore: Vec<String>,

		/// Output format for lint results. Use `text` for human-readable
		/// output, `json` for programmatic consumption, or `github` for
		/// GitHub Actions annotations that appear inline on PRs.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List the built-in rules and the token types they listen for.
	Rules,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable report grouped by file.
	#[default]
	Text,
	/// Machine-readable JSON output.
	Json,
	/// GitHub Actions annotations (`::error` / `::warning`).
	Github,
}
