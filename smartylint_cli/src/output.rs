use std::fmt::Write;

use owo_colors::OwoColorize;
use smartylint_core::FileReport;
use smartylint_core::Report;
use smartylint_core::RuleRegistry;
use smartylint_core::Severity;

const RULE: &str =
	"--------------------------------------------------------------------------------";

/// Render `report` as a human-readable listing grouped by file.
///
/// Files without diagnostics are left out. A summary line closes the
/// listing.
pub fn render_text(report: &Report, use_color: bool) -> String {
	let mut output = String::new();

	for file in report.files_with_problems() {
		render_file(&mut output, file, use_color);
	}

	for failure in &report.failures {
		let _ = writeln!(
			output,
			"{} multi-file rule `{}` failed: {}",
			paint("warning:", Severity::Warning, use_color),
			failure.rule,
			failure.message
		);
	}

	let checked = report.files.len();
	let errors = report.total_errors();
	let warnings = report.total_warnings();

	if errors + warnings == 0 {
		let _ = writeln!(output, "No problems found in {checked} file(s).");
	} else {
		let _ = writeln!(
			output,
			"Found {errors} error(s) and {warnings} warning(s) in {checked} file(s)."
		);
	}

	output
}

fn render_file(output: &mut String, file: &FileReport, use_color: bool) {
	let _ = writeln!(output);
	let _ = writeln!(output, "FILE: {}", file.path);
	let _ = writeln!(output, "{RULE}");
	let _ = writeln!(
		output,
		"FOUND {} ERROR(S) AND {} WARNING(S) AFFECTING {} LINE(S)",
		file.errors, file.warnings, file.lines
	);
	let _ = writeln!(output, "{RULE}");

	let width = file
		.diagnostics
		.iter()
		.map(|diagnostic| diagnostic.line.to_string().len())
		.max()
		.unwrap_or(1);

	for diagnostic in &file.diagnostics {
		let label = format!("{:<7}", diagnostic.severity.as_str());
		let _ = writeln!(
			output,
			" {:>width$} | {} | {} ({})",
			diagnostic.line,
			paint(&label, diagnostic.severity, use_color),
			diagnostic.message,
			diagnostic.source
		);
	}

	let _ = writeln!(output, "{RULE}");
}

fn paint(text: &str, severity: Severity, use_color: bool) -> String {
	if !use_color {
		return text.to_string();
	}

	match severity {
		Severity::Error => format!("{}", text.red()),
		Severity::Warning => format!("{}", text.yellow()),
	}
}

/// Render `report` as pretty-printed JSON.
pub fn render_json(report: &Report) -> serde_json::Result<String> {
	serde_json::to_string_pretty(report)
}

/// Render one GitHub Actions annotation per diagnostic.
pub fn render_github(report: &Report) -> String {
	let mut output = String::new();

	for file in &report.files {
		for diagnostic in &file.diagnostics {
			let level = match diagnostic.severity {
				Severity::Error => "error",
				Severity::Warning => "warning",
			};
			let _ = writeln!(
				output,
				"::{level} file={},line={},col={}::{} ({})",
				file.path, diagnostic.line, diagnostic.column, diagnostic.message, diagnostic.source
			);
		}
	}

	for failure in &report.failures {
		let _ = writeln!(
			output,
			"::warning::multi-file rule `{}` failed: {}",
			failure.rule, failure.message
		);
	}

	output
}

/// List the registered rules, one per line, with the token types each one
/// listens for.
pub fn render_rules(registry: &RuleRegistry, use_color: bool) -> String {
	let mut output = String::new();

	let rows = registry
		.file_rules()
		.iter()
		.map(|rule| {
			let listens_for = rule
				.token_types
				.iter()
				.map(|token_type| token_type.as_str())
				.collect::<Vec<_>>()
				.join(", ");
			(rule.id.as_str(), listens_for)
		})
		.chain(
			registry
				.multi_file_rules()
				.iter()
				.map(|rule| (rule.id.as_str(), "(multi-file)".to_string())),
		);

	for (id, detail) in rows {
		// Escape codes must not count towards the column width.
		let id = format!("{id:<36}");
		let id = if use_color {
			format!("{}", id.bold())
		} else {
			id
		};
		let _ = writeln!(output, "{id} {detail}");
	}

	output
}
