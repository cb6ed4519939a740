use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use smartylint_cli::Commands;
use smartylint_cli::OutputFormat;
use smartylint_cli::SmartyLintCli;
use smartylint_cli::build_extension_set;
use smartylint_cli::discover_files;
use smartylint_cli::render_github;
use smartylint_cli::render_json;
use smartylint_cli::render_rules;
use smartylint_cli::render_text;
use smartylint_core::LintConfig;
use smartylint_core::Linter;
use smartylint_core::RuleRegistry;
use smartylint_core::RunContext;
use smartylint_core::SourceFile;
use smartylint_core::builtin_rules;
use smartylint_core::patterns::GLOBAL_SCOPE;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
}

/// Options of the `check` subcommand that override config values.
struct CheckOverrides {
	extensions: Option<Vec<String>>,
	left_delimiter: Option<String>,
	right_delimiter: Option<String>,
	no_auto_literal: bool,
	ignore_rules: Vec<String>,
	ignore: Vec<String>,
}

fn main() {
	let args = SmartyLintCli::parse();

	// Respect NO_COLOR env var, --no-color flag and terminals without color.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_logging(args.verbose);

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Check {
			paths,
			extensions,
			left_delimiter,
			right_delimiter,
			no_auto_literal,
			ignore_rules,
			ignore,
			format,
		}) => {
			let overrides = CheckOverrides {
				extensions: extensions.clone(),
				left_delimiter: left_delimiter.clone(),
				right_delimiter: right_delimiter.clone(),
				no_auto_literal: *no_auto_literal,
				ignore_rules: ignore_rules.clone(),
				ignore: ignore.clone(),
			};
			run_check(&args, paths, overrides, *format)
		}
		Some(Commands::Rules) => run_rules(&args),
		None => {
			eprintln!("No subcommand specified. Run `smartylint --help` for usage.");
			process::exit(1);
		}
	};

	match result {
		Ok(true) => process::exit(1),
		Ok(false) => {}
		Err(e) => {
			match e.downcast::<smartylint_core::LintError>() {
				Ok(lint_err) => {
					let report: miette::Report = (*lint_err).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

/// Log to stderr. `--verbose` raises the default level to `debug`,
/// otherwise `RUST_LOG` decides and falls back to `warn`.
fn init_logging(verbose: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};

	let _ = tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.try_init();
}

fn resolve_root(args: &SmartyLintCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(
	args: &SmartyLintCli,
	root: &Path,
) -> Result<LintConfig, Box<dyn std::error::Error>> {
	let config = match &args.config {
		Some(path) => LintConfig::from_path(path)?,
		None => LintConfig::load(root)?.unwrap_or_default(),
	};

	if args.verbose {
		match &args.config {
			Some(path) => eprintln!("Using config {}", path.display()),
			None => {
				if let Some(path) = LintConfig::resolve_path(root) {
					eprintln!("Using config {}", path.display());
				}
			}
		}
	}

	Ok(config)
}

fn apply_overrides(config: &mut LintConfig, overrides: CheckOverrides) {
	if let Some(extensions) = overrides.extensions {
		config.extensions = extensions;
	}
	if let Some(left) = overrides.left_delimiter {
		config.left_delimiter = left;
	}
	if let Some(right) = overrides.right_delimiter {
		config.right_delimiter = right;
	}
	if overrides.no_auto_literal {
		config.auto_literal = false;
	}

	config.ignore_rules.extend(
		overrides
			.ignore_rules
			.into_iter()
			.map(|rule| rule.trim().to_string())
			.filter(|rule| !rule.is_empty()),
	);

	for pattern in overrides.ignore {
		config.add_ignore_pattern(GLOBAL_SCOPE, pattern);
	}
}

/// Returns `true` when any error was recorded.
fn run_check(
	args: &SmartyLintCli,
	paths: &[PathBuf],
	overrides: CheckOverrides,
	format: OutputFormat,
) -> Result<bool, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let mut config = load_config(args, &root)?;
	apply_overrides(&mut config, overrides);

	let extensions = build_extension_set(&config.extensions)?;
	let mut linter = Linter::with_builtin_rules(config)?;

	let targets = if paths.is_empty() {
		vec![root.clone()]
	} else {
		paths.to_vec()
	};
	let files = discover_files(&targets, &extensions)?;

	if args.verbose {
		eprintln!("Checking {} file(s)", files.len());
	}

	let sources = files.iter().map(|path| {
		let mut source = SourceFile::read(path);
		source.path = make_relative(path, &root);
		source
	});
	let report = linter.run(sources);

	match format {
		OutputFormat::Text => print!("{}", render_text(&report, color_enabled())),
		OutputFormat::Json => println!("{}", render_json(&report)?),
		OutputFormat::Github => {
			print!("{}", render_github(&report));
			eprintln!(
				"{} error(s), {} warning(s) in {} file(s)",
				report.total_errors(),
				report.total_warnings(),
				report.files.len()
			);
		}
	}

	Ok(report.has_errors())
}

fn run_rules(args: &SmartyLintCli) -> Result<bool, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(args, &root)?;
	let context = RunContext::new(config)?;
	let registry = RuleRegistry::new(builtin_rules(), &context)?;

	print!("{}", render_rules(&registry, color_enabled()));

	Ok(false)
}

fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
