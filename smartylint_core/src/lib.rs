//! `smartylint_core` is the engine behind the `smartylint` command. It scans
//! Smarty templates into typed tokens, hands each token to the rules that
//! listen for its type, and collects the errors and warnings they report.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Template source
//!   -> Scanner (splits tags from text, then classifies whitespace, text, comments and tags)
//!   -> Dispatcher (calls every rule registered for each token type, in stream order)
//!   -> ProcessedFile (filters diagnostics through ignore rules and patterns, groups them by line)
//!   -> Multi-file rules (run once after every file)
//!   -> Report
//! ```
//!
//! ## Modules
//!
//! - [`config`] - `smartylint.toml` loading.
//! - [`scanner`] - Delimiter-aware scanning and line-ending helpers.
//! - [`patterns`] - Glob-like ignore patterns.
//! - [`rules`] - The built-in rules.
//!
//! ## Key Types
//!
//! - [`Linter`] - Drives a run over a set of files.
//! - [`Rule`] / [`MultiFileRule`] - The rule plugin contract.
//! - [`ProcessedFile`] - A file and its diagnostics.
//! - [`Token`] / [`TokenStream`] - Scanner output.
//! - [`Report`] - The result of a run.
//!
//! ## Quick Start
//!
//! ```rust
//! use smartylint_core::LintConfig;
//! use smartylint_core::Linter;
//! use smartylint_core::SourceFile;
//!
//! let mut linter = Linter::with_builtin_rules(LintConfig::default()).unwrap();
//! let report = linter.run([SourceFile::new("index.tpl", "{* page *}\n{$title }\n")]);
//!
//! assert_eq!(report.total_errors(), 1);
//! ```

pub use config::*;
pub use context::*;
pub use dispatcher::*;
pub use error::*;
pub use file::*;
pub use linter::*;
pub use registry::*;
pub use rule::*;
pub use rules::builtin_rules;
pub use scanner::Delimiters;
pub use scanner::Scanner;
pub use scanner::Segment;
pub use tokens::*;

pub mod config;
mod context;
mod dispatcher;
mod error;
mod file;
mod linter;
pub mod patterns;
mod registry;
mod rule;
pub mod rules;
pub mod scanner;
mod tokens;

#[cfg(test)]
mod __fixtures;
