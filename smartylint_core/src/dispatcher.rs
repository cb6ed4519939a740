use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;

use serde::Serialize;

use crate::LintResult;
use crate::file::ProcessedFile;
use crate::registry::RuleRegistry;
use crate::scanner::has_suppression_marker;

/// A multi-file rule that returned an error or panicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFailure {
	pub rule: String,
	pub message: String,
}

/// Drives the rules of a [`RuleRegistry`] over processed files.
#[derive(Debug)]
pub struct Dispatcher {
	registry: RuleRegistry,
}

impl Dispatcher {
	pub fn new(registry: RuleRegistry) -> Self {
		Self { registry }
	}

	pub fn registry(&self) -> &RuleRegistry {
		&self.registry
	}

	/// Walk the file's tokens once and hand each one to the rules listening
	/// for its type.
	///
	/// A template comment containing the suppression marker discards every
	/// diagnostic recorded so far and ends dispatch for the file. Errors
	/// returned by a rule are propagated; the active rule is cleared first.
	pub fn dispatch(&mut self, file: &mut ProcessedFile) -> LintResult<()> {
		let tokens = file.tokens()?;
		let RuleRegistry {
			file_rules,
			listeners,
			..
		} = &mut self.registry;

		for (position, token) in tokens.iter().enumerate() {
			if token.r#type.is_smarty_comment() && has_suppression_marker(&token.content) {
				tracing::debug!(path = file.path(), line = token.line, "file opted out of linting");
				file.clear_diagnostics();
				return Ok(());
			}

			let Some(indices) = listeners.get(&token.r#type) else {
				continue;
			};

			for &index in indices {
				let registered = &mut file_rules[index];

				if file
					.context()
					.ignore_patterns()
					.suppresses(file.path(), registered.id.as_str())
				{
					continue;
				}

				file.set_active_rule(Some(registered.id.clone()));
				let result = registered.rule.process(file, position);
				file.set_active_rule(None);
				result?;
			}
		}

		Ok(())
	}

	/// Run every multi-file rule once over `files`. A failing rule does not
	/// stop the others.
	pub fn dispatch_multi(&mut self, files: &mut [ProcessedFile]) -> Vec<RuleFailure> {
		let mut failures = Vec::new();

		for registered in &mut self.registry.multi_file_rules {
			for file in files.iter_mut() {
				file.set_active_rule(Some(registered.id.clone()));
			}

			let outcome = catch_unwind(AssertUnwindSafe(|| registered.rule.process(files)));

			for file in files.iter_mut() {
				file.set_active_rule(None);
			}

			let message = match outcome {
				Ok(Ok(())) => continue,
				Ok(Err(error)) => error.to_string(),
				Err(payload) => panic_message(payload.as_ref()),
			};

			tracing::warn!(rule = %registered.id, %message, "multi-file rule failed");
			failures.push(RuleFailure {
				rule: registered.id.to_string(),
				message,
			});
		}

		failures
	}
}

/// Best-effort text of a caught panic.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		return (*message).to_string();
	}

	if let Some(message) = payload.downcast_ref::<String>() {
		return message.clone();
	}

	"rule panicked".to_string()
}
