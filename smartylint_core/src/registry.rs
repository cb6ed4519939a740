use std::collections::HashMap;

use crate::LintError;
use crate::LintResult;
use crate::context::RunContext;
use crate::rule::MultiFileRule;
use crate::rule::Rule;
use crate::rule::RuleId;
use crate::rule::RuleInstance;
use crate::tokens::TokenType;

pub struct RegisteredRule {
	pub id: RuleId,
	pub token_types: Vec<TokenType>,
	pub rule: Box<dyn Rule>,
}

pub struct RegisteredMultiFileRule {
	pub id: RuleId,
	pub rule: Box<dyn MultiFileRule>,
}

/// The rules of a run, indexed by the token types they listen for.
///
/// Built once before any file is processed. Rules disabled through
/// `ignore_rules` are left out entirely.
#[derive(Default)]
pub struct RuleRegistry {
	pub(crate) file_rules: Vec<RegisteredRule>,
	pub(crate) multi_file_rules: Vec<RegisteredMultiFileRule>,
	pub(crate) listeners: HashMap<TokenType, Vec<usize>>,
}

impl RuleRegistry {
	pub fn new(rules: Vec<RuleInstance>, context: &RunContext) -> LintResult<Self> {
		let mut registry = Self::default();

		for instance in rules {
			let id = RuleId::from_qualified_name(instance.name())?;

			if context.is_rule_ignored(id.as_str()) {
				tracing::debug!(rule = %id, "rule disabled by configuration");
				continue;
			}

			match instance {
				RuleInstance::File(rule) => registry.register_file_rule(id, rule)?,
				RuleInstance::MultiFile(rule) => {
					tracing::debug!(rule = %id, "registered multi-file rule");
					registry
						.multi_file_rules
						.push(RegisteredMultiFileRule { id, rule });
				}
			}
		}

		Ok(registry)
	}

	fn register_file_rule(&mut self, id: RuleId, rule: Box<dyn Rule>) -> LintResult<()> {
		let mut token_types = Vec::new();

		for token_type in rule.register() {
			if !token_types.contains(&token_type) {
				token_types.push(token_type);
			}
		}

		if token_types.is_empty() {
			return Err(LintError::EmptyRegistration(id.to_string()));
		}

		let index = self.file_rules.len();

		for token_type in &token_types {
			self.listeners.entry(*token_type).or_default().push(index);
		}

		tracing::debug!(rule = %id, ?token_types, "registered rule");
		self.file_rules.push(RegisteredRule {
			id,
			token_types,
			rule,
		});

		Ok(())
	}

	pub fn file_rules(&self) -> &[RegisteredRule] {
		&self.file_rules
	}

	pub fn multi_file_rules(&self) -> &[RegisteredMultiFileRule] {
		&self.multi_file_rules
	}

	pub fn has_multi_file_rules(&self) -> bool {
		!self.multi_file_rules.is_empty()
	}

	/// Indices into [`RuleRegistry::file_rules`] of the rules listening for
	/// `token_type`, in registration order.
	pub fn listeners(&self, token_type: TokenType) -> &[usize] {
		self.listeners
			.get(&token_type)
			.map_or(&[], Vec::as_slice)
	}

	pub fn rule_ids(&self) -> impl Iterator<Item = &RuleId> {
		self.file_rules
			.iter()
			.map(|registered| &registered.id)
			.chain(self.multi_file_rules.iter().map(|registered| &registered.id))
	}
}

impl std::fmt::Debug for RuleRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RuleRegistry")
			.field("rules", &self.rule_ids().collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}
