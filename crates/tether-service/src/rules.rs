//! Rule CRUD. Every mutation revalidates, recompiles expressions, and
//! republishes the scope's snapshot, so a rule that persists is a rule
//! that evaluates.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use tether_core::errors::{StorageError, TetherResult};
use tether_core::models::rule::{AttributeSelector, FuzzyAlgorithm, MatchType};
use tether_core::rules::validate;
use tether_core::traits::CorrelationStore;
use tether_core::{CorrelationRule, RuleScope, ValidRule};
use tether_match::CompiledExpression;

use crate::snapshots::SnapshotCache;

/// Partial rule update: only the provided fields change.
///
/// `scope` and `id` are immutable once a rule exists; moving a rule between
/// scopes is a delete plus a create.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RulePatch {
    pub name: Option<String>,
    pub attributes: Option<AttributeSelector>,
    pub match_type: Option<MatchType>,
    pub algorithm: Option<FuzzyAlgorithm>,
    pub expression: Option<String>,
    pub threshold: Option<f64>,
    pub weight: Option<f64>,
    pub tier: Option<u32>,
    pub is_definitive: Option<bool>,
    pub normalize: Option<bool>,
    pub priority: Option<u32>,
}

pub struct RuleService<S: CorrelationStore> {
    store: Arc<S>,
    snapshots: Arc<SnapshotCache>,
}

impl<S: CorrelationStore> RuleService<S> {
    pub fn new(store: Arc<S>, snapshots: Arc<SnapshotCache>) -> Self {
        Self { store, snapshots }
    }

    /// Validate, persist, and publish a new rule.
    ///
    /// Expressions are compiled here, at save time; a rule that reaches the
    /// store can never fail to compile during a run.
    pub fn create(&self, rule: CorrelationRule) -> TetherResult<ValidRule> {
        let valid = validate(rule)?;
        compile_if_expression(&valid)?;
        self.store.put_rule(&valid)?;
        self.snapshots.refresh(self.store.as_ref(), &valid.scope)?;
        info!(rule_id = %valid.id, scope = %valid.scope, "rule created");
        Ok(valid)
    }

    /// Apply a partial update and re-persist.
    pub fn update(&self, rule_id: &str, patch: RulePatch) -> TetherResult<ValidRule> {
        let rule = self
            .store
            .get_rule(rule_id)?
            .ok_or_else(|| StorageError::RuleNotFound {
                rule_id: rule_id.to_string(),
            })?;
        let merged = apply_patch(rule, patch);

        let valid = validate(merged)?;
        compile_if_expression(&valid)?;
        self.store.put_rule(&valid)?;
        self.snapshots.refresh(self.store.as_ref(), &valid.scope)?;
        info!(rule_id = %valid.id, scope = %valid.scope, "rule updated");
        Ok(valid)
    }

    pub fn get(&self, rule_id: &str) -> TetherResult<Option<CorrelationRule>> {
        self.store.get_rule(rule_id)
    }

    pub fn list(&self, scope: &RuleScope) -> TetherResult<Vec<CorrelationRule>> {
        self.store.list_rules(scope)
    }

    /// Soft delete: the rule stays on disk for explainability of historical
    /// hits, but leaves the active snapshot. Returns false when unknown.
    pub fn delete(&self, rule_id: &str) -> TetherResult<bool> {
        let Some(rule) = self.store.get_rule(rule_id)? else {
            return Ok(false);
        };
        let removed = self.store.deactivate_rule(rule_id)?;
        if removed {
            self.snapshots.refresh(self.store.as_ref(), &rule.scope)?;
            info!(rule_id = %rule_id, scope = %rule.scope, "rule deactivated");
        }
        Ok(removed)
    }
}

fn compile_if_expression(rule: &ValidRule) -> TetherResult<()> {
    if rule.match_type == MatchType::Expression {
        if let Some(expression) = &rule.expression {
            CompiledExpression::compile(expression)?;
        }
    }
    Ok(())
}

fn apply_patch(mut rule: CorrelationRule, patch: RulePatch) -> CorrelationRule {
    if let Some(match_type) = patch.match_type {
        rule.match_type = match_type;
        // Changing the match type drops config the new type cannot use.
        match match_type {
            MatchType::Exact => {
                rule.algorithm = None;
                rule.expression = None;
            }
            MatchType::Fuzzy => rule.expression = None,
            MatchType::Expression => rule.algorithm = None,
        }
    }
    if let Some(name) = patch.name {
        rule.name = name;
    }
    if let Some(attributes) = patch.attributes {
        rule.attributes = attributes;
    }
    if let Some(algorithm) = patch.algorithm {
        rule.algorithm = Some(algorithm);
    }
    if let Some(expression) = patch.expression {
        rule.expression = Some(expression);
    }
    if let Some(threshold) = patch.threshold {
        rule.threshold = threshold;
    }
    if let Some(weight) = patch.weight {
        rule.weight = weight;
    }
    if let Some(tier) = patch.tier {
        rule.tier = tier;
    }
    if let Some(is_definitive) = patch.is_definitive {
        rule.is_definitive = is_definitive;
    }
    if let Some(normalize) = patch.normalize {
        rule.normalize = normalize;
    }
    if let Some(priority) = patch.priority {
        rule.priority = priority;
    }
    rule
}
