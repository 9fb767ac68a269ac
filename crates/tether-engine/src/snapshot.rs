//! Versioned, immutable rule snapshots.
//!
//! Rule configuration is read-mostly. Evaluators never read live storage:
//! they hold an `Arc<RuleSnapshot>` for the duration of a batch, so a rule
//! update mid-run is invisible until the next snapshot is published.

use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use tether_core::rules::validate;
use tether_core::{CorrelationRule, RuleScope};
use tether_match::PreparedRule;

/// One consistent view of the active rule set for a scope.
#[derive(Debug)]
pub struct RuleSnapshot {
    version: u64,
    scope: RuleScope,
    /// Prepared rules sorted by (tier, priority, id).
    rules: Vec<PreparedRule>,
}

impl RuleSnapshot {
    /// An empty snapshot, version 0.
    pub fn empty(scope: RuleScope) -> Self {
        Self {
            version: 0,
            scope,
            rules: Vec::new(),
        }
    }

    /// Build a snapshot from stored rules.
    ///
    /// Inactive rules are dropped. A stored rule that fails re-validation or
    /// expression compilation is skipped with a warning rather than sinking
    /// the snapshot — the rest of the rule set stays evaluable.
    pub fn build(scope: RuleScope, version: u64, rules: Vec<CorrelationRule>) -> Self {
        let mut prepared: Vec<PreparedRule> = Vec::with_capacity(rules.len());
        for rule in rules {
            if !rule.is_active {
                continue;
            }
            let rule_id = rule.id.clone();
            let valid = match validate(rule) {
                Ok(valid) => valid,
                Err(e) => {
                    warn!(rule_id = %rule_id, error = %e, "skipping stored rule that fails validation");
                    continue;
                }
            };
            match PreparedRule::prepare(valid) {
                Ok(p) => prepared.push(p),
                Err(e) => {
                    warn!(rule_id = %rule_id, error = %e, "skipping rule with uncompilable expression");
                }
            }
        }

        prepared.sort_by(|a, b| {
            (a.rule().tier, a.rule().priority, a.rule().id.as_str())
                .cmp(&(b.rule().tier, b.rule().priority, b.rule().id.as_str()))
        });

        Self {
            version,
            scope,
            rules: prepared,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn scope(&self) -> &RuleScope {
        &self.scope
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[PreparedRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Copy-on-write handle: readers clone an `Arc` of the current snapshot,
/// writers publish a whole new one. A reader never observes a half-updated
/// rule set.
pub struct SnapshotHandle {
    current: RwLock<Arc<RuleSnapshot>>,
}

impl SnapshotHandle {
    pub fn new(scope: RuleScope) -> Self {
        Self {
            current: RwLock::new(Arc::new(RuleSnapshot::empty(scope))),
        }
    }

    /// The current snapshot. Cheap; hold the `Arc` for the whole batch.
    pub fn current(&self) -> Arc<RuleSnapshot> {
        self.current
            .read()
            .map(|guard| Arc::clone(&guard))
            .unwrap_or_else(|poisoned| Arc::clone(&poisoned.into_inner()))
    }

    /// Atomically replace the rule set, bumping the version.
    pub fn publish(&self, rules: Vec<CorrelationRule>) -> Arc<RuleSnapshot> {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let next = Arc::new(RuleSnapshot::build(
            guard.scope.clone(),
            guard.version + 1,
            rules,
        ));
        info!(
            scope = %next.scope,
            version = next.version,
            rules = next.rules.len(),
            "published rule snapshot"
        );
        *guard = Arc::clone(&next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::models::rule::{AttributeSelector, MatchType};

    fn rule(id: &str, tier: u32, priority: u32) -> CorrelationRule {
        CorrelationRule {
            id: id.to_string(),
            name: format!("rule {id}"),
            scope: RuleScope::Tenant,
            attributes: AttributeSelector::Shared {
                attribute: "email".to_string(),
            },
            match_type: MatchType::Exact,
            algorithm: None,
            expression: None,
            threshold: 1.0,
            weight: 1.0,
            tier,
            is_definitive: false,
            normalize: false,
            priority,
            is_active: true,
        }
    }

    #[test]
    fn orders_by_tier_then_priority() {
        let snapshot = RuleSnapshot::build(
            RuleScope::Tenant,
            1,
            vec![rule("c", 2, 0), rule("b", 1, 5), rule("a", 1, 1)],
        );
        let ids: Vec<&str> = snapshot.rules().iter().map(|p| p.rule().id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn drops_inactive_rules() {
        let mut inactive = rule("x", 1, 0);
        inactive.is_active = false;
        let snapshot = RuleSnapshot::build(RuleScope::Tenant, 1, vec![inactive, rule("y", 1, 0)]);
        assert_eq!(snapshot.rules().len(), 1);
    }

    #[test]
    fn skips_malformed_stored_rule() {
        let mut bad = rule("bad", 1, 0);
        bad.threshold = 3.0;
        let snapshot = RuleSnapshot::build(RuleScope::Tenant, 1, vec![bad, rule("ok", 1, 0)]);
        assert_eq!(snapshot.rules().len(), 1);
        assert_eq!(snapshot.rules()[0].rule().id, "ok");
    }

    #[test]
    fn publish_bumps_version_and_swaps_atomically() {
        let handle = SnapshotHandle::new(RuleScope::Tenant);
        let before = handle.current();
        assert_eq!(before.version(), 0);

        let published = handle.publish(vec![rule("a", 1, 0)]);
        assert_eq!(published.version(), 1);
        assert_eq!(handle.current().version(), 1);
        // The old snapshot is still intact for anyone holding it.
        assert_eq!(before.version(), 0);
        assert!(before.is_empty());
    }
}
