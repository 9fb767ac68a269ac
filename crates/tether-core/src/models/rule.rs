use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Which population a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleScope {
    /// Attribute-pair rule scoped to one connector's accounts.
    Connector { connector_id: String },
    /// Tenant-wide single-attribute identity rule.
    Tenant,
}

impl RuleScope {
    /// Stable storage key for this scope.
    pub fn key(&self) -> String {
        match self {
            Self::Connector { connector_id } => format!("connector:{connector_id}"),
            Self::Tenant => "tenant".to_string(),
        }
    }
}

impl fmt::Display for RuleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// How a rule compares its attribute pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Fuzzy,
    Expression,
}

/// Similarity algorithm for fuzzy rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuzzyAlgorithm {
    Levenshtein,
    JaroWinkler,
}

/// Which attributes a rule reads on each side of the pair.
///
/// Connector-scoped rules name a source and a target attribute; tenant-wide
/// rules name a single attribute used on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeSelector {
    Pair {
        source_attribute: String,
        target_attribute: String,
    },
    Shared { attribute: String },
}

impl AttributeSelector {
    /// Attribute name read from the source record.
    pub fn source_side(&self) -> &str {
        match self {
            Self::Pair { source_attribute, .. } => source_attribute,
            Self::Shared { attribute } => attribute,
        }
    }

    /// Attribute name read from the target record.
    pub fn target_side(&self) -> &str {
        match self {
            Self::Pair { target_attribute, .. } => target_attribute,
            Self::Shared { attribute } => attribute,
        }
    }
}

/// One comparison directive in the correlation rule set.
///
/// Raw rules are deserialized freely and only become usable by the engine
/// after passing [`crate::rules::validate`], which returns a [`ValidRule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationRule {
    pub id: String,
    pub name: String,
    pub scope: RuleScope,
    pub attributes: AttributeSelector,
    pub match_type: MatchType,
    /// Required iff `match_type` is `Fuzzy`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<FuzzyAlgorithm>,
    /// Required iff `match_type` is `Expression`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// Minimum similarity for this rule to count as a hit. [0.0, 1.0].
    pub threshold: f64,
    /// Contribution to the aggregate score. >= 0.
    pub weight: f64,
    /// Evaluation priority band; lower tiers are evaluated first. >= 1.
    pub tier: u32,
    /// A hit on a definitive rule alone forces auto-confirm.
    #[serde(default)]
    pub is_definitive: bool,
    /// Trim and case-fold values before comparison.
    #[serde(default)]
    pub normalize: bool,
    /// Tie-break ordering within a tier.
    #[serde(default)]
    pub priority: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// A rule that passed structural validation.
///
/// The only way to obtain one is through [`crate::rules::validate`], so the
/// engine never sees a fuzzy rule without an algorithm or an expression rule
/// without an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidRule(pub(crate) CorrelationRule);

impl ValidRule {
    pub fn into_inner(self) -> CorrelationRule {
        self.0
    }
}

impl Deref for ValidRule {
    type Target = CorrelationRule;

    fn deref(&self) -> &CorrelationRule {
        &self.0
    }
}

impl AsRef<CorrelationRule> for ValidRule {
    fn as_ref(&self) -> &CorrelationRule {
        &self.0
    }
}
