//! # tether-match
//!
//! The pluggable match strategies behind each correlation rule: exact
//! comparison, fuzzy similarity (Levenshtein, Jaro-Winkler), and the
//! restricted boolean expression language over `source`/`target` records.
//!
//! The variant set is closed and dispatched on the rule's `match_type` tag;
//! an unprepared expression can never reach evaluation because rules are
//! compiled into [`PreparedRule`]s up front.

pub mod evaluator;
pub mod exact;
pub mod expression;
pub mod fuzzy;

pub use evaluator::{PreparedRule, RuleScore};
pub use expression::CompiledExpression;
