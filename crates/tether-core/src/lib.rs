//! # tether-core
//!
//! Foundation crate for the Tether identity correlation engine.
//! Defines all shared models, rule and threshold validation, the error
//! taxonomy, constants, and the storage trait.
//! Every other crate in the workspace depends on this.

pub mod constants;
pub mod errors;
pub mod models;
pub mod rules;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use errors::{TetherError, TetherResult};
pub use models::candidate::{AggregateScore, Decision, MatchCandidate, RuleHit};
pub use models::case::{CaseResolution, CaseStatus, CorrelationCase};
pub use models::link::IdentityLink;
pub use models::page::Page;
pub use models::record::{Record, RecordRef, RecordSource};
pub use models::report::{
    BatchOutcome, DecisionChange, DecisionCounts, PairError, SimulationReport,
};
pub use models::rule::{
    AttributeSelector, CorrelationRule, FuzzyAlgorithm, MatchType, RuleScope, ValidRule,
};
pub use models::threshold::ThresholdConfig;
