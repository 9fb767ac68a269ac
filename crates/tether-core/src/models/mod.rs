pub mod candidate;
pub mod case;
pub mod link;
pub mod page;
pub mod record;
pub mod report;
pub mod rule;
pub mod threshold;

pub use candidate::{AggregateScore, Decision, MatchCandidate, RuleHit};
pub use case::{CaseResolution, CaseStatus, CorrelationCase};
pub use link::IdentityLink;
pub use page::Page;
pub use record::{Record, RecordRef, RecordSource};
pub use report::{BatchOutcome, DecisionChange, DecisionCounts, PairError, SimulationReport};
pub use rule::{AttributeSelector, CorrelationRule, FuzzyAlgorithm, MatchType, RuleScope, ValidRule};
pub use threshold::ThresholdConfig;
