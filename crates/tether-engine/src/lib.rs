//! # tether-engine
//!
//! The scoring pipeline: versioned rule snapshots feed the score
//! aggregator, the threshold policy classifies the result, and the batch
//! runner replays the whole thing side-effect-free for threshold tuning.
//!
//! Everything here is pure over immutable snapshots — the crate performs
//! no I/O and holds no shared mutable state, so candidate pairs can be
//! scored on independent worker threads.

pub mod aggregate;
pub mod batch;
pub mod pipeline;
pub mod policy;
pub mod snapshot;

pub use aggregate::aggregate;
pub use batch::{simulate, RecordPair};
pub use pipeline::correlate_pair;
pub use policy::decide;
pub use snapshot::{RuleSnapshot, SnapshotHandle};
