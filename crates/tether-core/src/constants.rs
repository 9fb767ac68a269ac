//! Numeric bounds and defaults shared across the workspace.

/// Maximum length for rule names and attribute names.
pub const MAX_NAME_LEN: usize = 256;

/// Maximum length for a match expression source string.
pub const MAX_EXPRESSION_LEN: usize = 2048;

/// Maximum rule tier. Tiers are priority bands starting at 1.
pub const MAX_TIER: u32 = 100;

/// Maximum per-rule weight.
pub const MAX_WEIGHT: f64 = 1000.0;

/// Batch size bounds for correlation and tuning runs.
pub const MIN_BATCH_SIZE: usize = 1;
pub const MAX_BATCH_SIZE: usize = 10_000;
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Default decision thresholds.
pub const DEFAULT_AUTO_CONFIRM_THRESHOLD: f64 = 0.9;
pub const DEFAULT_MANUAL_REVIEW_THRESHOLD: f64 = 0.5;

/// Case listing pagination bounds.
pub const DEFAULT_PAGE_LIMIT: usize = 50;
pub const MAX_PAGE_LIMIT: usize = 200;
