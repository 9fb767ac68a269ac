use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::ValidationError;

/// Decision thresholds for one scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Aggregate score at or above which a candidate auto-confirms. [0.0, 1.0].
    pub auto_confirm_threshold: f64,
    /// Aggregate score at or above which a candidate goes to review. [0.0, 1.0].
    pub manual_review_threshold: f64,
    /// When true, decisions are computed and logged but nothing is committed.
    pub tuning_mode: bool,
    /// Whether deactivated source records are eligible for correlation.
    pub include_deactivated: bool,
    /// How many pairs a batch run materializes per chunk. [1, 10000].
    pub batch_size: usize,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            auto_confirm_threshold: constants::DEFAULT_AUTO_CONFIRM_THRESHOLD,
            manual_review_threshold: constants::DEFAULT_MANUAL_REVIEW_THRESHOLD,
            tuning_mode: false,
            include_deactivated: false,
            batch_size: constants::DEFAULT_BATCH_SIZE,
        }
    }
}

impl ThresholdConfig {
    /// Cross-field validation.
    ///
    /// Confirming automatically must never be easier than flagging for
    /// review, so `auto_confirm_threshold >= manual_review_threshold`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.auto_confirm_threshold) {
            return Err(ValidationError::OutOfRange {
                field: "auto_confirm_threshold",
                allowed: "0.0..=1.0",
            });
        }
        if !(0.0..=1.0).contains(&self.manual_review_threshold) {
            return Err(ValidationError::OutOfRange {
                field: "manual_review_threshold",
                allowed: "0.0..=1.0",
            });
        }
        if self.auto_confirm_threshold < self.manual_review_threshold {
            return Err(ValidationError::OutOfRange {
                field: "auto_confirm_threshold",
                allowed: "must be >= manual_review_threshold",
            });
        }
        if !(constants::MIN_BATCH_SIZE..=constants::MAX_BATCH_SIZE).contains(&self.batch_size) {
            return Err(ValidationError::OutOfRange {
                field: "batch_size",
                allowed: "1..=10000",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ThresholdConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_auto_below_manual() {
        let config = ThresholdConfig {
            auto_confirm_threshold: 0.5,
            manual_review_threshold: 0.8,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field(), "auto_confirm_threshold");
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let config = ThresholdConfig {
            auto_confirm_threshold: 1.2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_batch_size() {
        let config = ThresholdConfig {
            batch_size: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field(), "batch_size");
    }
}
