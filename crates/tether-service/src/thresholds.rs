//! Threshold config management, one config per scope.

use std::sync::Arc;

use tracing::info;

use tether_core::errors::TetherResult;
use tether_core::traits::CorrelationStore;
use tether_core::{RuleScope, ThresholdConfig};

pub struct ThresholdService<S: CorrelationStore> {
    store: Arc<S>,
}

impl<S: CorrelationStore> ThresholdService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validate and persist a scope's threshold config.
    pub fn upsert(&self, scope: &RuleScope, config: ThresholdConfig) -> TetherResult<ThresholdConfig> {
        config.validate()?;
        self.store.upsert_threshold(scope, &config)?;
        info!(
            scope = %scope,
            auto_confirm = config.auto_confirm_threshold,
            manual_review = config.manual_review_threshold,
            tuning_mode = config.tuning_mode,
            "threshold config updated"
        );
        Ok(config)
    }

    pub fn get(&self, scope: &RuleScope) -> TetherResult<Option<ThresholdConfig>> {
        self.store.get_threshold(scope)
    }

    /// The config runs actually use: the stored one, or defaults when the
    /// scope has never been configured.
    pub fn effective(&self, scope: &RuleScope) -> TetherResult<ThresholdConfig> {
        Ok(self.store.get_threshold(scope)?.unwrap_or_default())
    }
}
