use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::config::MiningConfig;
use crate::dataset::RecipeTable;
use crate::error::MiningError;
use crate::pipeline::{mine_rules, MiningOutcome};

/// Exact threshold identity of a mined rule set. Floats are compared by bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThresholdKey {
    min_support_bits: u64,
    min_confidence_bits: u64,
    max_len: Option<usize>,
}

impl ThresholdKey {
    pub fn new(config: &MiningConfig) -> Self {
        Self {
            min_support_bits: config.min_support.to_bits(),
            min_confidence_bits: config.min_confidence.to_bits(),
            max_len: config.max_len,
        }
    }

    pub fn min_support(&self) -> f64 {
        f64::from_bits(self.min_support_bits)
    }

    pub fn min_confidence(&self) -> f64 {
        f64::from_bits(self.min_confidence_bits)
    }
}

/// Memoized mining results, one immutable snapshot per threshold pair.
///
/// Readers get an `Arc` to a finished outcome and are never exposed to a
/// partially built one: a new snapshot replaces the old entry as a whole.
/// Nothing is evicted implicitly; call `invalidate` or `clear` to force re-mining.
#[derive(Debug, Default)]
pub struct RuleCache {
    entries: RwLock<HashMap<ThresholdKey, Arc<MiningOutcome>>>,
}

impl RuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, config: &MiningConfig) -> Option<Arc<MiningOutcome>> {
        let entries = self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.get(&ThresholdKey::new(config)).cloned()
    }

    /// Stores `outcome` under its own thresholds, replacing any previous snapshot.
    pub fn publish(&self, outcome: MiningOutcome) -> Arc<MiningOutcome> {
        let key = ThresholdKey::new(&outcome.config);
        let snapshot = Arc::new(outcome);
        let mut entries = self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(key, Arc::clone(&snapshot));
        snapshot
    }

    /// Returns the cached snapshot for `config`, mining and publishing one on a miss.
    ///
    /// Mining runs without holding the lock; concurrent misses for the same key
    /// may both mine, and the later result is the one kept.
    pub fn get_or_mine(
        &self,
        table: &RecipeTable,
        config: &MiningConfig,
    ) -> Result<Arc<MiningOutcome>, MiningError> {
        if let Some(snapshot) = self.get(config) {
            log::debug!(
                "Rule cache hit for min_support={} min_confidence={}",
                config.min_support,
                config.min_confidence
            );
            return Ok(snapshot);
        }
        let outcome = mine_rules(table, config)?;
        Ok(self.publish(outcome))
    }

    pub fn invalidate(&self, config: &MiningConfig) -> Option<Arc<MiningOutcome>> {
        let mut entries = self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.remove(&ThresholdKey::new(config))
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
