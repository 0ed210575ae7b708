use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MiningError;

pub const DEFAULT_MIN_SUPPORT: f64 = 0.05;
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.1;

/// Frequent-itemset algorithm. Both produce identical results for the same input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MiningAlgorithm {
    #[default]
    FpGrowth,
    Apriori,
}

impl fmt::Display for MiningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiningAlgorithm::FpGrowth => write!(f, "FP-Growth"),
            MiningAlgorithm::Apriori => write!(f, "Apriori"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningConfig {
    pub min_support: f64,
    pub min_confidence: f64,
    pub algorithm: MiningAlgorithm,
    /// Largest itemset size to mine. `None` mines itemsets of any size.
    pub max_len: Option<usize>,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            algorithm: MiningAlgorithm::default(),
            max_len: None,
        }
    }
}

impl MiningConfig {
    pub fn new(min_support: f64, min_confidence: f64) -> Self {
        Self {
            min_support,
            min_confidence,
            ..Default::default()
        }
    }

    pub fn with_algorithm(mut self, algorithm: MiningAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_max_len(mut self, max_len: Option<usize>) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn validate(&self) -> Result<(), MiningError> {
        validate_threshold("min_support", self.min_support)?;
        validate_threshold("min_confidence", self.min_confidence)?;
        if self.max_len == Some(0) {
            return Err(MiningError::InvalidConfig(
                "max_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Thresholds live in (0, 1]. NaN fails both comparisons and is rejected too.
pub(crate) fn validate_threshold(name: &'static str, value: f64) -> Result<(), MiningError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(MiningError::InvalidThreshold { name, value })
    }
}
