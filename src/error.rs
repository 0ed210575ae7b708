use thiserror::Error;

/// Failures that abort a mining run.
///
/// Per-record parse problems never show up here: a malformed ingredient field
/// degrades to an empty item list and the record is dropped. Thresholds that
/// are merely too strict are not errors either, see `MiningStatus`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MiningError {
    /// Neither supported ingredient field exists in the input table.
    #[error(
        "no ingredient field found (expected 'RecipeIngredientParts' or 'Ingredients'); available fields: {observed:?}"
    )]
    Schema { observed: Vec<String> },

    /// Cleaning left nothing to mine.
    #[error("no valid transactions after cleaning ({records_seen} records seen)")]
    EmptyCorpus { records_seen: usize },

    #[error("{name} must be in (0, 1], got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("invalid mining configuration: {0}")]
    InvalidConfig(String),

    /// An invariant of the mining pipeline was broken. Indicates a bug, not bad input.
    #[error("internal mining error: {0}")]
    Internal(String),
}

impl MiningError {
    /// True for errors caused by the data itself rather than by the caller's settings.
    pub fn is_data_error(&self) -> bool {
        matches!(self, MiningError::Schema { .. } | MiningError::EmptyCorpus { .. })
    }
}
