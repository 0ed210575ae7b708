use log::info;
use serde::Serialize;

use crate::config::MiningConfig;
use crate::dataset::RecipeTable;
use crate::error::MiningError;
use crate::mining::mine_frequent_itemsets;
use crate::rules::{generate_rules, RuleSet};
use crate::transactions::{build_transactions, TransactionBatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MiningStatus {
    Ready,
    /// No itemset reached `min_support`; lowering it may help.
    NoFrequentItemsets,
    /// Itemsets were found but no rule reached `min_confidence`.
    NoRules,
}

/// Result of one mining run. `rules` is empty unless `status` is `Ready`.
#[derive(Debug, Clone, Serialize)]
pub struct MiningOutcome {
    pub status: MiningStatus,
    pub rules: RuleSet,
    pub transaction_count: usize,
    pub frequent_itemset_count: usize,
    pub config: MiningConfig,
}

impl MiningOutcome {
    pub fn is_ready(&self) -> bool {
        self.status == MiningStatus::Ready
    }
}

/// Mines association rules from a recipe table.
///
/// Fails on a table without an ingredient field or when cleaning leaves no
/// transactions. Thresholds that nothing satisfies give an outcome with an
/// empty rule set and a status telling which threshold to relax.
pub fn mine_rules(table: &RecipeTable, config: &MiningConfig) -> Result<MiningOutcome, MiningError> {
    config.validate()?;

    info!("Loading and cleaning data...");
    let batch = build_transactions(table)?;
    mine_batch(&batch, config)
}

/// Mines association rules from transactions that were already built.
///
/// Lets a caller that also needs the batch (for the vocabulary, say) clean the
/// table only once. Fails with `EmptyCorpus` when the batch holds no transactions.
pub fn mine_batch(batch: &TransactionBatch, config: &MiningConfig) -> Result<MiningOutcome, MiningError> {
    config.validate()?;
    if batch.is_empty() {
        return Err(MiningError::EmptyCorpus {
            records_seen: batch.records_seen(),
        });
    }
    info!("Encoding {} transactions...", batch.len());

    let frequent = mine_frequent_itemsets(&batch.transactions, config)?;
    if frequent.is_empty() {
        return Ok(MiningOutcome {
            status: MiningStatus::NoFrequentItemsets,
            rules: RuleSet::default(),
            transaction_count: batch.len(),
            frequent_itemset_count: 0,
            config: config.clone(),
        });
    }

    let rules = generate_rules(&frequent, config.min_confidence)?;
    let status = if rules.is_empty() {
        MiningStatus::NoRules
    } else {
        MiningStatus::Ready
    };
    Ok(MiningOutcome {
        status,
        rules,
        transaction_count: batch.len(),
        frequent_itemset_count: frequent.len(),
        config: config.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MiningAlgorithm;
    use crate::recommend::get_recommendations;
    use anyhow::Result;

    fn pantry_table() -> RecipeTable {
        RecipeTable::from_rows(
            ["Name", "RecipeIngredientParts"],
            [
                ["A", r#"c("Chicken", "Garlic", "Lemon")"#],
                ["B", r#"c("chicken", "garlic")"#],
                ["C", r#"c("chicken", "garlic", "onion")"#],
                ["D", r#"c("sugar", "flour")"#],
                ["E", "NA"],
                ["F", "garbage"],
            ],
        )
    }

    #[test]
    fn test_mine_rules_ready() -> Result<()> {
        let outcome = mine_rules(&pantry_table(), &MiningConfig::new(0.5, 0.5))?;
        assert_eq!(outcome.status, MiningStatus::Ready);
        assert!(outcome.is_ready());
        assert_eq!(outcome.transaction_count, 4);
        // {chicken}, {garlic}, {chicken, garlic}
        assert_eq!(outcome.frequent_itemset_count, 3);
        let rendered: Vec<String> = outcome.rules.iter().map(|r| r.to_string()).collect();
        assert_eq!(rendered, vec!["{chicken} -> {garlic}", "{garlic} -> {chicken}"]);

        let recommendations = get_recommendations(&outcome.rules, &["Chicken"], 5);
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].item, "garlic");
        assert_eq!(recommendations[0].rule, "{chicken} -> {garlic}");
        Ok(())
    }

    #[test]
    fn test_no_frequent_itemsets_is_not_an_error() -> Result<()> {
        let outcome = mine_rules(&pantry_table(), &MiningConfig::new(0.9, 0.5))?;
        assert_eq!(outcome.status, MiningStatus::NoFrequentItemsets);
        assert!(outcome.rules.is_empty());
        assert!(get_recommendations(&outcome.rules, &["chicken"], 5).is_empty());
        Ok(())
    }

    #[test]
    fn test_no_rules_is_not_an_error() -> Result<()> {
        let table = RecipeTable::from_rows(
            ["Ingredients"],
            [["['salt']"], ["['pepper']"], ["['salt', 'pepper']"]],
        );
        // Singletons are frequent at 0.6 but the pair is not.
        let outcome = mine_rules(&table, &MiningConfig::new(0.6, 0.1))?;
        assert_eq!(outcome.status, MiningStatus::NoRules);
        assert_eq!(outcome.frequent_itemset_count, 2);
        assert!(outcome.rules.is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        let table = RecipeTable::from_rows(["Ingredients"], [["[]"], ["nan"], ["['42']"]]);
        let err = mine_rules(&table, &MiningConfig::default()).unwrap_err();
        assert_eq!(err, MiningError::EmptyCorpus { records_seen: 3 });
        assert!(err.is_data_error());
    }

    #[test]
    fn test_mine_batch_matches_mine_rules() -> Result<()> {
        let table = pantry_table();
        let config = MiningConfig::new(0.5, 0.5);
        let batch = build_transactions(&table)?;
        let from_batch = mine_batch(&batch, &config)?;
        let from_table = mine_rules(&table, &config)?;
        assert_eq!(from_batch.rules, from_table.rules);
        assert_eq!(from_batch.transaction_count, from_table.transaction_count);

        let empty = build_transactions(&RecipeTable::from_rows(["Ingredients"], [["nan"], ["[]"]]))?;
        assert_eq!(
            mine_batch(&empty, &config).unwrap_err(),
            MiningError::EmptyCorpus { records_seen: 2 }
        );
        Ok(())
    }

    #[test]
    fn test_schema_error_propagates() {
        let table = RecipeTable::from_rows(["title"], [["x"]]);
        let err = mine_rules(&table, &MiningConfig::default()).unwrap_err();
        assert!(matches!(err, MiningError::Schema { .. }));
    }

    #[test]
    fn test_invalid_config_rejected_before_work() {
        let table = RecipeTable::from_rows(["title"], [["x"]]);
        let err = mine_rules(&table, &MiningConfig::new(0.5, 2.0)).unwrap_err();
        assert!(matches!(err, MiningError::InvalidThreshold { name: "min_confidence", .. }));
    }

    #[test]
    fn test_algorithms_yield_same_rules() -> Result<()> {
        let fp = mine_rules(&pantry_table(), &MiningConfig::new(0.25, 0.2))?;
        let ap = mine_rules(
            &pantry_table(),
            &MiningConfig::new(0.25, 0.2).with_algorithm(MiningAlgorithm::Apriori),
        )?;
        assert_eq!(fp.rules, ap.rules);
        Ok(())
    }
}
