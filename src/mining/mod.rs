pub mod apriori;
pub mod fp_growth;
pub mod itemset;
pub mod token_set;

pub use itemset::{FrequentItemsets, Itemset};
pub use token_set::TokenSet;

use log::info;
use std::collections::HashMap;

use crate::config::{validate_threshold, MiningAlgorithm, MiningConfig};
use crate::error::MiningError;

/// Dense id of an ingredient token. Ids follow lexicographic token order.
pub(crate) type ItemId = u32;

/// A mined itemset before decoding: sorted item ids plus absolute count.
pub(crate) type RawItemset = (Vec<ItemId>, usize);

pub(crate) fn support(count: usize, transaction_count: usize) -> f64 {
    count as f64 / transaction_count as f64
}

/// The single frequency test shared by every miner.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SupportThreshold {
    min_support: f64,
    transaction_count: usize,
}

impl SupportThreshold {
    pub(crate) fn new(min_support: f64, transaction_count: usize) -> Self {
        Self {
            min_support,
            transaction_count,
        }
    }

    pub(crate) fn is_frequent(&self, count: usize) -> bool {
        count > 0 && support(count, self.transaction_count) >= self.min_support
    }
}

/// Transactions re-expressed as sorted id vectors over a shared vocabulary.
pub(crate) struct EncodedCorpus {
    vocabulary: Vec<String>,
    transactions: Vec<Vec<ItemId>>,
}

impl EncodedCorpus {
    pub(crate) fn encode(transactions: &[TokenSet]) -> Self {
        let mut vocabulary: Vec<String> = transactions
            .iter()
            .flat_map(|transaction| transaction.iter().cloned())
            .collect();
        vocabulary.sort_unstable();
        vocabulary.dedup();

        let encoded = {
            let ids: HashMap<&str, ItemId> = vocabulary
                .iter()
                .enumerate()
                .map(|(id, token)| (token.as_str(), id as ItemId))
                .collect();
            // Token sets are sorted and ids are monotone in token order, so each row stays sorted.
            transactions
                .iter()
                .map(|transaction| {
                    transaction
                        .iter()
                        .map(|token| ids[token.as_str()])
                        .collect::<Vec<ItemId>>()
                })
                .collect()
        };

        Self {
            vocabulary,
            transactions: encoded,
        }
    }

    pub(crate) fn transactions(&self) -> &[Vec<ItemId>] {
        &self.transactions
    }

    pub(crate) fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    fn decode(&self, raw: RawItemset) -> Itemset {
        let (mut ids, count) = raw;
        ids.sort_unstable();
        let tokens = ids
            .into_iter()
            .map(|id| self.vocabulary[id as usize].clone())
            .collect();
        Itemset {
            items: TokenSet::from_sorted_unchecked(tokens),
            count,
            support: support(count, self.transactions.len()),
        }
    }
}

/// Finds every itemset whose support reaches `config.min_support`.
///
/// An empty transaction list (or a threshold nothing meets) gives an empty
/// result, not an error. The output is identical for both algorithms.
pub fn mine_frequent_itemsets(
    transactions: &[TokenSet],
    config: &MiningConfig,
) -> Result<FrequentItemsets, MiningError> {
    validate_threshold("min_support", config.min_support)?;
    if config.max_len == Some(0) {
        return Err(MiningError::InvalidConfig(
            "max_len must be at least 1".to_string(),
        ));
    }

    let corpus = EncodedCorpus::encode(transactions);
    let threshold = SupportThreshold::new(config.min_support, transactions.len());
    info!(
        "Running {} with min_support={} over {} transactions ({} distinct ingredients)...",
        config.algorithm,
        config.min_support,
        transactions.len(),
        corpus.vocabulary_len()
    );

    let raw = match config.algorithm {
        MiningAlgorithm::FpGrowth => fp_growth::mine(&corpus, threshold, config.max_len),
        MiningAlgorithm::Apriori => apriori::mine(&corpus, threshold, config.max_len),
    };

    let itemsets = raw.into_iter().map(|r| corpus.decode(r)).collect();
    let frequent = FrequentItemsets::new(transactions.len(), config.min_support, itemsets);
    info!("Found {} frequent itemsets.", frequent.len());
    Ok(frequent)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::TokenSet;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    pub(crate) fn transactions(rows: &[&[&str]]) -> Vec<TokenSet> {
        rows.iter().map(|row| TokenSet::new(row.iter().copied())).collect()
    }

    /// Skewed random baskets so that both common and rare combinations occur.
    pub(crate) fn random_transactions(seed: u64, count: usize, vocabulary: usize) -> Vec<TokenSet> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                let size = rng.gen_range(1..=6);
                TokenSet::new((0..size).map(|_| {
                    let a = rng.gen_range(0..vocabulary);
                    let b = rng.gen_range(0..vocabulary);
                    format!("item{:02}", a.min(b))
                }))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{random_transactions, transactions};
    use super::*;
    use anyhow::Result;

    fn brute_force_count(transactions: &[TokenSet], items: &TokenSet) -> usize {
        transactions.iter().filter(|t| items.is_subset(t)).count()
    }

    #[test]
    fn test_small_corpus_scenario() -> Result<()> {
        let corpus = transactions(&[&["a", "b"], &["a", "b"], &["a", "c"], &["b", "c"]]);
        for algorithm in [MiningAlgorithm::FpGrowth, MiningAlgorithm::Apriori] {
            let config = MiningConfig::new(0.5, 0.5).with_algorithm(algorithm);
            let frequent = mine_frequent_itemsets(&corpus, &config)?;

            let rendered: Vec<String> = frequent.iter().map(|i| i.items.to_string()).collect();
            assert_eq!(rendered, vec!["{a}", "{b}", "{c}", "{a, b}"], "{}", algorithm);
            assert_eq!(frequent.support_of(&TokenSet::new(["a"])), Some(0.75));
            assert_eq!(frequent.support_of(&TokenSet::new(["c"])), Some(0.5));
            assert_eq!(frequent.support_of(&TokenSet::new(["a", "b"])), Some(0.5));
            assert_eq!(frequent.support_of(&TokenSet::new(["a", "c"])), None);
            assert_eq!(frequent.support_of(&TokenSet::new(["b", "c"])), None);
        }
        Ok(())
    }

    #[test]
    fn test_empty_transactions_give_empty_result() -> Result<()> {
        let frequent = mine_frequent_itemsets(&[], &MiningConfig::new(0.1, 0.1))?;
        assert!(frequent.is_empty());
        assert_eq!(frequent.transaction_count(), 0);
        assert_eq!(frequent.max_len(), 0);
        Ok(())
    }

    #[test]
    fn test_threshold_nothing_meets_is_empty_not_error() -> Result<()> {
        let corpus = transactions(&[&["a"], &["b"], &["c"]]);
        let frequent = mine_frequent_itemsets(&corpus, &MiningConfig::new(0.9, 0.1))?;
        assert!(frequent.is_empty());
        Ok(())
    }

    #[test]
    fn test_invalid_support_is_rejected() {
        let corpus = transactions(&[&["a"]]);
        let result = mine_frequent_itemsets(&corpus, &MiningConfig::new(0.0, 0.1));
        assert!(matches!(result, Err(MiningError::InvalidThreshold { .. })));
    }

    #[test]
    fn test_max_len_caps_itemset_size() -> Result<()> {
        let corpus = transactions(&[&["a", "b", "c"], &["a", "b", "c"], &["a", "b"]]);
        for algorithm in [MiningAlgorithm::FpGrowth, MiningAlgorithm::Apriori] {
            let unbounded = mine_frequent_itemsets(
                &corpus,
                &MiningConfig::new(0.5, 0.1).with_algorithm(algorithm),
            )?;
            assert_eq!(unbounded.max_len(), 3);
            let capped = mine_frequent_itemsets(
                &corpus,
                &MiningConfig::new(0.5, 0.1)
                    .with_algorithm(algorithm)
                    .with_max_len(Some(2)),
            )?;
            assert_eq!(capped.max_len(), 2);
            assert_eq!(capped.len(), unbounded.len() - 1);
        }
        Ok(())
    }

    #[test]
    fn test_algorithms_agree_on_random_corpora() -> Result<()> {
        for seed in 0..8 {
            let corpus = random_transactions(seed, 300, 25);
            for min_support in [0.02, 0.05, 0.2] {
                let fp = mine_frequent_itemsets(&corpus, &MiningConfig::new(min_support, 0.1))?;
                let ap = mine_frequent_itemsets(
                    &corpus,
                    &MiningConfig::new(min_support, 0.1).with_algorithm(MiningAlgorithm::Apriori),
                )?;
                let fp_sets: Vec<&Itemset> = fp.iter().collect();
                let ap_sets: Vec<&Itemset> = ap.iter().collect();
                assert_eq!(fp_sets, ap_sets, "seed {} support {}", seed, min_support);
            }
        }
        Ok(())
    }

    #[test]
    fn test_supports_are_exact_and_antimonotone() -> Result<()> {
        let corpus = random_transactions(42, 400, 20);
        let frequent = mine_frequent_itemsets(&corpus, &MiningConfig::new(0.03, 0.1))?;
        assert!(!frequent.is_empty());

        for itemset in &frequent {
            let count = brute_force_count(&corpus, &itemset.items);
            assert_eq!(itemset.count, count);
            assert_eq!(itemset.support, count as f64 / corpus.len() as f64);
            assert!(itemset.support >= 0.03 && itemset.support <= 1.0);

            // Every immediate subset must be present with at least the same support.
            if itemset.items.len() > 1 {
                for dropped in itemset.items.iter() {
                    let subset = itemset.items.difference(&TokenSet::new([dropped.as_str()]));
                    let subset_support = frequent
                        .support_of(&subset)
                        .expect("subset of a frequent itemset must be frequent");
                    assert!(subset_support >= itemset.support);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_no_frequent_itemset_is_missed() -> Result<()> {
        let corpus = random_transactions(7, 200, 12);
        let frequent = mine_frequent_itemsets(&corpus, &MiningConfig::new(0.05, 0.1))?;
        let threshold = SupportThreshold::new(0.05, corpus.len());

        // Every frequent pair is reported.
        let vocabulary: Vec<String> = {
            let mut v: Vec<String> = corpus.iter().flat_map(|t| t.iter().cloned()).collect();
            v.sort();
            v.dedup();
            v
        };
        for (i, a) in vocabulary.iter().enumerate() {
            for b in &vocabulary[i + 1..] {
                let pair = TokenSet::new([a.as_str(), b.as_str()]);
                let count = brute_force_count(&corpus, &pair);
                assert_eq!(frequent.get(&pair).is_some(), threshold.is_frequent(count));
            }
        }
        Ok(())
    }

    #[test]
    fn test_mining_is_deterministic() -> Result<()> {
        let corpus = random_transactions(3, 250, 15);
        let config = MiningConfig::new(0.04, 0.1);
        let first = mine_frequent_itemsets(&corpus, &config)?;
        let second = mine_frequent_itemsets(&corpus, &config)?;
        let first: Vec<&Itemset> = first.iter().collect();
        let second: Vec<&Itemset> = second.iter().collect();
        assert_eq!(first, second);
        Ok(())
    }
}
