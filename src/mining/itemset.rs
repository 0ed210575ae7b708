use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::token_set::TokenSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itemset {
    pub items: TokenSet,
    /// Number of transactions containing every token of `items`.
    pub count: usize,
    pub support: f64,
}

/// All itemsets meeting a support threshold, in canonical order
/// (size ascending, then lexicographic).
#[derive(Debug, Clone, Default)]
pub struct FrequentItemsets {
    transaction_count: usize,
    min_support: f64,
    itemsets: Vec<Itemset>,
    index: HashMap<TokenSet, usize>,
}

impl FrequentItemsets {
    pub(crate) fn new(transaction_count: usize, min_support: f64, mut itemsets: Vec<Itemset>) -> Self {
        itemsets.sort_by(|a, b| a.items.canonical_cmp(&b.items));
        let index = itemsets
            .iter()
            .enumerate()
            .map(|(position, itemset)| (itemset.items.clone(), position))
            .collect();
        Self {
            transaction_count,
            min_support,
            itemsets,
            index,
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.transaction_count
    }

    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    pub fn len(&self) -> usize {
        self.itemsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Itemset> {
        self.itemsets.iter()
    }

    pub fn get(&self, items: &TokenSet) -> Option<&Itemset> {
        self.index.get(items).map(|&position| &self.itemsets[position])
    }

    pub fn support_of(&self, items: &TokenSet) -> Option<f64> {
        self.get(items).map(|itemset| itemset.support)
    }

    /// Size of the largest frequent itemset, 0 when empty.
    pub fn max_len(&self) -> usize {
        self.itemsets.last().map_or(0, |itemset| itemset.items.len())
    }
}

impl<'a> IntoIterator for &'a FrequentItemsets {
    type Item = &'a Itemset;
    type IntoIter = std::slice::Iter<'a, Itemset>;

    fn into_iter(self) -> Self::IntoIter {
        self.itemsets.iter()
    }
}
