use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::validate_threshold;
use crate::error::MiningError;
use crate::mining::{FrequentItemsets, Itemset, TokenSet};

/// A directional association `antecedent -> consequent` from one frequent itemset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    pub antecedent: TokenSet,
    pub consequent: TokenSet,
    pub antecedent_support: f64,
    pub consequent_support: f64,
    /// Support of antecedent and consequent together.
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
    pub leverage: f64,
    /// `None` when confidence is 1 (conviction is unbounded).
    pub conviction: Option<f64>,
}

impl AssociationRule {
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AssociationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.antecedent, self.consequent)
    }
}

/// Rules of one mining run, ordered by lift then confidence, both descending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<AssociationRule>,
    pub transaction_count: usize,
    pub min_support: f64,
    pub min_confidence: f64,
}

impl RuleSet {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssociationRule> {
        self.rules.iter()
    }

    pub fn as_slice(&self) -> &[AssociationRule] {
        &self.rules
    }

    /// Wraps rules as given, without re-sorting.
    #[cfg(test)]
    pub(crate) fn from_rules_unchecked(rules: Vec<AssociationRule>) -> Self {
        Self {
            rules,
            ..Default::default()
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a AssociationRule;
    type IntoIter = std::slice::Iter<'a, AssociationRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Every way of choosing `k` positions out of `n`, in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k == 0 || k > n {
        return out;
    }
    let mut current: Vec<usize> = (0..k).collect();
    loop {
        out.push(current.clone());
        // Rightmost position that can still advance.
        let Some(i) = (0..k).rev().find(|&i| current[i] < n - k + i) else {
            return out;
        };
        current[i] += 1;
        for j in i + 1..k {
            current[j] = current[j - 1] + 1;
        }
    }
}

fn lookup<'a>(frequent: &'a FrequentItemsets, items: &TokenSet) -> Result<&'a Itemset, MiningError> {
    let itemset = frequent.get(items).ok_or_else(|| {
        MiningError::Internal(format!("subset {} of a frequent itemset was not mined", items))
    })?;
    if itemset.count == 0 {
        return Err(MiningError::Internal(format!(
            "frequent itemset {} has zero support",
            items
        )));
    }
    Ok(itemset)
}

fn split_rule(
    frequent: &FrequentItemsets,
    union: &Itemset,
    antecedent: TokenSet,
) -> Result<AssociationRule, MiningError> {
    let consequent = union.items.difference(&antecedent);
    let antecedent_set = lookup(frequent, &antecedent)?;
    let consequent_set = lookup(frequent, &consequent)?;

    let n = frequent.transaction_count() as f64;
    let confidence = union.count as f64 / antecedent_set.count as f64;
    // Product of counts is symmetric in antecedent and consequent, so lift is too.
    let lift = (union.count as f64 * n) / (antecedent_set.count as f64 * consequent_set.count as f64);
    let leverage = union.support - antecedent_set.support * consequent_set.support;
    let conviction = if union.count == antecedent_set.count {
        None
    } else {
        Some((1.0 - consequent_set.support) / (1.0 - confidence))
    };

    Ok(AssociationRule {
        antecedent,
        consequent,
        antecedent_support: antecedent_set.support,
        consequent_support: consequent_set.support,
        support: union.support,
        confidence,
        lift,
        leverage,
        conviction,
    })
}

/// Derives every rule with confidence at least `min_confidence` from `frequent`.
///
/// Itemsets are visited in canonical order and antecedents by size, then
/// lexicographically. The final sort is stable, so rules with equal lift and
/// confidence keep that generation order.
pub fn generate_rules(frequent: &FrequentItemsets, min_confidence: f64) -> Result<RuleSet, MiningError> {
    validate_threshold("min_confidence", min_confidence)?;
    info!("Generating rules with min_confidence={}...", min_confidence);

    let mut rules = Vec::new();
    for itemset in frequent.iter().filter(|itemset| itemset.items.len() >= 2) {
        let tokens = itemset.items.as_slice();
        for size in 1..tokens.len() {
            for positions in combinations(tokens.len(), size) {
                let antecedent = TokenSet::from_sorted_unchecked(
                    positions.iter().map(|&p| tokens[p].clone()).collect(),
                );
                let rule = split_rule(frequent, itemset, antecedent)?;
                if rule.confidence >= min_confidence {
                    rules.push(rule);
                }
            }
        }
    }

    rules.sort_by(|a, b| {
        b.lift
            .total_cmp(&a.lift)
            .then_with(|| b.confidence.total_cmp(&a.confidence))
    });
    info!("Generated {} rules.", rules.len());

    Ok(RuleSet {
        rules,
        transaction_count: frequent.transaction_count(),
        min_support: frequent.min_support(),
        min_confidence,
    })
}
