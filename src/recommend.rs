use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::mining::TokenSet;
use crate::rules::RuleSet;
use crate::transactions::normalize_query_token;

pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_NETWORK_RULES: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item: String,
    pub confidence: f64,
    pub lift: f64,
    /// The originating rule, e.g. `{chicken} -> {garlic, onion}`.
    pub rule: String,
}

fn pantry_set<S: AsRef<str>>(ingredients: &[S]) -> TokenSet {
    ingredients
        .iter()
        .map(|ingredient| normalize_query_token(ingredient.as_ref()))
        .collect()
}

/// Suggests up to `top_k` ingredients to pair with `ingredients`.
///
/// A rule is relevant when its antecedent shares any token with the pantry.
/// Each relevant rule contributes its consequent tokens not already in the
/// pantry; the first (strongest) rule proposing a token wins. The survivors
/// are ordered by lift, descending, with ties left in rule order.
pub fn get_recommendations<S: AsRef<str>>(
    rules: &RuleSet,
    ingredients: &[S],
    top_k: usize,
) -> Vec<Recommendation> {
    if rules.is_empty() || top_k == 0 {
        return Vec::new();
    }
    let pantry = pantry_set(ingredients);

    let mut seen: HashSet<&str> = HashSet::new();
    let mut suggestions = Vec::new();
    for rule in rules.iter().filter(|rule| rule.antecedent.intersects(&pantry)) {
        for item in &rule.consequent {
            if pantry.contains(item) || !seen.insert(item.as_str()) {
                continue;
            }
            suggestions.push(Recommendation {
                item: item.clone(),
                confidence: rule.confidence,
                lift: rule.lift,
                rule: rule.description(),
            });
        }
    }

    suggestions.sort_by(|a, b| b.lift.total_cmp(&a.lift));
    suggestions.truncate(top_k);
    suggestions
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlavorEdge {
    pub source: String,
    pub target: String,
    /// Lift of the rule that last contributed this edge.
    pub weight: f64,
}

/// Directed ingredient graph drawn from the strongest rules touching a pantry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlavorNetwork {
    pub edges: Vec<FlavorEdge>,
}

impl FlavorNetwork {
    pub fn nodes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .flat_map(|edge| [edge.source.as_str(), edge.target.as_str()])
            .filter(|node| seen.insert(*node))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Projects the first `max_rules` relevant rules into antecedent -> consequent edges.
///
/// An edge seen again keeps its position and takes the newer rule's lift as weight.
pub fn flavor_network<S: AsRef<str>>(rules: &RuleSet, ingredients: &[S], max_rules: usize) -> FlavorNetwork {
    let pantry = pantry_set(ingredients);
    let mut edges: Vec<FlavorEdge> = Vec::new();

    for rule in rules
        .iter()
        .filter(|rule| rule.antecedent.intersects(&pantry))
        .take(max_rules)
    {
        for source in &rule.antecedent {
            for target in &rule.consequent {
                match edges
                    .iter_mut()
                    .find(|edge| &edge.source == source && &edge.target == target)
                {
                    Some(edge) => edge.weight = rule.lift,
                    None => edges.push(FlavorEdge {
                        source: source.clone(),
                        target: target.clone(),
                        weight: rule.lift,
                    }),
                }
            }
        }
    }
    FlavorNetwork { edges }
}
