//! Text and JSON rendering for the command-line output.
//!
//! Everything here returns a `String` so stdout carries exactly the rendered
//! result; status messages go through the logger instead.

use std::fmt::Write;

use crate::pipeline::{MiningOutcome, MiningStatus};
use crate::recommend::{FlavorNetwork, Recommendation};
use crate::rules::{AssociationRule, RuleSet};

fn top_rules(rules: &RuleSet, limit: usize) -> Vec<&AssociationRule> {
    rules.iter().take(limit).collect()
}

pub fn rules_json(rules: &RuleSet, limit: usize) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&top_rules(rules, limit))
}

pub fn rules_text(rules: &RuleSet, limit: usize) -> String {
    let mut out = String::new();
    for rule in top_rules(rules, limit) {
        let _ = writeln!(
            out,
            "{}  support={:.4} confidence={:.3} lift={:.3}",
            rule, rule.support, rule.confidence, rule.lift
        );
    }
    out
}

pub fn recommendations_json(recommendations: &[Recommendation]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(recommendations)
}

pub fn recommendations_text(pantry: &[String], recommendations: &[Recommendation]) -> String {
    if recommendations.is_empty() {
        return format!(
            "No strong associations found for {:?}. Try common ingredients!\n",
            pantry
        );
    }
    let mut out = format!("\nMagic pairings for {:?}:\n", pantry);
    for recommendation in recommendations {
        let _ = writeln!(
            out,
            "- {} (Lift: {:.2}, Confidence: {:.2})  via {}",
            recommendation.item, recommendation.lift, recommendation.confidence, recommendation.rule
        );
    }
    out
}

pub fn network_text(network: &FlavorNetwork) -> String {
    if network.is_empty() {
        return "No network to display.\n".to_string();
    }
    let mut out = String::new();
    for edge in &network.edges {
        let _ = writeln!(out, "{} -> {} (lift {:.2})", edge.source, edge.target, edge.weight);
    }
    out
}

/// Advice on which threshold to relax, `None` when rules were found.
pub fn status_hint(outcome: &MiningOutcome) -> Option<String> {
    match outcome.status {
        MiningStatus::Ready => None,
        MiningStatus::NoFrequentItemsets => Some(format!(
            "No ingredient combination reaches min_support={} across {} recipes. Try lowering --min-support.",
            outcome.config.min_support, outcome.transaction_count
        )),
        MiningStatus::NoRules => Some(format!(
            "{} frequent itemsets found but no rule reaches min_confidence={}. Try lowering --min-confidence.",
            outcome.frequent_itemset_count, outcome.config.min_confidence
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MiningConfig;
    use crate::dataset::RecipeTable;
    use crate::pipeline::mine_rules;
    use crate::recommend::{flavor_network, get_recommendations};
    use anyhow::Result;

    fn outcome(min_support: f64, min_confidence: f64) -> Result<MiningOutcome> {
        let table = RecipeTable::from_rows(
            ["Ingredients"],
            [
                ["['chicken', 'garlic']"],
                ["['chicken', 'garlic', 'lemon']"],
                ["['garlic', 'onion']"],
                ["['sugar', 'flour']"],
            ],
        );
        Ok(mine_rules(&table, &MiningConfig::new(min_support, min_confidence))?)
    }

    #[test]
    fn test_rules_json_is_a_bare_array() -> Result<()> {
        let outcome = outcome(0.5, 0.5)?;
        let json = rules_json(&outcome.rules, 20)?;
        assert!(json.starts_with('['));

        let parsed: Vec<AssociationRule> = serde_json::from_str(&json)?;
        let rendered: Vec<String> = parsed.iter().map(|rule| rule.to_string()).collect();
        let expected: Vec<String> = outcome.rules.iter().map(|rule| rule.to_string()).collect();
        assert_eq!(rendered, expected);

        let limited: Vec<AssociationRule> = serde_json::from_str(&rules_json(&outcome.rules, 1)?)?;
        assert_eq!(limited.len(), 1);
        Ok(())
    }

    #[test]
    fn test_recommendations_json_round_trips() -> Result<()> {
        let outcome = outcome(0.5, 0.5)?;
        let recommendations = get_recommendations(&outcome.rules, &["chicken"], 5);
        let json = recommendations_json(&recommendations)?;
        assert!(json.starts_with('['));
        let parsed: Vec<Recommendation> = serde_json::from_str(&json)?;
        assert_eq!(parsed.len(), recommendations.len());
        assert_eq!(parsed[0].item, "garlic");
        assert_eq!(parsed[0].rule, "{chicken} -> {garlic}");
        assert_eq!(recommendations_json(&[])?, "[]");
        Ok(())
    }

    #[test]
    fn test_text_rendering() -> Result<()> {
        let outcome = outcome(0.5, 0.5)?;
        let text = rules_text(&outcome.rules, 20);
        assert_eq!(text.lines().count(), outcome.rules.len());
        assert!(text.lines().all(|line| line.contains("lift=")));

        let pantry = vec!["chicken".to_string()];
        let recommendations = get_recommendations(&outcome.rules, &pantry, 5);
        let text = recommendations_text(&pantry, &recommendations);
        assert!(text.contains("- garlic (Lift: "));
        assert!(recommendations_text(&pantry, &[]).starts_with("No strong associations"));

        let network = flavor_network(&outcome.rules, &pantry, 20);
        assert!(network_text(&network).contains("chicken -> garlic"));
        assert_eq!(network_text(&FlavorNetwork::default()), "No network to display.\n");
        Ok(())
    }

    #[test]
    fn test_status_hint_names_the_threshold() -> Result<()> {
        assert_eq!(status_hint(&outcome(0.5, 0.5)?), None);
        let hint = status_hint(&outcome(0.8, 0.5)?).expect("no frequent itemsets");
        assert!(hint.contains("--min-support"));

        // Both singletons pass 0.6 but the pair does not.
        let table = RecipeTable::from_rows(
            ["Ingredients"],
            [["['salt']"], ["['pepper']"], ["['salt', 'pepper']"]],
        );
        let no_rules = mine_rules(&table, &MiningConfig::new(0.6, 0.1))?;
        let hint = status_hint(&no_rules).expect("no rules");
        assert!(hint.starts_with("2 frequent itemsets"));
        assert!(hint.contains("--min-confidence"));
        Ok(())
    }
}
