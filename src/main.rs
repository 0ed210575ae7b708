use anyhow::{Context, Result};
use env_logger::Env;
use log::info;
use rayon::prelude::*;
use std::path::Path;

use flavor_alchemist::cli::{parse_args, Command};
use flavor_alchemist::dataset::load_recipe_table;
use flavor_alchemist::pipeline::{mine_batch, MiningOutcome};
use flavor_alchemist::recommend::{flavor_network, get_recommendations, Recommendation};
use flavor_alchemist::report;
use flavor_alchemist::transactions::{
    build_transactions, default_pantry, ingredient_vocabulary, DEFAULT_PANTRY_SEEDS,
};
use flavor_alchemist::{MiningConfig, TransactionBatch};

/// Mined rules, or `None` after telling the user which threshold to relax.
fn mine(batch: &TransactionBatch, config: &MiningConfig) -> Result<Option<MiningOutcome>> {
    let outcome = mine_batch(batch, config).context("Mining association rules failed")?;
    if let Some(hint) = report::status_hint(&outcome) {
        eprintln!("{}", hint);
        return Ok(None);
    }
    info!("Model ready! Discovered {} association rules.", outcome.rules.len());
    Ok(Some(outcome))
}

fn resolve_pantry(batch: &TransactionBatch, ingredients: Vec<String>) -> Vec<String> {
    if !ingredients.is_empty() {
        return ingredients;
    }
    let vocabulary = ingredient_vocabulary(&batch.transactions);
    default_pantry(&vocabulary, DEFAULT_PANTRY_SEEDS)
}

fn read_pantries(path: &Path) -> Result<Vec<Vec<String>>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pantry file '{}'", path.display()))?;
    Ok(content
        .lines()
        .map(|line| {
            line.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect::<Vec<String>>()
        })
        .filter(|pantry| !pantry.is_empty())
        .collect())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok(); // .env may carry FLAVOR_* settings
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = parse_args();
    let config = cli.mining_config();
    config.validate().context("Invalid mining thresholds")?;

    let table = load_recipe_table(&cli.dataset)
        .with_context(|| format!("Failed to load recipes from '{}'", cli.dataset.display()))?;
    let batch = build_transactions(&table).context("Reading ingredients failed")?;

    match cli.command {
        Command::Rules { limit, json } => {
            let Some(outcome) = mine(&batch, &config)? else {
                return Ok(());
            };
            if json {
                println!("{}", report::rules_json(&outcome.rules, limit)?);
            } else {
                print!("{}", report::rules_text(&outcome.rules, limit));
            }
        }
        Command::Recommend {
            ingredients,
            top_k,
            json,
        } => {
            let pantry = resolve_pantry(&batch, ingredients);
            let Some(outcome) = mine(&batch, &config)? else {
                return Ok(());
            };
            let recommendations = get_recommendations(&outcome.rules, &pantry, top_k);
            if json {
                println!("{}", report::recommendations_json(&recommendations)?);
            } else {
                print!("{}", report::recommendations_text(&pantry, &recommendations));
            }
        }
        Command::Batch { pantries, top_k } => {
            let pantries = read_pantries(&pantries)?;
            let Some(outcome) = mine(&batch, &config)? else {
                return Ok(());
            };
            // Queries only read the frozen rule set, so they can run side by side.
            let answers: Vec<Vec<Recommendation>> = pantries
                .par_iter()
                .map(|pantry| get_recommendations(&outcome.rules, pantry, top_k))
                .collect();
            for (pantry, recommendations) in pantries.iter().zip(&answers) {
                print!("{}", report::recommendations_text(pantry, recommendations));
            }
        }
        Command::Vocab { contains } => {
            let vocabulary = ingredient_vocabulary(&batch.transactions);
            let needle = contains.map(|text| text.to_lowercase());
            for token in vocabulary
                .iter()
                .filter(|token| needle.as_deref().map_or(true, |n| token.contains(n)))
            {
                println!("{}", token);
            }
        }
        Command::Network { ingredients, limit } => {
            let pantry = resolve_pantry(&batch, ingredients);
            let Some(outcome) = mine(&batch, &config)? else {
                return Ok(());
            };
            let network = flavor_network(&outcome.rules, &pantry, limit);
            print!("{}", report::network_text(&network));
        }
    }

    Ok(())
}
