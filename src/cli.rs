use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{MiningAlgorithm, MiningConfig, DEFAULT_MIN_CONFIDENCE, DEFAULT_MIN_SUPPORT};
use crate::dataset::DEFAULT_DATASET_PATH;
use crate::recommend::{DEFAULT_NETWORK_RULES, DEFAULT_TOP_K};

#[derive(Parser, Debug)]
#[command(author, version, about = "Discover complementary ingredients from recipe co-occurrence", long_about = None)]
pub struct Cli {
    /// Path to the recipe CSV file
    #[arg(short, long, env = "FLAVOR_DATASET", default_value = DEFAULT_DATASET_PATH)]
    pub dataset: PathBuf,

    /// Minimum fraction of recipes an ingredient combination must appear in
    #[arg(long, env = "FLAVOR_MIN_SUPPORT", default_value_t = DEFAULT_MIN_SUPPORT)]
    pub min_support: f64,

    /// Minimum confidence for a rule to be kept
    #[arg(long, env = "FLAVOR_MIN_CONFIDENCE", default_value_t = DEFAULT_MIN_CONFIDENCE)]
    pub min_confidence: f64,

    #[arg(long, value_enum, default_value_t = MiningAlgorithm::FpGrowth)]
    pub algorithm: MiningAlgorithm,

    /// Largest ingredient combination to consider
    #[arg(long)]
    pub max_len: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the strongest association rules
    Rules {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Suggest ingredients that pair with a pantry
    Recommend {
        /// Pantry ingredient (repeatable). Defaults to a chicken and garlic pantry.
        #[arg(short, long = "ingredient")]
        ingredients: Vec<String>,
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
        #[arg(long)]
        json: bool,
    },
    /// Answer many pantries at once, one comma-separated pantry per line
    Batch {
        #[arg(short, long)]
        pantries: PathBuf,
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
    /// List the cleaned ingredient vocabulary
    Vocab {
        /// Only show ingredients containing this text
        #[arg(short, long)]
        contains: Option<String>,
    },
    /// Print the flavor network around a pantry
    Network {
        #[arg(short, long = "ingredient")]
        ingredients: Vec<String>,
        #[arg(short, long, default_value_t = DEFAULT_NETWORK_RULES)]
        limit: usize,
    },
}

impl Cli {
    pub fn mining_config(&self) -> MiningConfig {
        MiningConfig::new(self.min_support, self.min_confidence)
            .with_algorithm(self.algorithm)
            .with_max_len(self.max_len)
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_recommend() {
        let cli = Cli::try_parse_from([
            "flavor_alchemist",
            "--dataset",
            "recipes.csv",
            "--min-support",
            "0.01",
            "--algorithm",
            "apriori",
            "recommend",
            "-i",
            "chicken",
            "-i",
            "garlic",
            "-k",
            "3",
        ])
        .expect("valid arguments");

        let config = cli.mining_config();
        assert_eq!(config.min_support, 0.01);
        assert_eq!(config.algorithm, MiningAlgorithm::Apriori);
        match cli.command {
            Command::Recommend {
                ingredients, top_k, json,
            } => {
                assert_eq!(ingredients, vec!["chicken", "garlic"]);
                assert_eq!(top_k, 3);
                assert!(!json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
