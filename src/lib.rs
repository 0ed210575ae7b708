pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod mining;
pub mod pipeline;
pub mod recommend;
pub mod report;
pub mod rule_cache;
pub mod rules;
pub mod transactions;

pub use config::{MiningAlgorithm, MiningConfig};
pub use dataset::{load_recipe_table, RecipeTable};
pub use error::MiningError;
pub use mining::{mine_frequent_itemsets, FrequentItemsets, Itemset, TokenSet};
pub use pipeline::{mine_batch, mine_rules, MiningOutcome, MiningStatus};
pub use recommend::{flavor_network, get_recommendations, FlavorNetwork, Recommendation};
pub use rule_cache::RuleCache;
pub use rules::{generate_rules, AssociationRule, RuleSet};
pub use transactions::{build_transactions, Transaction, TransactionBatch};
