pub mod normalize;
pub mod schema;

pub use normalize::{normalize_ingredient, normalize_query_token};
pub use schema::IngredientSchema;

use log::{debug, info};

use crate::dataset::RecipeTable;
use crate::error::MiningError;
use crate::mining::TokenSet;

/// The ingredient set of one recipe.
pub type Transaction = TokenSet;

pub const DEFAULT_PANTRY_SEEDS: &[&str] = &["chicken", "garlic"];

/// Transactions built from a recipe table, plus the rows they came from.
#[derive(Debug, Clone)]
pub struct TransactionBatch {
    pub transactions: Vec<Transaction>,
    /// Rows whose ingredient field was present (not null). May include rows
    /// that later yielded no tokens, matching the raw data a caller would inspect.
    pub table: RecipeTable,
    pub schema: IngredientSchema,
    /// Rows dropped because the ingredient field was missing or null.
    pub null_records: usize,
    /// Rows whose field parsed to no usable tokens.
    pub empty_records: usize,
}

impl TransactionBatch {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Rows of the source table, null ones included.
    pub fn records_seen(&self) -> usize {
        self.table.len() + self.null_records
    }
}

/// Cleans one raw ingredient field into a transaction. `None` when nothing usable remains.
pub fn build_transaction(schema: &IngredientSchema, raw: &str) -> Option<Transaction> {
    let tokens: Transaction = schema
        .parse(raw)
        .iter()
        .filter(|item| !item.is_empty())
        .map(|item| normalize_ingredient(item))
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens)
    }
}

/// Turns raw recipe rows into ingredient transactions.
///
/// The encoding is detected once from the header. Rows with a null ingredient
/// field are dropped before parsing; rows whose field is malformed or cleans
/// down to nothing are dropped afterwards. Only a missing field is an error.
pub fn build_transactions(table: &RecipeTable) -> Result<TransactionBatch, MiningError> {
    let schema = IngredientSchema::detect(table.headers())?;
    let column = schema.column();
    info!(
        "Reading ingredients from field '{}' ({} rows)",
        schema.field_name(),
        table.len()
    );

    let mut transactions = Vec::with_capacity(table.len());
    let mut present = vec![false; table.len()];
    let mut null_records = 0;
    let mut empty_records = 0;

    for (row, is_present) in present.iter_mut().enumerate() {
        let Some(raw) = table.field(row, column) else {
            null_records += 1;
            continue;
        };
        *is_present = true;
        match build_transaction(&schema, raw) {
            Some(transaction) => transactions.push(transaction),
            None => empty_records += 1,
        }
    }

    debug!(
        "Dropped {} rows with null ingredients and {} rows without usable tokens",
        null_records, empty_records
    );

    Ok(TransactionBatch {
        transactions,
        table: table.retain_rows(|row| present[row]),
        schema,
        null_records,
        empty_records,
    })
}

/// Every distinct token across the transactions, sorted.
pub fn ingredient_vocabulary(transactions: &[Transaction]) -> Vec<String> {
    let mut vocabulary: Vec<String> = transactions
        .iter()
        .flat_map(|transaction| transaction.iter().cloned())
        .collect();
    vocabulary.sort_unstable();
    vocabulary.dedup();
    vocabulary
}

/// Picks a starting pantry from `vocabulary` (which must be sorted).
///
/// Each seed maps to itself when it is a token, otherwise to the shortest token
/// containing it (earliest in sorted order on ties). Seeds without a match are skipped.
pub fn default_pantry(vocabulary: &[String], seeds: &[&str]) -> Vec<String> {
    let mut pantry: Vec<String> = Vec::new();
    for seed in seeds {
        let exact = vocabulary
            .binary_search_by(|token| token.as_str().cmp(seed))
            .ok()
            .map(|index| &vocabulary[index]);
        let chosen = exact.or_else(|| {
            vocabulary
                .iter()
                .filter(|token| token.contains(seed))
                .min_by_key(|token| token.len())
        });
        if let Some(token) = chosen {
            if !pantry.contains(token) {
                pantry.push(token.clone());
            }
        }
    }
    pantry
}
