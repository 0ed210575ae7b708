use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;

pub const DEFAULT_DATASET_PATH: &str = "data/recipes.csv";

/// Markers a dataframe reader treats as missing values by default.
const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// One row per recipe, kept as raw strings.
#[derive(Debug, Clone, Default)]
pub struct RecipeTable {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl RecipeTable {
    pub fn new(headers: StringRecord, records: Vec<StringRecord>) -> Self {
        Self { headers, records }
    }

    /// Convenience constructor for in-memory tables.
    pub fn from_rows<H, R, S>(headers: H, rows: R) -> Self
    where
        H: IntoIterator<Item = S>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            headers: headers.into_iter().collect(),
            records: rows.into_iter().map(|row| row.into_iter().collect()).collect(),
        }
    }

    /// Reads CSV with a header row. Rows may be shorter or longer than the header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr.headers().context("Failed to read CSV header row")?.clone();

        let mut records = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record =
                result.with_context(|| format!("Failed to read record at row index {}", row_index))?;
            records.push(record);
        }
        Ok(Self { headers, records })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn records(&self) -> &[StringRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Field value by column, `None` when the row is short or the value is a null marker.
    pub fn field(&self, row: usize, column: usize) -> Option<&str> {
        self.records
            .get(row)
            .and_then(|record| record.get(column))
            .filter(|value| !is_null_marker(value))
    }

    /// Keeps only the rows whose index satisfies `keep`.
    pub(crate) fn retain_rows(&self, mut keep: impl FnMut(usize) -> bool) -> RecipeTable {
        RecipeTable {
            headers: self.headers.clone(),
            records: self
                .records
                .iter()
                .enumerate()
                .filter(|(index, _)| keep(*index))
                .map(|(_, record)| record.clone())
                .collect(),
        }
    }
}

pub fn is_null_marker(value: &str) -> bool {
    NULL_MARKERS.contains(&value)
}

/// Loads the raw recipe table from a CSV file on disk.
pub fn load_recipe_table(csv_path: &Path) -> Result<RecipeTable> {
    if !csv_path.exists() {
        return Err(anyhow::anyhow!("Recipe CSV file not found at: {:?}", csv_path));
    }
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open recipe CSV file at {:?}", csv_path))?;
    let table = RecipeTable::from_reader(file)
        .with_context(|| format!("Failed to parse recipe CSV file at {:?}", csv_path))?;
    log::info!("Loaded {} recipe rows from {:?}", table.len(), csv_path);
    Ok(table)
}
