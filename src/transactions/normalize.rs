use once_cell::sync::Lazy;
use regex::Regex;

static NON_LETTER_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{Alphabetic}]+").expect("static regex is valid"));

/// Cleans one raw ingredient phrase into a token.
///
/// Lowercases, turns every run of non-letter characters (digits, punctuation,
/// whitespace) into a single space and trims. Quantity words such as "cups"
/// are alphabetic and survive: `"2 cups flour"` becomes `"cups flour"`.
/// May return an empty string, which callers drop.
pub fn normalize_ingredient(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    NON_LETTER_RUN.replace_all(&lowered, " ").trim().to_string()
}

/// Normalization applied to user-supplied pantry items: lowercase only.
///
/// Query input is taken as already clean text, so punctuation and digits are
/// left alone here, unlike `normalize_ingredient`.
pub fn normalize_query_token(raw: &str) -> String {
    raw.to_lowercase()
}
