use csv::StringRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::MiningError;

/// Field holding an R-style character vector: `c("chicken", "garlic")`.
pub const R_VECTOR_FIELD: &str = "RecipeIngredientParts";
/// Field holding a list literal: `['chicken', 'garlic']`.
pub const LIST_LITERAL_FIELD: &str = "Ingredients";

static QUOTED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]+)""#).expect("static regex is valid"));

/// Which ingredient encoding a recipe table uses, resolved once from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "encoding", rename_all = "snake_case")]
pub enum IngredientSchema {
    RVector { column: usize },
    ListLiteral { column: usize },
}

impl IngredientSchema {
    /// The R-vector field wins when both are present.
    pub fn detect(headers: &StringRecord) -> Result<Self, MiningError> {
        let position = |name: &str| headers.iter().position(|h| h == name);
        if let Some(column) = position(R_VECTOR_FIELD) {
            Ok(IngredientSchema::RVector { column })
        } else if let Some(column) = position(LIST_LITERAL_FIELD) {
            Ok(IngredientSchema::ListLiteral { column })
        } else {
            Err(MiningError::Schema {
                observed: headers.iter().map(str::to_string).collect(),
            })
        }
    }

    pub fn column(&self) -> usize {
        match self {
            IngredientSchema::RVector { column } | IngredientSchema::ListLiteral { column } => *column,
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            IngredientSchema::RVector { .. } => R_VECTOR_FIELD,
            IngredientSchema::ListLiteral { .. } => LIST_LITERAL_FIELD,
        }
    }

    /// Splits one raw field into its item strings. Malformed text gives an empty list.
    pub fn parse(&self, raw: &str) -> Vec<String> {
        match self {
            IngredientSchema::RVector { .. } => parse_r_vector(raw),
            IngredientSchema::ListLiteral { .. } => parse_list_literal(raw).unwrap_or_default(),
        }
    }
}

pub fn parse_r_vector(raw: &str) -> Vec<String> {
    match raw.strip_prefix("c(").and_then(|rest| rest.strip_suffix(')')) {
        Some(content) => QUOTED_ITEM
            .captures_iter(content)
            .map(|caps| caps[1].to_string())
            .collect(),
        None => Vec::new(),
    }
}

/// Parses a bracketed list of quoted string literals.
///
/// `None` entries are skipped. Returns `None` for anything else: tuples, bare
/// strings, numbers, nested containers, unterminated quotes or trailing garbage.
pub fn parse_list_literal(raw: &str) -> Option<Vec<String>> {
    let mut cursor = LiteralCursor::new(raw.trim());
    if cursor.next()? != '[' {
        return None;
    }

    let mut items = Vec::new();
    let mut saw_comma = false;
    loop {
        cursor.skip_whitespace();
        match cursor.peek()? {
            ']' => {
                cursor.next();
                break;
            }
            '\'' | '"' => {
                if !items.is_empty() && !saw_comma {
                    return None;
                }
                items.push(Some(cursor.string_literal()?));
            }
            'N' => {
                if !items.is_empty() && !saw_comma {
                    return None;
                }
                cursor.keyword("None")?;
                items.push(None);
            }
            _ => return None,
        }
        saw_comma = false;
        cursor.skip_whitespace();
        match cursor.peek()? {
            ',' => {
                cursor.next();
                saw_comma = true;
            }
            ']' => {}
            _ => return None,
        }
    }

    cursor.skip_whitespace();
    if cursor.peek().is_some() {
        return None;
    }
    Some(items.into_iter().flatten().collect())
}

struct LiteralCursor<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> LiteralCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
        }
    }

    fn next(&mut self) -> Option<char> {
        self.chars.next()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.chars.next();
        }
    }

    fn keyword(&mut self, word: &str) -> Option<()> {
        for expected in word.chars() {
            if self.next()? != expected {
                return None;
            }
        }
        Some(())
    }

    fn string_literal(&mut self) -> Option<String> {
        let quote = self.next()?;
        let mut value = String::new();
        loop {
            match self.next()? {
                c if c == quote => return Some(value),
                '\n' => return None,
                '\\' => self.escape(&mut value)?,
                c => value.push(c),
            }
        }
    }

    fn escape(&mut self, value: &mut String) -> Option<()> {
        match self.next()? {
            '\n' => {}
            '\\' => value.push('\\'),
            '\'' => value.push('\''),
            '"' => value.push('"'),
            'a' => value.push('\u{07}'),
            'b' => value.push('\u{08}'),
            'f' => value.push('\u{0c}'),
            'v' => value.push('\u{0b}'),
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'x' => value.push(self.hex_char(2)?),
            'u' => value.push(self.hex_char(4)?),
            'U' => value.push(self.hex_char(8)?),
            // Named escapes need the Unicode name table; the row is dropped instead.
            'N' => return None,
            first @ '0'..='7' => value.push(self.octal_char(first)?),
            // Unknown escapes are kept verbatim.
            other => {
                value.push('\\');
                value.push(other);
            }
        }
        Some(())
    }

    /// Up to three octal digits, the first already consumed.
    fn octal_char(&mut self, first: char) -> Option<char> {
        let mut code = first.to_digit(8)?;
        for _ in 0..2 {
            match self.peek().and_then(|c| c.to_digit(8)) {
                Some(digit) => {
                    self.chars.next();
                    code = code * 8 + digit;
                }
                None => break,
            }
        }
        char::from_u32(code)
    }

    fn hex_char(&mut self, digits: usize) -> Option<char> {
        let mut code = 0u32;
        for _ in 0..digits {
            code = code * 16 + self.next()?.to_digit(16)?;
        }
        char::from_u32(code)
    }
}
