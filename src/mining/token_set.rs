use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// An immutable set of ingredient tokens, stored sorted and deduplicated.
///
/// Iteration order is always lexicographic, so anything derived from a
/// `TokenSet` (rule descriptions, itemset ordering) is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSet(Vec<String>);

impl TokenSet {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        tokens.sort_unstable();
        tokens.dedup();
        TokenSet(tokens)
    }

    /// Wraps tokens the caller guarantees are already sorted and unique.
    pub(crate) fn from_sorted_unchecked(tokens: Vec<String>) -> Self {
        debug_assert!(tokens.windows(2).all(|w| w[0] < w[1]));
        TokenSet(tokens)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0
            .binary_search_by(|probe| probe.as_str().cmp(token))
            .is_ok()
    }

    /// True when the two sets share at least one token.
    pub fn intersects(&self, other: &TokenSet) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => return true,
            }
        }
        false
    }

    pub fn is_subset(&self, other: &TokenSet) -> bool {
        if self.0.len() > other.0.len() {
            return false;
        }
        let mut j = 0;
        for token in &self.0 {
            loop {
                match other.0.get(j) {
                    None => return false,
                    Some(candidate) => match candidate.cmp(token) {
                        Ordering::Less => j += 1,
                        Ordering::Equal => {
                            j += 1;
                            break;
                        }
                        Ordering::Greater => return false,
                    },
                }
            }
        }
        true
    }

    pub fn union(&self, other: &TokenSet) -> TokenSet {
        TokenSet::new(self.0.iter().chain(other.0.iter()).cloned())
    }

    pub fn difference(&self, other: &TokenSet) -> TokenSet {
        TokenSet(
            self.0
                .iter()
                .filter(|token| !other.contains(token))
                .cloned()
                .collect(),
        )
    }

    /// Size first, then lexicographic. This is the canonical itemset order.
    pub fn canonical_cmp(&self, other: &TokenSet) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl<'a> IntoIterator for &'a TokenSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for TokenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        TokenSet::new(iter)
    }
}

impl fmt::Display for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.join(", "))
    }
}
