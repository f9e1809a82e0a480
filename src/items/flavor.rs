//! Flavor text overrides
//!
//! Short in-world blurbs keyed by item name. Lookups are forgiving about
//! accents, typographic quotes and dashes, a trailing qualifier in
//! parentheses, and the words "of"/"the".

use std::collections::HashMap;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Name-keyed flavor text with normalized keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlavorIndex {
    entries: HashMap<String, String>,
}

impl FlavorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert flavor for a name unless one is already present.
    ///
    /// Returns false if the name was already covered or is blank.
    pub fn insert(&mut self, name: &str, flavor: impl Into<String>) -> bool {
        let key = normalize_name(name);
        if key.is_empty() || self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, flavor.into());
        true
    }

    /// Fill gaps from another index; entries already here win
    pub fn extend_missing(&mut self, other: FlavorIndex) {
        for (key, flavor) in other.entries {
            self.entries.entry(key).or_insert(flavor);
        }
    }

    /// Look up flavor for a name.
    ///
    /// Tries the name as given, then without a trailing `(...)`, then with
    /// "of" and "the" dropped.
    pub fn get(&self, name: &str) -> Option<&str> {
        if name.trim().is_empty() {
            return None;
        }
        if let Some(flavor) = self.entries.get(&normalize_name(name)) {
            return Some(flavor);
        }

        let trimmed = strip_trailing_qualifier(name);
        if !trimmed.is_empty() && trimmed != name {
            if let Some(flavor) = self.entries.get(&normalize_name(trimmed)) {
                return Some(flavor);
            }
        }

        let soft = name_without_articles(name);
        self.entries.get(&normalize_name(&soft)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lowercase, accent-free, single-spaced form with straight quotes and
/// plain hyphens
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_dash = false;
    for c in name.nfkd().filter(|c| !is_combining_mark(*c)) {
        let c = match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2010}'..='\u{2014}' | '\u{2212}' => {
                if !in_dash {
                    out.push('-');
                }
                in_dash = true;
                continue;
            }
            other => other,
        };
        in_dash = false;
        out.push(c);
    }
    out.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// `"Cloak (Blue)"` -> `"Cloak"`
fn strip_trailing_qualifier(name: &str) -> &str {
    let trimmed = name.trim_end();
    if !trimmed.ends_with(')') {
        return name;
    }
    match trimmed.rfind('(') {
        Some(open) if !trimmed[open + 1..trimmed.len() - 1].contains(')') => trimmed[..open].trim_end(),
        _ => name,
    }
}

fn name_without_articles(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            if word.eq_ignore_ascii_case("of") || word.eq_ignore_ascii_case("the") {
                " "
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
