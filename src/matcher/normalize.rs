//! Ingredient text normalization and keyword rules.
//!
//! Normalized text is lowercase, contains only alphanumeric runs separated
//! by single spaces, and spells E-numbers without separators (`e420`).

use std::sync::OnceLock;

use regex::Regex;

use super::result::IngredientCategory;

static SPLIT_E_NUMBER: OnceLock<Option<Regex>> = OnceLock::new();
static E_NUMBER: OnceLock<Option<Regex>> = OnceLock::new();
static VAGUE_WORD: OnceLock<Option<Regex>> = OnceLock::new();
static CATEGORY_RULES: OnceLock<Vec<(IngredientCategory, Regex)>> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

/// Lowercases, turns punctuation into single spaces and re-joins E-numbers.
///
/// ```
/// use gutguard::matcher::normalize;
///
/// assert_eq!(normalize("  Sorbitol (E-420)!"), "sorbitol e420");
/// assert_eq!(normalize("Natural   Flavoring"), "natural flavoring");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut gap = false;
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if gap && !out.is_empty() {
                out.push(' ');
            }
            gap = false;
            out.push(ch);
        } else {
            gap = true;
        }
    }

    match compiled(&SPLIT_E_NUMBER, r"\be (\d{3}[a-z]?)\b") {
        Some(re) if re.is_match(&out) => re.replace_all(&out, "e${1}").into_owned(),
        _ => out,
    }
}

/// Substring containment on normalized text.
///
/// Both sides are expected to be normalized already, so `milk` matches
/// `milkfat` and `sorbitol` matches `sorbitols`.
#[must_use]
pub fn contains_term(haystack: &str, term: &str) -> bool {
    !term.is_empty() && haystack.contains(term)
}

/// True if the normalized text carries an E-number (`e` + three digits).
#[must_use]
pub fn has_e_number(normalized: &str) -> bool {
    compiled(&E_NUMBER, r"\be\d{3}[a-z]?\b").is_some_and(|re| re.is_match(normalized))
}

/// True if the text uses a vague descriptor that lowers certainty.
#[must_use]
pub fn has_vague_word(normalized: &str) -> bool {
    compiled(&VAGUE_WORD, r"\b(natural|artificial|flavou?rings?|spices)\b")
        .is_some_and(|re| re.is_match(normalized))
}

/// Assigns the ingredient category by keyword precedence.
#[must_use]
pub fn categorize(normalized: &str) -> IngredientCategory {
    let rules = CATEGORY_RULES.get_or_init(|| {
        [
            (IngredientCategory::Sauce, r"\b(sauce|dressing|marinade)s?\b"),
            (IngredientCategory::Preservative, r"\bpreservatives?\b|\be2\d\d[a-z]?\b"),
            (IngredientCategory::Sweetener, r"\b(sweetener|sugar)\w*|\be9\d\d[a-z]?\b"),
            (IngredientCategory::Emulsifier, r"\b(emulsifier|stabili[sz]er)s?\b|\be4\d\d[a-z]?\b"),
            (IngredientCategory::Color, r"\b(colou?r|dye)\w*|\be1\d\d[a-z]?\b"),
            (IngredientCategory::Flavor, r"\bflavou?r\w*|\be6\d\d[a-z]?\b"),
        ]
        .into_iter()
        .filter_map(|(category, pattern)| Regex::new(pattern).ok().map(|re| (category, re)))
        .collect()
    });

    rules
        .iter()
        .find(|(_, re)| re.is_match(normalized))
        .map_or(IngredientCategory::Other, |(category, _)| *category)
}
