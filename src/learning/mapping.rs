//! Static symptom and ingredient to condition tables.
//!
//! Anything the tables do not cover falls back to the caller's enabled
//! conditions.

use std::collections::BTreeSet;

use crate::condition::GutCondition::{self, Additives, Allergies, Gluten, Histamine, IbsFodmap, Lactose, Reflux};
use crate::matcher::{contains_term, normalize};

use super::data::SymptomKind;

/// Conditions a symptom commonly points to.
#[must_use]
pub fn conditions_for_symptom(kind: SymptomKind, fallback: &BTreeSet<GutCondition>) -> BTreeSet<GutCondition> {
    let mapped: &[GutCondition] = match kind {
        SymptomKind::Bloating | SymptomKind::Gas | SymptomKind::Cramps => &[IbsFodmap, Lactose],
        SymptomKind::AbdominalPain => &[IbsFodmap, Gluten],
        SymptomKind::Diarrhea => &[IbsFodmap, Lactose, Gluten],
        SymptomKind::Constipation => &[IbsFodmap],
        SymptomKind::Nausea => &[Reflux, Histamine],
        SymptomKind::Heartburn | SymptomKind::Regurgitation => &[Reflux],
        SymptomKind::Headache => &[Histamine, Additives],
        SymptomKind::Flushing => &[Histamine],
        SymptomKind::Hives => &[Allergies, Histamine],
        SymptomKind::Itching => &[Allergies],
        SymptomKind::Fatigue | SymptomKind::BrainFog => &[Gluten],
        SymptomKind::Other => &[],
    };
    if mapped.is_empty() {
        fallback.clone()
    } else {
        mapped.iter().copied().collect()
    }
}

const INGREDIENT_TABLE: &[(&str, &[GutCondition])] = &[
    ("wheat", &[Gluten, IbsFodmap]),
    ("barley", &[Gluten]),
    ("rye", &[Gluten]),
    ("malt extract", &[Gluten]),
    ("malted", &[Gluten]),
    ("gluten", &[Gluten]),
    ("spelt", &[Gluten]),
    ("milk", &[Lactose]),
    ("lactose", &[Lactose]),
    ("cream", &[Lactose]),
    ("whey", &[Lactose]),
    ("cheese", &[Lactose, Histamine]),
    ("butter", &[Lactose]),
    ("yogurt", &[Lactose]),
    ("onion", &[IbsFodmap, Reflux]),
    ("garlic", &[IbsFodmap, Reflux]),
    ("sorbitol", &[IbsFodmap]),
    ("mannitol", &[IbsFodmap]),
    ("xylitol", &[IbsFodmap]),
    ("inulin", &[IbsFodmap]),
    ("fructose", &[IbsFodmap]),
    ("honey", &[IbsFodmap]),
    ("apple", &[IbsFodmap]),
    ("bean", &[IbsFodmap]),
    ("coffee", &[Reflux]),
    ("caffeine", &[Reflux]),
    ("chocolate", &[Reflux]),
    ("tomato", &[Reflux, Histamine]),
    ("citrus", &[Reflux]),
    ("mint", &[Reflux]),
    ("chili", &[Reflux]),
    ("wine", &[Histamine]),
    ("vinegar", &[Histamine]),
    ("fermented", &[Histamine]),
    ("cured", &[Histamine]),
    ("smoked", &[Histamine]),
    ("peanut", &[Allergies]),
    ("soy", &[Allergies]),
    ("egg", &[Allergies]),
    ("sesame", &[Allergies]),
    ("shellfish", &[Allergies]),
    ("almond", &[Allergies]),
    ("aspartame", &[Additives, IbsFodmap]),
    ("sucralose", &[Additives]),
    ("carrageenan", &[Additives]),
    ("msg", &[Additives]),
    ("benzoate", &[Additives]),
    ("sulfite", &[Additives]),
    ("nitrite", &[Additives]),
];

/// Conditions an ingredient commonly affects.
#[must_use]
pub fn conditions_for_ingredient(ingredient: &str, fallback: &BTreeSet<GutCondition>) -> BTreeSet<GutCondition> {
    let normalized = normalize(ingredient);
    let mapped: BTreeSet<GutCondition> = INGREDIENT_TABLE
        .iter()
        .filter(|(term, _)| contains_term(&normalized, term))
        .flat_map(|(_, conditions)| conditions.iter().copied())
        .collect();
    if mapped.is_empty() {
        fallback.clone()
    } else {
        mapped
    }
}
