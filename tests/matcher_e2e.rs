use std::collections::{BTreeMap, BTreeSet};

use gutguard::{GutCondition, IngredientMatcher, MatcherConfig, RiskLevel, SeverityLevel};

fn enabled(conditions: &[GutCondition]) -> BTreeSet<GutCondition> {
    conditions.iter().copied().collect()
}

#[test]
fn aspartame_detected_in_every_label_form() {
    let matcher = IngredientMatcher::default();
    for condition in [GutCondition::IbsFodmap, GutCondition::Additives] {
        for text in ["Aspartame", "ASPARTAME", "aspartame (E951)", "sweetener: aspartame."] {
            let result = matcher.match_ingredient(text, &enabled(&[condition]), &BTreeMap::new());
            assert!(result.trigger_names().contains(&"Aspartame"), "{text} with {condition}");
        }
    }
}

#[test]
fn carrageenan_not_flagged_for_gluten_only_user() {
    let matcher = IngredientMatcher::default();
    let result = matcher.match_ingredient("Carrageenan (E407)", &enabled(&[GutCondition::Gluten]), &BTreeMap::new());
    assert!(!result.is_problematic);
    assert!(result.detected_triggers.is_empty());
}

#[test]
fn sorbitol_with_e_number_is_severe() {
    let matcher = IngredientMatcher::default();
    let result = matcher.match_ingredient("sorbitol (E420)", &enabled(&[GutCondition::IbsFodmap]), &BTreeMap::new());
    assert!(result.is_problematic);
    assert_eq!(result.analysis.risk_level, RiskLevel::Severe);
    assert_eq!(result.max_severity(), Some(SeverityLevel::Severe));
}

#[test]
fn organic_quinoa_is_clean_for_every_condition() {
    let matcher = IngredientMatcher::default();
    let result = matcher.match_ingredient("organic quinoa", &enabled(&GutCondition::ALL), &BTreeMap::new());
    assert!(!result.is_problematic);
    assert!(result.detected_triggers.is_empty());
    assert_eq!(result.analysis.risk_level, RiskLevel::Low);
}

#[test]
fn personal_trigger_matches_inside_compound_words() {
    let matcher = IngredientMatcher::default();
    let triggers = BTreeMap::from([
        (GutCondition::Lactose, BTreeSet::from(["milk".to_string()])),
        (GutCondition::IbsFodmap, BTreeSet::from(["onion".to_string()])),
    ]);
    let conditions = enabled(&[GutCondition::Lactose, GutCondition::IbsFodmap]);

    for text in ["milkfat", "Skimmilk Powder", "onionpowder"] {
        let result = matcher.match_ingredient(text, &conditions, &triggers);
        assert!(result.is_problematic, "{text}");
    }
}

#[test]
fn plural_catalog_names_are_detected() {
    let matcher = IngredientMatcher::default();
    let result = matcher.match_ingredient("sorbitols", &enabled(&[GutCondition::IbsFodmap]), &BTreeMap::new());
    assert!(result.is_problematic);
    assert_eq!(result.trigger_names(), vec!["Sorbitol"]);
}

#[test]
fn maltitol_is_not_read_as_barley_malt() {
    let matcher = IngredientMatcher::default();
    let result = matcher.match_ingredient("maltitol", &enabled(&GutCondition::ALL), &BTreeMap::new());
    assert_eq!(result.trigger_names(), vec!["Maltitol"]);
}

#[test]
fn cached_and_uncached_matchers_agree() {
    let cached = IngredientMatcher::default();
    let uncached = IngredientMatcher::new(&MatcherConfig {
        cache_enabled: false,
        ..MatcherConfig::default()
    });
    let conditions = enabled(&[GutCondition::Reflux, GutCondition::Additives]);
    let triggers = BTreeMap::from([(GutCondition::Reflux, BTreeSet::from(["tomato".to_string()]))]);

    for text in ["tomato paste", "sodium benzoate", "water", "Tomato Paste"] {
        let first = cached.match_ingredient(text, &conditions, &triggers);
        let hit = cached.match_ingredient(text, &conditions, &triggers);
        let fresh = uncached.match_ingredient(text, &conditions, &triggers);
        assert_eq!(first, hit);
        assert_eq!(hit, fresh);
    }
}

#[test]
fn changing_personal_triggers_is_not_served_stale() {
    let matcher = IngredientMatcher::default();
    let conditions = enabled(&[GutCondition::Reflux]);
    let before = matcher.match_ingredient("tomato paste", &conditions, &BTreeMap::new());
    assert!(!before.is_problematic);

    let triggers = BTreeMap::from([(GutCondition::Reflux, BTreeSet::from(["tomato".to_string()]))]);
    let after = matcher.match_ingredient("tomato paste", &conditions, &triggers);
    assert!(after.is_problematic);
}
