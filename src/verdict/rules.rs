//! Profile-level structural rules.
//!
//! These rules look at product flags and declared allergens, independent
//! of the ingredient text.

use crate::condition::{GutCondition, SeverityLevel};
use crate::food::{FodmapLevel, FoodItem};
use crate::matcher::normalize;
use crate::profile::GutProfile;

use super::{ConditionWarning, FlagSource, FlaggedIngredient};

/// Evaluates the structural rules for one product.
pub(crate) fn evaluate(food: &FoodItem, profile: &GutProfile) -> Vec<(FlaggedIngredient, ConditionWarning)> {
    let mut flags = Vec::new();

    if let Some(severity) = profile.severity_for(GutCondition::Gluten) {
        if !food.gluten_free {
            flags.push(flag(
                "Gluten",
                "Product is not labelled gluten-free",
                severity,
                GutCondition::Gluten,
                FlagSource::Structural,
            ));
        }
    }

    if let Some(severity) = profile.severity_for(GutCondition::Lactose) {
        if !food.lactose_free {
            flags.push(flag(
                "Lactose",
                "Product is not labelled lactose-free",
                severity,
                GutCondition::Lactose,
                FlagSource::Structural,
            ));
        }
    }

    if let Some(severity) = profile.severity_for(GutCondition::IbsFodmap) {
        if food.fodmap_level == FodmapLevel::High {
            flags.push(flag(
                "High FODMAP",
                "Product is rated high in FODMAPs",
                severity,
                GutCondition::IbsFodmap,
                FlagSource::Structural,
            ));
        }
    }

    let personal = profile.known_triggers();
    for allergen in &food.allergens {
        let needle = normalize(allergen);
        if needle.is_empty() {
            continue;
        }
        let hit = personal
            .iter()
            .find(|(_, triggers)| triggers.iter().any(|t| normalize(t) == needle));
        if let Some((condition, _)) = hit {
            flags.push(flag(
                allergen,
                "Declared allergen is on your personal trigger list",
                SeverityLevel::Severe,
                *condition,
                FlagSource::Allergen,
            ));
        }
    }

    flags
}

fn flag(
    name: &str,
    reason: &str,
    severity: SeverityLevel,
    condition: GutCondition,
    source: FlagSource,
) -> (FlaggedIngredient, ConditionWarning) {
    (
        FlaggedIngredient {
            name: name.to_string(),
            reason: reason.to_string(),
            severity,
            conditions: vec![condition],
            source,
        },
        ConditionWarning {
            ingredient: name.to_string(),
            severity,
            condition,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ConditionSettings;

    #[test]
    fn test_gluten_rule_uses_profile_severity() {
        let profile = GutProfile::new()
            .with_condition(GutCondition::Gluten, ConditionSettings::enabled(SeverityLevel::Moderate));
        let flags = evaluate(&FoodItem::new("1", "Bread"), &profile);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].0.name, "Gluten");
        assert_eq!(flags[0].0.severity, SeverityLevel::Moderate);
        assert_eq!(flags[0].1.condition, GutCondition::Gluten);

        let gf = FoodItem::new("2", "GF Bread").with_flags(true, false);
        assert!(evaluate(&gf, &profile).is_empty());
    }

    #[test]
    fn test_disabled_conditions_do_not_fire() {
        let profile = GutProfile::new().with_condition(
            GutCondition::Lactose,
            ConditionSettings {
                enabled: false,
                ..ConditionSettings::enabled(SeverityLevel::Severe)
            },
        );
        assert!(evaluate(&FoodItem::new("1", "Milk"), &profile).is_empty());
    }

    #[test]
    fn test_high_fodmap_rule() {
        let profile = GutProfile::new()
            .with_condition(GutCondition::IbsFodmap, ConditionSettings::enabled(SeverityLevel::Mild));
        let food = FoodItem::new("1", "Apple juice").with_fodmap_level(FodmapLevel::High);
        let flags = evaluate(&food, &profile);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].0.name, "High FODMAP");
        assert_eq!(flags[0].0.source, FlagSource::Structural);

        let low = FoodItem::new("2", "Rice cake").with_fodmap_level(FodmapLevel::Low);
        assert!(evaluate(&low, &profile).is_empty());
    }

    #[test]
    fn test_allergen_on_personal_list_is_severe() {
        let profile = GutProfile::new().with_condition(
            GutCondition::Allergies,
            ConditionSettings::enabled(SeverityLevel::Mild).with_trigger("Peanuts"),
        );
        let food = FoodItem::new("1", "Trail mix").with_allergens(["peanuts", "soy"]);
        let flags = evaluate(&food, &profile);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].0.severity, SeverityLevel::Severe);
        assert_eq!(flags[0].0.source, FlagSource::Allergen);
        assert_eq!(flags[0].1.condition, GutCondition::Allergies);
    }
}
