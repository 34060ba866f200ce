//! Scan verdict aggregation.
//!
//! Combines per-ingredient results with profile-level structural rules into
//! one verdict. The tier is a strict precedence, not a weighted score: a
//! single severe flag makes the item `avoid` no matter how many milder flags
//! accompany it.

mod rules;

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::condition::{GutCondition, SeverityLevel};
use crate::confidence::Confidence;
use crate::error::GutResult;
use crate::food::FoodItem;
use crate::matcher::{IngredientAnalysisResult, IngredientMatcher, RiskLevel};
use crate::profile::GutProfile;

/// Overall safety tier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyTier {
    /// Nothing flagged.
    #[default]
    Safe,
    /// Flagged, but nothing severe.
    Caution,
    /// At least one severe flag.
    Avoid,
}

impl SafetyTier {
    /// Tier implied by a set of flag severities.
    #[must_use]
    pub fn from_severities<I>(severities: I) -> Self
    where
        I: IntoIterator<Item = SeverityLevel>,
    {
        let mut tier = Self::Safe;
        for severity in severities {
            if severity == SeverityLevel::Severe {
                return Self::Avoid;
            }
            tier = Self::Caution;
        }
        tier
    }

    /// Severity score used by pattern mining (safe 0, caution 0.5, avoid 1).
    #[must_use]
    pub const fn score(&self) -> f64 {
        match self {
            Self::Safe => 0.0,
            Self::Caution => 0.5,
            Self::Avoid => 1.0,
        }
    }

    /// True for caution and avoid.
    #[must_use]
    pub const fn is_flagged(&self) -> bool {
        !matches!(self, Self::Safe)
    }
}

impl fmt::Display for SafetyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "safe"),
            Self::Caution => write!(f, "caution"),
            Self::Avoid => write!(f, "avoid"),
        }
    }
}

/// Which rule produced a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSource {
    /// A trigger found in the ingredient text.
    Ingredient,
    /// A product flag such as "not gluten-free".
    Structural,
    /// A declared allergen on the user's personal list.
    Allergen,
}

/// One reason the product was flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedIngredient {
    /// Ingredient text, product flag or allergen.
    pub name: String,
    /// Why it was flagged.
    pub reason: String,
    /// Severity of the flag.
    pub severity: SeverityLevel,
    /// Enabled conditions the flag applies to.
    pub conditions: Vec<GutCondition>,
    /// Rule that raised the flag.
    pub source: FlagSource,
}

/// A flag attributed to one condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionWarning {
    /// Flagged name.
    pub ingredient: String,
    /// Severity of the flag.
    pub severity: SeverityLevel,
    /// Condition the warning is for.
    pub condition: GutCondition,
}

/// Verdict for one product against one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanAnalysis {
    /// Safe, caution or avoid.
    pub overall_safety: SafetyTier,
    /// Ingredient flags in label order, then structural and allergen flags.
    pub flagged_ingredients: Vec<FlaggedIngredient>,
    /// One warning per flag and enabled condition.
    pub condition_warnings: Vec<ConditionWarning>,
    /// The profile's preferred alternatives.
    pub safe_alternatives: Vec<String>,
    /// One-line summary for display.
    pub explanation: String,
    /// Mean ingredient confidence; zero without ingredients.
    pub confidence: Confidence,
    /// When the verdict was computed.
    pub last_updated: DateTime<Utc>,
}

impl ScanAnalysis {
    /// Names of all flagged entries.
    #[must_use]
    pub fn flagged_names(&self) -> Vec<&str> {
        self.flagged_ingredients.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Verdict plus the per-ingredient detail behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexFoodAnalysis {
    /// The product verdict.
    pub scan: ScanAnalysis,
    /// One result per ingredient, in label order.
    pub ingredient_results: Vec<IngredientAnalysisResult>,
    /// Ingredient labels that conceal the real substance.
    pub hidden_ingredients: Vec<String>,
    /// Highest risk among the ingredients.
    pub highest_risk: RiskLevel,
    /// De-duplicated substitutes across all problematic ingredients.
    pub ingredient_alternatives: Vec<String>,
}

/// Aggregates ingredient matches and profile rules into a verdict.
pub struct VerdictAggregator {
    matcher: IngredientMatcher,
}

impl VerdictAggregator {
    /// Creates an aggregator around `matcher`.
    #[must_use]
    pub fn new(matcher: IngredientMatcher) -> Self {
        Self { matcher }
    }

    /// The matcher used for ingredient text.
    #[must_use]
    pub fn matcher(&self) -> &IngredientMatcher {
        &self.matcher
    }

    /// Analyzes a product against a profile.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the product or profile is malformed.
    pub fn analyze_food(&self, food: &FoodItem, profile: &GutProfile) -> GutResult<ScanAnalysis> {
        Ok(self.analyze_complex_food(food, profile)?.scan)
    }

    /// Analyzes a product and keeps the per-ingredient results.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the product or profile is malformed.
    pub fn analyze_complex_food(
        &self,
        food: &FoodItem,
        profile: &GutProfile,
    ) -> GutResult<ComplexFoodAnalysis> {
        food.validate()?;
        profile.validate()?;

        let enabled = profile.enabled_conditions();
        let personal = profile.known_triggers();
        let results = self.matcher.match_all(&food.ingredients, &enabled, &personal);

        let mut flagged = Vec::new();
        let mut warnings = Vec::new();

        for result in results.iter().filter(|r| r.is_problematic) {
            let Some(severity) = result.max_severity() else {
                continue;
            };
            let conditions: Vec<GutCondition> =
                result.affected_conditions(&enabled).into_iter().collect();
            for condition in &conditions {
                warnings.push(ConditionWarning {
                    ingredient: result.ingredient.clone(),
                    severity,
                    condition: *condition,
                });
            }
            flagged.push(FlaggedIngredient {
                name: result.ingredient.clone(),
                reason: format!("Contains {}", result.trigger_names().join(", ")),
                severity,
                conditions,
                source: FlagSource::Ingredient,
            });
        }

        for (flag, warning) in rules::evaluate(food, profile) {
            flagged.push(flag);
            warnings.push(warning);
        }

        let overall = SafetyTier::from_severities(flagged.iter().map(|f| f.severity));
        let explanation = explain(overall, &enabled, &warnings);
        let confidence = Confidence::mean(results.iter().map(|r| r.confidence));

        debug!(
            food = %food.name,
            overall = %overall,
            flags = flagged.len(),
            "scan verdict computed"
        );

        let hidden_ingredients = results
            .iter()
            .filter(|r| r.is_hidden)
            .map(|r| r.ingredient.clone())
            .collect();
        let highest_risk = results
            .iter()
            .map(|r| r.analysis.risk_level)
            .max()
            .unwrap_or_default();
        let mut ingredient_alternatives: Vec<String> = Vec::new();
        for alt in results.iter().flat_map(|r| &r.recommendations.alternatives) {
            if !ingredient_alternatives.contains(alt) {
                ingredient_alternatives.push(alt.clone());
            }
        }

        Ok(ComplexFoodAnalysis {
            scan: ScanAnalysis {
                overall_safety: overall,
                flagged_ingredients: flagged,
                condition_warnings: warnings,
                safe_alternatives: profile.preferences.preferred_alternatives.clone(),
                explanation,
                confidence,
                last_updated: Utc::now(),
            },
            ingredient_results: results,
            hidden_ingredients,
            highest_risk,
            ingredient_alternatives,
        })
    }
}

impl Default for VerdictAggregator {
    fn default() -> Self {
        Self::new(IngredientMatcher::default())
    }
}

fn explain(
    tier: SafetyTier,
    enabled: &BTreeSet<GutCondition>,
    warnings: &[ConditionWarning],
) -> String {
    let affected: BTreeSet<GutCondition> = warnings.iter().map(|w| w.condition).collect();
    let labels = affected
        .iter()
        .map(GutCondition::label)
        .collect::<Vec<_>>()
        .join(", ");

    match tier {
        SafetyTier::Safe if enabled.is_empty() => {
            "No gut conditions are enabled in your profile, so nothing was flagged.".to_string()
        }
        SafetyTier::Safe => {
            "No ingredients of concern were found for your conditions. This looks safe to enjoy."
                .to_string()
        }
        SafetyTier::Caution => {
            format!("This item may cause issues with your {labels}. Consider alternatives.")
        }
        SafetyTier::Avoid => {
            format!("Based on your {labels}, we recommend avoiding this item.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::FodmapLevel;
    use crate::profile::ConditionSettings;

    fn gluten_profile(severity: SeverityLevel) -> GutProfile {
        GutProfile::new().with_condition(GutCondition::Gluten, ConditionSettings::enabled(severity))
    }

    #[test]
    fn test_tier_precedence() {
        use SeverityLevel::{Mild, Moderate, Severe};
        assert_eq!(SafetyTier::from_severities([]), SafetyTier::Safe);
        assert_eq!(SafetyTier::from_severities([Mild]), SafetyTier::Caution);
        assert_eq!(SafetyTier::from_severities([Mild, Moderate, Mild]), SafetyTier::Caution);
        assert_eq!(SafetyTier::from_severities([Mild, Moderate, Severe, Mild]), SafetyTier::Avoid);
    }

    #[test]
    fn test_wheat_flour_with_severe_gluten() {
        let aggregator = VerdictAggregator::default();
        let food = FoodItem::new("bread-1", "White bread")
            .with_ingredients(["wheat flour", "vegetable oil", "salt", "yeast"]);
        let scan = aggregator
            .analyze_food(&food, &gluten_profile(SeverityLevel::Severe))
            .unwrap();

        assert_eq!(scan.overall_safety, SafetyTier::Avoid);
        let names = scan.flagged_names();
        assert!(names.contains(&"wheat flour"));
        assert!(names.contains(&"Gluten"));
        assert!(!scan.condition_warnings.is_empty());
        assert!(scan.explanation.contains("recommend avoiding"));
    }

    #[test]
    fn test_single_severe_flag_overrides_milder_ones() {
        let profile = GutProfile::new()
            .with_condition(GutCondition::Additives, ConditionSettings::enabled(SeverityLevel::Mild))
            .with_condition(GutCondition::IbsFodmap, ConditionSettings::enabled(SeverityLevel::Mild));
        let food = FoodItem::new("gum-1", "Sugar-free gum")
            .with_ingredients(["sorbitol", "aspartame", "potassium sorbate", "erythritol"])
            .with_flags(true, true);
        let analysis = VerdictAggregator::default()
            .analyze_complex_food(&food, &profile)
            .unwrap();

        let severities: Vec<_> = analysis
            .scan
            .flagged_ingredients
            .iter()
            .map(|f| f.severity)
            .collect();
        assert_eq!(severities.iter().filter(|s| **s == SeverityLevel::Severe).count(), 1);
        assert_eq!(severities.len(), 4);
        assert_eq!(analysis.scan.overall_safety, SafetyTier::Avoid);
        assert_eq!(analysis.highest_risk, RiskLevel::Severe);
    }

    #[test]
    fn test_caution_explanation() {
        let profile = GutProfile::new()
            .with_condition(GutCondition::Additives, ConditionSettings::enabled(SeverityLevel::Severe));
        let food = FoodItem::new("soda-1", "Diet cola").with_ingredients(["carbonated water", "aspartame"]);
        let scan = VerdictAggregator::default().analyze_food(&food, &profile).unwrap();
        assert_eq!(scan.overall_safety, SafetyTier::Caution);
        assert!(scan.explanation.contains("Consider alternatives"));
        assert!(scan.explanation.contains("additive sensitivity"));
    }

    #[test]
    fn test_safe_item_with_preferred_alternatives() {
        let profile = gluten_profile(SeverityLevel::Severe)
            .with_preferred_alternatives(vec!["rice cakes".to_string()]);
        let food = FoodItem::new("q-1", "Quinoa")
            .with_ingredients(["organic quinoa"])
            .with_flags(true, true)
            .with_fodmap_level(FodmapLevel::Low);
        let scan = VerdictAggregator::default().analyze_food(&food, &profile).unwrap();
        assert_eq!(scan.overall_safety, SafetyTier::Safe);
        assert!(scan.flagged_ingredients.is_empty());
        assert!(scan.condition_warnings.is_empty());
        assert_eq!(scan.safe_alternatives, vec!["rice cakes".to_string()]);
        assert!(scan.explanation.contains("safe"));
    }

    #[test]
    fn test_allergen_escalates_to_avoid() {
        let profile = GutProfile::new().with_condition(
            GutCondition::Allergies,
            ConditionSettings::enabled(SeverityLevel::Mild).with_trigger("sesame"),
        );
        let food = FoodItem::new("h-1", "Hummus")
            .with_ingredients(["chickpeas", "tahini"])
            .with_allergens(["Sesame"]);
        let scan = VerdictAggregator::default().analyze_food(&food, &profile).unwrap();
        assert_eq!(scan.overall_safety, SafetyTier::Avoid);
        assert_eq!(scan.flagged_ingredients[0].source, FlagSource::Allergen);
    }

    #[test]
    fn test_no_ingredients_gives_zero_confidence() {
        let food = FoodItem::new("x", "Mystery snack").with_flags(true, true);
        let scan = VerdictAggregator::default()
            .analyze_food(&food, &gluten_profile(SeverityLevel::Mild))
            .unwrap();
        assert_eq!(scan.confidence, Confidence::zero());
        assert_eq!(scan.overall_safety, SafetyTier::Safe);
    }

    #[test]
    fn test_invalid_food_is_rejected() {
        let err = VerdictAggregator::default()
            .analyze_food(&FoodItem::new("", "Nameless"), &GutProfile::new())
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_hidden_ingredients_collected() {
        let profile = GutProfile::new()
            .with_condition(GutCondition::IbsFodmap, ConditionSettings::enabled(SeverityLevel::Moderate));
        let food = FoodItem::new("c-1", "Crisps")
            .with_ingredients(["potatoes", "sunflower oil", "natural flavoring", "spices"]);
        let analysis = VerdictAggregator::default()
            .analyze_complex_food(&food, &profile)
            .unwrap();
        assert_eq!(analysis.hidden_ingredients, vec!["natural flavoring", "spices"]);
        assert_eq!(analysis.scan.overall_safety, SafetyTier::Safe);
    }
}
