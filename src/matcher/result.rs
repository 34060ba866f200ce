//! Per-ingredient analysis results.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{HiddenTrigger, TriggerCategory};
use crate::condition::{GutCondition, SeverityLevel};
use crate::confidence::Confidence;

/// Risk tier of a single ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// No trigger detected.
    #[default]
    Low,
    /// Strongest trigger is mild.
    Moderate,
    /// Strongest trigger is moderate.
    High,
    /// Strongest trigger is severe.
    Severe,
}

impl RiskLevel {
    /// Maps the maximum detected trigger severity to a risk level.
    ///
    /// severe → severe, moderate → high, mild → moderate, none → low.
    #[must_use]
    pub const fn from_max_severity(severity: Option<SeverityLevel>) -> Self {
        match severity {
            Some(SeverityLevel::Severe) => Self::Severe,
            Some(SeverityLevel::Moderate) => Self::High,
            Some(SeverityLevel::Mild) => Self::Moderate,
            None => Self::Low,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Moderate => write!(f, "moderate"),
            Self::High => write!(f, "high"),
            Self::Severe => write!(f, "severe"),
        }
    }
}

/// Category assigned from the ingredient text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientCategory {
    /// Sauce, dressing or marinade.
    Sauce,
    /// Preservative.
    Preservative,
    /// Sweetener or sugar.
    Sweetener,
    /// Emulsifier or stabilizer.
    Emulsifier,
    /// Colorant.
    Color,
    /// Flavoring or enhancer.
    Flavor,
    /// Anything else.
    #[default]
    Other,
}

impl From<TriggerCategory> for IngredientCategory {
    fn from(category: TriggerCategory) -> Self {
        match category {
            TriggerCategory::Sweetener => Self::Sweetener,
            TriggerCategory::Preservative => Self::Preservative,
            TriggerCategory::Emulsifier | TriggerCategory::Stabilizer => Self::Emulsifier,
            TriggerCategory::Color => Self::Color,
            TriggerCategory::Flavor => Self::Flavor,
            TriggerCategory::Additive | TriggerCategory::Other => Self::Other,
        }
    }
}

/// Text-level analysis details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IngredientAnalysis {
    /// Text after normalization.
    pub normalized_text: String,
    /// Catalog or personal terms that produced a hit, in detection order.
    pub detected_keywords: Vec<String>,
    /// Category from keyword rules.
    pub category: IngredientCategory,
    /// Risk tier from the strongest trigger.
    pub risk_level: RiskLevel,
}

/// What the user should do about the ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IngredientRecommendations {
    /// A severe trigger was found.
    pub avoid: bool,
    /// A non-severe trigger was found.
    pub caution: bool,
    /// Substitutes from every detected trigger.
    pub alternatives: Vec<String>,
    /// Ways to eat around the trigger.
    pub modifications: Vec<String>,
}

/// Verdict for one ingredient string against one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientAnalysisResult {
    /// The caller's raw ingredient text.
    pub ingredient: String,
    /// At least one trigger was detected.
    pub is_problematic: bool,
    /// The label uses a generic term that conceals the real substance.
    pub is_hidden: bool,
    /// Catalog triggers first, then personal ones.
    pub detected_triggers: Vec<HiddenTrigger>,
    /// How certain the match is.
    pub confidence: Confidence,
    /// Text-level details.
    pub analysis: IngredientAnalysis,
    /// Suggested action.
    pub recommendations: IngredientRecommendations,
}

impl IngredientAnalysisResult {
    /// Highest severity among detected triggers.
    #[must_use]
    pub fn max_severity(&self) -> Option<SeverityLevel> {
        self.detected_triggers.iter().map(|t| t.severity).max()
    }

    /// Conditions touched by the detected triggers, restricted to `enabled`.
    #[must_use]
    pub fn affected_conditions(&self, enabled: &BTreeSet<GutCondition>) -> BTreeSet<GutCondition> {
        self.detected_triggers
            .iter()
            .flat_map(|t| t.problematic_conditions.iter().copied())
            .filter(|c| enabled.contains(c))
            .collect()
    }

    /// Names of the detected triggers.
    #[must_use]
    pub fn trigger_names(&self) -> Vec<&str> {
        self.detected_triggers.iter().map(|t| t.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_mapping() {
        assert_eq!(RiskLevel::from_max_severity(Some(SeverityLevel::Severe)), RiskLevel::Severe);
        assert_eq!(RiskLevel::from_max_severity(Some(SeverityLevel::Moderate)), RiskLevel::High);
        assert_eq!(RiskLevel::from_max_severity(Some(SeverityLevel::Mild)), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_max_severity(None), RiskLevel::Low);
    }

    #[test]
    fn test_risk_level_is_monotonic_in_severity() {
        let ordered = [
            None,
            Some(SeverityLevel::Mild),
            Some(SeverityLevel::Moderate),
            Some(SeverityLevel::Severe),
        ];
        for pair in ordered.windows(2) {
            assert!(RiskLevel::from_max_severity(pair[0]) < RiskLevel::from_max_severity(pair[1]));
        }
    }

    #[test]
    fn test_category_from_trigger_category() {
        assert_eq!(IngredientCategory::from(TriggerCategory::Stabilizer), IngredientCategory::Emulsifier);
        assert_eq!(IngredientCategory::from(TriggerCategory::Additive), IngredientCategory::Other);
        assert_eq!(IngredientCategory::from(TriggerCategory::Color), IngredientCategory::Color);
    }
}
