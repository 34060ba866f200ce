//! Gut conditions and severity levels.
//!
//! Conditions are a closed set: an unknown condition name is a validation
//! error at the boundary, never a silent no-match deeper in the engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A digestive sensitivity a user may enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GutCondition {
    /// Irritable bowel syndrome on a low-FODMAP diet.
    IbsFodmap,
    /// Gluten sensitivity or celiac disease.
    Gluten,
    /// Lactose intolerance.
    Lactose,
    /// Acid reflux / GERD.
    Reflux,
    /// Histamine intolerance.
    Histamine,
    /// Food allergies.
    Allergies,
    /// Sensitivity to food additives.
    Additives,
}

impl GutCondition {
    /// Every condition, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::IbsFodmap,
        Self::Gluten,
        Self::Lactose,
        Self::Reflux,
        Self::Histamine,
        Self::Allergies,
        Self::Additives,
    ];

    /// Wire name of the condition.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IbsFodmap => "ibs_fodmap",
            Self::Gluten => "gluten",
            Self::Lactose => "lactose",
            Self::Reflux => "reflux",
            Self::Histamine => "histamine",
            Self::Allergies => "allergies",
            Self::Additives => "additives",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::IbsFodmap => "IBS (FODMAP)",
            Self::Gluten => "gluten sensitivity",
            Self::Lactose => "lactose intolerance",
            Self::Reflux => "acid reflux",
            Self::Histamine => "histamine intolerance",
            Self::Allergies => "food allergies",
            Self::Additives => "additive sensitivity",
        }
    }
}

impl fmt::Display for GutCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GutCondition {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or(ValidationError::UnknownCondition {
                name: s.to_string(),
            })
    }
}

/// Ordered severity: `Mild < Moderate < Severe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLevel {
    /// Usually tolerated in small amounts.
    Mild,
    /// Limit intake.
    Moderate,
    /// Avoid.
    Severe,
}

impl SeverityLevel {
    /// Numeric weight in (0, 1].
    #[must_use]
    pub fn score(&self) -> f64 {
        match self {
            Self::Mild => 1.0 / 3.0,
            Self::Moderate => 2.0 / 3.0,
            Self::Severe => 1.0,
        }
    }
}

impl Default for SeverityLevel {
    fn default() -> Self {
        Self::Moderate
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mild => write!(f, "mild"),
            Self::Moderate => write!(f, "moderate"),
            Self::Severe => write!(f, "severe"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_from_str() {
        assert_eq!("ibs_fodmap".parse::<GutCondition>().unwrap(), GutCondition::IbsFodmap);
        assert_eq!(" Gluten ".parse::<GutCondition>().unwrap(), GutCondition::Gluten);
        let err = "celiac".parse::<GutCondition>().unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownCondition {
                name: "celiac".to_string()
            }
        );
    }

    #[test]
    fn test_condition_roundtrip_names() {
        for c in GutCondition::ALL {
            assert_eq!(c.as_str().parse::<GutCondition>().unwrap(), c);
            let json = serde_json::to_string(&c).unwrap();
            assert_eq!(json, format!("\"{}\"", c.as_str()));
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(SeverityLevel::Mild < SeverityLevel::Moderate);
        assert!(SeverityLevel::Moderate < SeverityLevel::Severe);
        assert_eq!(
            [SeverityLevel::Mild, SeverityLevel::Severe, SeverityLevel::Moderate]
                .into_iter()
                .max(),
            Some(SeverityLevel::Severe)
        );
    }

    #[test]
    fn test_severity_score_is_monotonic() {
        assert!(SeverityLevel::Mild.score() < SeverityLevel::Moderate.score());
        assert!(SeverityLevel::Moderate.score() < SeverityLevel::Severe.score());
        assert!((SeverityLevel::Severe.score() - 1.0).abs() < f64::EPSILON);
    }
}
