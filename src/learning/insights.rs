//! Insight, metric and prediction types produced by the learning engine.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::condition::GutCondition;
use crate::confidence::Confidence;

/// Kind of mined pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// An ingredient that keeps showing up in flagged scans.
    FoodTrigger,
    /// A recurring combination of symptoms.
    SymptomPattern,
    /// Symptoms that point to one condition.
    ConditionCorrelation,
    /// A time of day when symptoms cluster.
    TimingPattern,
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FoodTrigger => write!(f, "food_trigger"),
            Self::SymptomPattern => write!(f, "symptom_pattern"),
            Self::ConditionCorrelation => write!(f, "condition_correlation"),
            Self::TimingPattern => write!(f, "timing_pattern"),
        }
    }
}

/// How soon symptoms follow a related scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingClass {
    /// Within the immediate window (2 hours by default).
    Immediate,
    /// Within the delayed window (24 hours by default).
    Delayed,
    /// No related scan within the delayed window.
    Chronic,
}

impl fmt::Display for TimingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate => write!(f, "immediate"),
            Self::Delayed => write!(f, "delayed"),
            Self::Chronic => write!(f, "chronic"),
        }
    }
}

/// Time-of-day bucket of a symptom log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    /// 06:00 to 12:00.
    Morning,
    /// 12:00 to 18:00.
    Afternoon,
    /// 18:00 to 22:00.
    Evening,
    /// 22:00 to 06:00.
    Night,
}

impl TimeOfDay {
    /// Bucket for a local hour: morning 6-12, afternoon 12-18, evening 18-22.
    #[must_use]
    pub const fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            18..=21 => Self::Evening,
            _ => Self::Night,
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evidence backing an insight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Number of occurrences.
    pub frequency: usize,
    /// Strongest severity score seen, in [0, 1].
    pub severity: f64,
    /// How reliably the pattern holds, in [0, 1].
    pub consistency: f64,
}

/// A mined pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternInsight {
    /// What kind of pattern this is.
    pub insight_type: InsightType,
    /// Ingredient, symptom combination, time bucket or condition.
    pub subject: String,
    /// Frequency-based confidence, capped.
    pub confidence: Confidence,
    /// Human-readable summary.
    pub description: String,
    /// Counts behind the confidence.
    pub evidence: Evidence,
    /// Advice specific to this pattern.
    pub recommendations: Vec<String>,
    /// Conditions the pattern relates to.
    pub affected_conditions: BTreeSet<GutCondition>,
    /// Only set on symptom patterns.
    #[serde(default)]
    pub timing: Option<TimingClass>,
}

/// Actionable advice derived from the insights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Text shown to the user.
    pub message: String,
    /// Confidence of the pattern behind it; zero for general advice.
    pub confidence: Confidence,
    /// Insight type that produced it; `None` for general advice.
    #[serde(default)]
    pub source: Option<InsightType>,
}

/// Quality of the learning data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DataQuality {
    /// Data volume relative to the completeness target.
    pub completeness: Confidence,
    /// How stable repeated verdicts are.
    pub consistency: Confidence,
    /// Share of recent activity.
    pub recency: Confidence,
}

/// Snapshot of everything learned so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningInsights {
    /// Surfaced patterns, highest confidence first.
    pub patterns: Vec<PatternInsight>,
    /// De-duplicated advice across all patterns.
    pub recommendations: Vec<Recommendation>,
    /// Mean confidence of the patterns and the advice they produced.
    pub confidence: Confidence,
    /// Quality of the underlying data.
    pub data_quality: DataQuality,
    /// When the snapshot was computed.
    pub last_updated: DateTime<Utc>,
}

impl LearningInsights {
    /// Patterns of one type, in confidence order.
    pub fn of_type(&self, insight_type: InsightType) -> impl Iterator<Item = &PatternInsight> + '_ {
        self.patterns.iter().filter(move |p| p.insight_type == insight_type)
    }
}

/// How well the engine is doing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningMetrics {
    /// Scans plus symptom logs.
    pub total_data_points: usize,
    /// Agreement between flagged verdicts and reported reactions.
    pub learning_accuracy: Confidence,
    /// Share of symptom logs explained by a flagged scan.
    pub prediction_accuracy: Confidence,
    /// Mean feedback rating scaled to [0, 1].
    pub user_satisfaction: Confidence,
    /// Share of data points from the last seven days.
    pub adaptation_rate: Confidence,
    /// When the metrics were computed.
    pub last_evaluation: DateTime<Utc>,
}

/// Learned risk of a specific food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRiskPrediction {
    /// The food being assessed.
    pub food_name: String,
    /// Strongest learned risk among the matched triggers.
    pub risk_score: Confidence,
    /// Learned trigger ingredients present in the food.
    pub matched_triggers: Vec<String>,
    /// How much to trust the score.
    pub confidence: Confidence,
}
