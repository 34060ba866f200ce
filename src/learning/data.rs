//! Learning data: the accumulating scan and symptom history.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::condition::{GutCondition, SeverityLevel};
use crate::error::ValidationError;
use crate::profile::GutProfile;
use crate::verdict::SafetyTier;

/// Kinds of symptoms a user can log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomKind {
    /// Bloating.
    Bloating,
    /// Gas.
    Gas,
    /// Cramps.
    Cramps,
    /// Abdominal pain.
    AbdominalPain,
    /// Diarrhea.
    Diarrhea,
    /// Constipation.
    Constipation,
    /// Nausea.
    Nausea,
    /// Heartburn.
    Heartburn,
    /// Acid or food coming back up.
    Regurgitation,
    /// Headache.
    Headache,
    /// Skin flushing.
    Flushing,
    /// Hives.
    Hives,
    /// Itching.
    Itching,
    /// Fatigue.
    Fatigue,
    /// Poor concentration or mental fog.
    BrainFog,
    /// Anything not listed.
    Other,
}

impl SymptomKind {
    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bloating => "bloating",
            Self::Gas => "gas",
            Self::Cramps => "cramps",
            Self::AbdominalPain => "abdominal_pain",
            Self::Diarrhea => "diarrhea",
            Self::Constipation => "constipation",
            Self::Nausea => "nausea",
            Self::Heartburn => "heartburn",
            Self::Regurgitation => "regurgitation",
            Self::Headache => "headache",
            Self::Flushing => "flushing",
            Self::Hives => "hives",
            Self::Itching => "itching",
            Self::Fatigue => "fatigue",
            Self::BrainFog => "brain_fog",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SymptomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported symptom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomReport {
    /// What was felt.
    pub kind: SymptomKind,
    /// How bad it was.
    #[serde(default)]
    pub severity: SeverityLevel,
}

impl SymptomReport {
    /// Creates a report.
    #[must_use]
    pub const fn new(kind: SymptomKind, severity: SeverityLevel) -> Self {
        Self { kind, severity }
    }
}

/// The user's feedback on a scanned item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserFeedback {
    /// Whether the user reacted after eating it.
    pub had_reaction: bool,
    /// Optional satisfaction rating, 1 to 5.
    #[serde(default)]
    pub rating: Option<u8>,
    /// Free-text remarks.
    #[serde(default)]
    pub notes: Option<String>,
}

impl UserFeedback {
    /// Feedback with no rating or notes.
    #[must_use]
    pub fn new(had_reaction: bool) -> Self {
        Self {
            had_reaction,
            ..Self::default()
        }
    }

    /// Attaches a rating.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidRating` unless `rating` is in 1..=5.
    pub fn with_rating(mut self, rating: u8) -> Result<Self, ValidationError> {
        self.rating = Some(rating);
        self.validate()?;
        Ok(self)
    }

    /// Attaches notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Checks the rating range.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidRating` for a rating outside 1..=5.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.rating {
            Some(rating) if !(1..=5).contains(&rating) => {
                Err(ValidationError::InvalidRating { rating })
            }
            _ => Ok(()),
        }
    }
}

/// A past scan and the verdict it received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Product name as scanned.
    pub food_name: String,
    /// Ingredients as listed at scan time.
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Verdict the scan received.
    pub analysis_result: SafetyTier,
    /// Feedback given afterwards, if any.
    #[serde(default)]
    pub user_feedback: Option<UserFeedback>,
    /// When the scan happened.
    pub timestamp: DateTime<Utc>,
}

impl ScanRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new<I, S>(food_name: impl Into<String>, ingredients: I, analysis_result: SafetyTier) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            food_name: food_name.into(),
            ingredients: ingredients.into_iter().map(Into::into).collect(),
            analysis_result,
            user_feedback: None,
            timestamp: Utc::now(),
        }
    }

    /// Overrides the timestamp.
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attaches feedback.
    #[must_use]
    pub fn with_feedback(mut self, feedback: UserFeedback) -> Self {
        self.user_feedback = Some(feedback);
        self
    }
}

/// A symptom log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomLog {
    /// Reported symptoms.
    pub symptoms: Vec<SymptomReport>,
    /// Foods the user suspects; empty means "anything eaten recently".
    #[serde(default)]
    pub related_food_items: Vec<String>,
    /// When the symptoms were logged.
    pub timestamp: DateTime<Utc>,
}

impl SymptomLog {
    /// Creates a log stamped with the current time.
    #[must_use]
    pub fn new(symptoms: Vec<SymptomReport>) -> Self {
        Self {
            symptoms,
            related_food_items: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Overrides the timestamp.
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Sets the suspected foods.
    #[must_use]
    pub fn with_related<I, S>(mut self, foods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related_food_items = foods.into_iter().map(Into::into).collect();
        self
    }

    /// Distinct symptom kinds in this log, sorted.
    #[must_use]
    pub fn kinds(&self) -> BTreeSet<SymptomKind> {
        self.symptoms.iter().map(|s| s.kind).collect()
    }

    /// Worst reported severity.
    #[must_use]
    pub fn max_severity(&self) -> Option<SeverityLevel> {
        self.symptoms.iter().map(|s| s.severity).max()
    }
}

/// Everything the learning engine learns from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LearningData {
    /// Past scans, oldest first.
    #[serde(default)]
    pub scan_history: Vec<ScanRecord>,
    /// Symptom logs, oldest first.
    #[serde(default)]
    pub symptom_logs: Vec<SymptomLog>,
    /// The profile the data belongs to.
    #[serde(default)]
    pub gut_profile: GutProfile,
}

impl LearningData {
    /// Empty data with a default profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored profile.
    #[must_use]
    pub fn with_profile(mut self, profile: GutProfile) -> Self {
        self.gut_profile = profile;
        self
    }

    /// Conditions enabled in the stored profile.
    #[must_use]
    pub fn user_conditions(&self) -> BTreeSet<GutCondition> {
        self.gut_profile.enabled_conditions()
    }

    /// Scans plus symptom logs.
    #[must_use]
    pub fn data_point_count(&self) -> usize {
        self.scan_history.len() + self.symptom_logs.len()
    }

    /// Scans and logs no older than `window` relative to `now`.
    #[must_use]
    pub fn recent_count(&self, now: DateTime<Utc>, window: Duration) -> usize {
        let cutoff = now - window;
        let scans = self.scan_history.iter().filter(|s| s.timestamp >= cutoff).count();
        let logs = self.symptom_logs.iter().filter(|l| l.timestamp >= cutoff).count();
        scans + logs
    }

    /// Appends another snapshot's history to this one.
    pub fn append(&mut self, other: Self) {
        self.scan_history.extend(other.scan_history);
        self.symptom_logs.extend(other.symptom_logs);
    }

    /// Checks the profile and every feedback rating.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.gut_profile.validate()?;
        for scan in &self.scan_history {
            if scan.food_name.trim().is_empty() {
                return Err(ValidationError::MissingField {
                    field: "scan_history[].food_name".to_string(),
                });
            }
            if let Some(feedback) = &scan.user_feedback {
                feedback.validate()?;
            }
        }
        Ok(())
    }
}
