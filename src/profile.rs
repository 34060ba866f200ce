//! User gut-health profile.
//!
//! The profile is owned by the host application. The engine reads it and
//! only ever replaces its cached copy wholesale.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::condition::{GutCondition, SeverityLevel};
use crate::error::ValidationError;

/// Unique identifier for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(Uuid);

impl ProfileId {
    /// Creates a new random profile ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-condition settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConditionSettings {
    /// Whether the condition is active for this user.
    pub enabled: bool,
    /// How strongly the user reacts.
    pub severity: SeverityLevel,
    /// Ingredients the user has personally identified as triggers.
    #[serde(default)]
    pub known_triggers: BTreeSet<String>,
}

impl ConditionSettings {
    /// Enabled settings with the given severity.
    #[must_use]
    pub fn enabled(severity: SeverityLevel) -> Self {
        Self {
            enabled: true,
            severity,
            known_triggers: BTreeSet::new(),
        }
    }

    /// Adds a personal trigger.
    #[must_use]
    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.known_triggers.insert(trigger.into());
        self
    }
}

/// Dietary preferences.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Free-form restrictions such as "vegan".
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    /// Products or foods the user likes to fall back on.
    #[serde(default)]
    pub preferred_alternatives: Vec<String>,
}

/// A user's gut-health profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GutProfile {
    /// Stable profile identifier.
    pub id: ProfileId,
    /// Per-condition settings, enabled or not.
    #[serde(default)]
    pub conditions: BTreeMap<GutCondition, ConditionSettings>,
    /// Dietary preferences.
    #[serde(default)]
    pub preferences: Preferences,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl GutProfile {
    /// Creates an empty profile (no conditions enabled).
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: ProfileId::new(),
            conditions: BTreeMap::new(),
            preferences: Preferences::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the settings for a condition.
    #[must_use]
    pub fn with_condition(mut self, condition: GutCondition, settings: ConditionSettings) -> Self {
        self.conditions.insert(condition, settings);
        self
    }

    /// Sets the preferred alternatives.
    #[must_use]
    pub fn with_preferred_alternatives(mut self, alternatives: Vec<String>) -> Self {
        self.preferences.preferred_alternatives = alternatives;
        self
    }

    /// Conditions currently enabled, sorted.
    #[must_use]
    pub fn enabled_conditions(&self) -> BTreeSet<GutCondition> {
        self.conditions
            .iter()
            .filter(|(_, s)| s.enabled)
            .map(|(c, _)| *c)
            .collect()
    }

    /// True if `condition` is present and enabled.
    #[must_use]
    pub fn is_enabled(&self, condition: GutCondition) -> bool {
        self.conditions.get(&condition).is_some_and(|s| s.enabled)
    }

    /// Configured severity for an enabled condition.
    #[must_use]
    pub fn severity_for(&self, condition: GutCondition) -> Option<SeverityLevel> {
        self.conditions
            .get(&condition)
            .filter(|s| s.enabled)
            .map(|s| s.severity)
    }

    /// Personal triggers of enabled conditions only.
    #[must_use]
    pub fn known_triggers(&self) -> BTreeMap<GutCondition, BTreeSet<String>> {
        self.conditions
            .iter()
            .filter(|(_, s)| s.enabled && !s.known_triggers.is_empty())
            .map(|(c, s)| (*c, s.known_triggers.clone()))
            .collect()
    }

    /// Checks the profile shape.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` for a blank personal trigger.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (condition, settings) in &self.conditions {
            if settings.known_triggers.iter().any(|t| t.trim().is_empty()) {
                return Err(ValidationError::MissingField {
                    field: format!("conditions.{condition}.known_triggers[]"),
                });
            }
        }
        Ok(())
    }
}

impl Default for GutProfile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> GutProfile {
        GutProfile::new()
            .with_condition(
                GutCondition::Gluten,
                ConditionSettings::enabled(SeverityLevel::Severe).with_trigger("barley"),
            )
            .with_condition(
                GutCondition::Lactose,
                ConditionSettings {
                    enabled: false,
                    severity: SeverityLevel::Mild,
                    known_triggers: BTreeSet::from(["cream".to_string()]),
                },
            )
    }

    #[test]
    fn test_enabled_conditions() {
        let p = profile();
        assert_eq!(p.enabled_conditions(), BTreeSet::from([GutCondition::Gluten]));
        assert!(p.is_enabled(GutCondition::Gluten));
        assert!(!p.is_enabled(GutCondition::Lactose));
        assert!(!p.is_enabled(GutCondition::Reflux));
    }

    #[test]
    fn test_severity_only_for_enabled() {
        let p = profile();
        assert_eq!(p.severity_for(GutCondition::Gluten), Some(SeverityLevel::Severe));
        assert_eq!(p.severity_for(GutCondition::Lactose), None);
    }

    #[test]
    fn test_known_triggers_skip_disabled() {
        let triggers = profile().known_triggers();
        assert_eq!(triggers.len(), 1);
        assert!(triggers[&GutCondition::Gluten].contains("barley"));
    }

    #[test]
    fn test_validate_rejects_blank_trigger() {
        let p = GutProfile::new().with_condition(
            GutCondition::Reflux,
            ConditionSettings::enabled(SeverityLevel::Mild).with_trigger("   "),
        );
        assert!(matches!(p.validate(), Err(ValidationError::MissingField { .. })));
        assert!(profile().validate().is_ok());
    }

    #[test]
    fn test_profile_serialization() {
        let p = profile();
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"gluten\""));
        let back: GutProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
