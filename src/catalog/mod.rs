//! Trigger catalog: the curated table of hidden problematic substances.
//!
//! The catalog is static, versioned data. Each matcher owns its own copy so
//! there is no process-wide state.

mod builtin;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::condition::{GutCondition, SeverityLevel};

/// Functional category of a hidden trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCategory {
    /// Sugar substitute or polyol.
    Sweetener,
    /// Antimicrobial or antioxidant preservative.
    Preservative,
    /// Emulsifier.
    Emulsifier,
    /// Thickener, gum or stabilizer.
    Stabilizer,
    /// Synthetic or natural colorant.
    Color,
    /// Flavor enhancer.
    Flavor,
    /// Other food additive.
    Additive,
    /// Whole food or anything else.
    Other,
}

impl fmt::Display for TriggerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Sweetener => "sweetener",
            Self::Preservative => "preservative",
            Self::Emulsifier => "emulsifier",
            Self::Stabilizer => "stabilizer",
            Self::Color => "color",
            Self::Flavor => "flavor",
            Self::Additive => "additive",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// Where a trigger definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerOrigin {
    /// Built-in catalog entry.
    Catalog,
    /// Synthesized from a user's personal trigger list.
    Custom {
        /// Condition the user declared it under.
        condition: GutCondition,
    },
}

/// A substance that can hide behind many label names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenTrigger {
    /// Display name, also matched against ingredient text.
    pub name: String,
    /// Alternative label names.
    #[serde(default)]
    pub aliases: BTreeSet<String>,
    /// EU additive code, when the substance has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e_number: Option<String>,
    /// Functional category.
    pub category: TriggerCategory,
    /// Conditions this trigger affects.
    pub problematic_conditions: BTreeSet<GutCondition>,
    /// Severity applied when the trigger is detected.
    pub severity: SeverityLevel,
    /// Why the substance is a problem.
    pub description: String,
    /// Product types that commonly contain it.
    #[serde(default)]
    pub common_sources: Vec<String>,
    /// Substitutes that avoid the trigger.
    #[serde(default)]
    pub safe_alternatives: Vec<String>,
    /// Extra terms that indicate the trigger.
    #[serde(default)]
    pub detection_keywords: Vec<String>,
    /// Built-in or user-declared.
    pub origin: TriggerOrigin,
}

impl HiddenTrigger {
    /// Synthesizes a personal trigger declared under `condition`.
    ///
    /// Personal triggers are always treated as severe.
    #[must_use]
    pub fn custom(name: impl Into<String>, condition: GutCondition) -> Self {
        let name = name.into();
        Self {
            description: format!("Personal trigger you listed for {}", condition.label()),
            detection_keywords: vec![name.clone()],
            name,
            aliases: BTreeSet::new(),
            e_number: None,
            category: TriggerCategory::Other,
            problematic_conditions: BTreeSet::from([condition]),
            severity: SeverityLevel::Severe,
            common_sources: Vec::new(),
            safe_alternatives: Vec::new(),
            origin: TriggerOrigin::Custom { condition },
        }
    }

    /// True for triggers synthesized from a personal list.
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self.origin, TriggerOrigin::Custom { .. })
    }

    /// True if any of this trigger's conditions is in `conditions`.
    #[must_use]
    pub fn affects_any(&self, conditions: &BTreeSet<GutCondition>) -> bool {
        !self.problematic_conditions.is_disjoint(conditions)
    }
}

/// Versioned collection of hidden triggers.
#[derive(Debug, Clone)]
pub struct TriggerCatalog {
    version: String,
    entries: Vec<HiddenTrigger>,
}

impl TriggerCatalog {
    /// Version of the built-in table.
    pub const BUILTIN_VERSION: &'static str = "2024.2";

    /// The curated built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            version: Self::BUILTIN_VERSION.to_string(),
            entries: builtin::entries(),
        }
    }

    /// A catalog with caller-supplied entries.
    #[must_use]
    pub fn from_entries(version: impl Into<String>, entries: Vec<HiddenTrigger>) -> Self {
        Self {
            version: version.into(),
            entries,
        }
    }

    /// Version label of the table.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Entries in table order.
    #[must_use]
    pub fn entries(&self) -> &[HiddenTrigger] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup by entry name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&HiddenTrigger> {
        self.entries
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Entries that matter for at least one of `conditions`.
    pub fn relevant_to<'a>(
        &'a self,
        conditions: &'a BTreeSet<GutCondition>,
    ) -> impl Iterator<Item = &'a HiddenTrigger> + 'a {
        self.entries.iter().filter(move |t| t.affects_any(conditions))
    }
}

impl Default for TriggerCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Generic label terms that conceal the real substance.
pub const VAGUE_TERMS: &[&str] = &[
    "natural flavor",
    "natural flavour",
    "artificial flavor",
    "flavoring",
    "flavouring",
    "spices",
    "spice blend",
    "seasoning",
    "preservatives",
    "emulsifiers",
    "stabilizers",
    "thickeners",
    "colorings",
    "color added",
    "artificial color",
    "natural color",
    "modified starch",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_has_core_entries() {
        let catalog = TriggerCatalog::builtin();
        assert_eq!(catalog.version(), TriggerCatalog::BUILTIN_VERSION);
        for name in ["Aspartame", "Sorbitol", "Carrageenan", "Inulin", "Sulfites"] {
            assert!(catalog.find(name).is_some(), "missing {name}");
        }
        assert!(catalog.find("sorbitol").is_some());
        assert!(catalog.find("quinoa").is_none());
    }

    #[test]
    fn test_builtin_entries_are_well_formed() {
        let catalog = TriggerCatalog::builtin();
        let mut names = BTreeSet::new();
        for entry in catalog.entries() {
            assert!(!entry.name.trim().is_empty());
            assert!(!entry.problematic_conditions.is_empty(), "{} has no conditions", entry.name);
            assert_eq!(entry.origin, TriggerOrigin::Catalog);
            assert!(names.insert(entry.name.to_ascii_lowercase()), "duplicate {}", entry.name);
        }
    }

    #[test]
    fn test_sorbitol_is_severe_fodmap() {
        let catalog = TriggerCatalog::builtin();
        let sorbitol = catalog.find("Sorbitol").unwrap();
        assert_eq!(sorbitol.severity, SeverityLevel::Severe);
        assert!(sorbitol.problematic_conditions.contains(&GutCondition::IbsFodmap));
        assert_eq!(sorbitol.e_number.as_deref(), Some("E420"));
    }

    #[test]
    fn test_relevant_to_filters_by_condition() {
        let catalog = TriggerCatalog::builtin();
        let gluten_only = BTreeSet::from([GutCondition::Gluten]);
        let relevant: Vec<_> = catalog.relevant_to(&gluten_only).collect();
        assert!(!relevant.is_empty());
        assert!(relevant.iter().all(|t| t.problematic_conditions.contains(&GutCondition::Gluten)));
        assert!(relevant.iter().all(|t| t.name != "Carrageenan"));
    }

    #[test]
    fn test_custom_trigger_is_severe() {
        let t = HiddenTrigger::custom("paprika", GutCondition::Reflux);
        assert!(t.is_custom());
        assert_eq!(t.severity, SeverityLevel::Severe);
        assert_eq!(t.problematic_conditions, BTreeSet::from([GutCondition::Reflux]));
        assert_eq!(t.origin, TriggerOrigin::Custom { condition: GutCondition::Reflux });
    }
}
