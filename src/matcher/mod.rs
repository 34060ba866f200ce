//! Ingredient matcher.
//!
//! Scans one ingredient string against the trigger catalog and the user's
//! personal triggers. Matching per catalog entry goes name, then aliases
//! (including the E-number), then detection keywords; personal triggers are
//! checked last. A catalog hit only counts when the entry affects one of the
//! user's enabled conditions.

mod cache;
pub mod normalize;
pub mod result;

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use tracing::{debug, trace};

use crate::catalog::{HiddenTrigger, TriggerCatalog, VAGUE_TERMS};
use crate::condition::{GutCondition, SeverityLevel};
use crate::confidence::Confidence;

use self::cache::{CacheKey, ResultCache};

pub use normalize::{contains_term, normalize};
pub use result::{
    IngredientAnalysis, IngredientAnalysisResult, IngredientCategory, IngredientRecommendations,
    RiskLevel,
};

/// Matcher configuration.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Whether results are cached at all.
    pub cache_enabled: bool,
    /// Time-to-live of a cached result.
    pub cache_ttl: Duration,
    /// Maximum number of cached results.
    pub cache_capacity: u64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_ttl: Duration::from_secs(60 * 60),
            cache_capacity: 10_000,
        }
    }
}

const BASE_CONFIDENCE: f64 = 0.5;
const TRIGGER_BONUS: f64 = 0.3;
const E_NUMBER_BONUS: f64 = 0.2;
const VAGUE_PENALTY: f64 = 0.1;

/// Catalog terms pre-normalized once per matcher.
struct CompiledEntry {
    name: String,
    aliases: Vec<String>,
    keywords: Vec<String>,
}

impl CompiledEntry {
    fn new(trigger: &HiddenTrigger) -> Self {
        let aliases = trigger
            .aliases
            .iter()
            .map(String::as_str)
            .chain(trigger.e_number.as_deref())
            .map(normalize)
            .filter(|t| !t.is_empty())
            .collect();
        let keywords = trigger
            .detection_keywords
            .iter()
            .map(|k| normalize(k))
            .filter(|t| !t.is_empty())
            .collect();
        Self {
            name: normalize(&trigger.name),
            aliases,
            keywords,
        }
    }

    /// First term that matches, in name → alias → keyword order.
    fn find_term(&self, normalized: &str) -> Option<&str> {
        if contains_term(normalized, &self.name) {
            return Some(&self.name);
        }
        self.aliases
            .iter()
            .chain(self.keywords.iter())
            .find(|term| contains_term(normalized, term))
            .map(String::as_str)
    }
}

/// Matches ingredient text against hidden triggers.
///
/// One matcher per user session; it owns its catalog copy and result cache.
pub struct IngredientMatcher {
    catalog: TriggerCatalog,
    compiled: Vec<CompiledEntry>,
    vague_terms: Vec<String>,
    cache: Option<ResultCache>,
}

impl IngredientMatcher {
    /// Creates a matcher over the built-in catalog.
    #[must_use]
    pub fn new(config: &MatcherConfig) -> Self {
        Self::with_catalog(TriggerCatalog::builtin(), config)
    }

    /// Creates a matcher over a caller-supplied catalog.
    #[must_use]
    pub fn with_catalog(catalog: TriggerCatalog, config: &MatcherConfig) -> Self {
        let compiled = catalog.entries().iter().map(CompiledEntry::new).collect();
        let vague_terms = VAGUE_TERMS.iter().map(|t| normalize(t)).collect();
        let cache = config
            .cache_enabled
            .then(|| ResultCache::new(config.cache_capacity, config.cache_ttl));
        Self {
            catalog,
            compiled,
            vague_terms,
            cache,
        }
    }

    /// The catalog this matcher was compiled from.
    #[must_use]
    pub fn catalog(&self) -> &TriggerCatalog {
        &self.catalog
    }

    /// Analyzes one ingredient string.
    ///
    /// `user_triggers` maps each condition to the user's personal triggers;
    /// entries for conditions not in `user_conditions` are ignored.
    #[must_use]
    pub fn match_ingredient(
        &self,
        ingredient: &str,
        user_conditions: &BTreeSet<GutCondition>,
        user_triggers: &BTreeMap<GutCondition, BTreeSet<String>>,
    ) -> IngredientAnalysisResult {
        let normalized = normalize(ingredient);

        let Some(cache) = &self.cache else {
            return self.compute(ingredient, normalized, user_conditions, user_triggers);
        };

        let key = CacheKey::new(&normalized, user_conditions, user_triggers);
        if let Some(mut hit) = cache.get(&key) {
            trace!(ingredient = %normalized, "ingredient cache hit");
            hit.ingredient = ingredient.to_string();
            return hit;
        }

        trace!(ingredient = %normalized, "ingredient cache miss");
        let result = self.compute(ingredient, normalized, user_conditions, user_triggers);
        cache.insert(key, result.clone());
        result
    }

    /// Analyzes every ingredient of a list, preserving order.
    #[must_use]
    pub fn match_all(
        &self,
        ingredients: &[String],
        user_conditions: &BTreeSet<GutCondition>,
        user_triggers: &BTreeMap<GutCondition, BTreeSet<String>>,
    ) -> Vec<IngredientAnalysisResult> {
        ingredients
            .iter()
            .map(|i| self.match_ingredient(i, user_conditions, user_triggers))
            .collect()
    }

    /// Number of live cache entries (zero when caching is disabled).
    #[must_use]
    pub fn cache_len(&self) -> u64 {
        self.cache.as_ref().map_or(0, ResultCache::len)
    }

    /// Drops every cached result.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    fn compute(
        &self,
        ingredient: &str,
        normalized: String,
        user_conditions: &BTreeSet<GutCondition>,
        user_triggers: &BTreeMap<GutCondition, BTreeSet<String>>,
    ) -> IngredientAnalysisResult {
        let mut detected: Vec<HiddenTrigger> = Vec::new();
        let mut keywords: Vec<String> = Vec::new();

        for (trigger, entry) in self.catalog.entries().iter().zip(&self.compiled) {
            if !trigger.affects_any(user_conditions) {
                continue;
            }
            if let Some(term) = entry.find_term(&normalized) {
                keywords.push(term.to_string());
                detected.push(trigger.clone());
            }
        }

        for (condition, triggers) in user_triggers {
            if !user_conditions.contains(condition) {
                continue;
            }
            for raw in triggers {
                let term = normalize(raw);
                if !contains_term(&normalized, &term) {
                    continue;
                }
                match detected.iter_mut().find(|t| normalize(&t.name) == term) {
                    Some(existing) if existing.is_custom() => {
                        existing.problematic_conditions.insert(*condition);
                    }
                    Some(_) => {}
                    None => {
                        keywords.push(term);
                        detected.push(HiddenTrigger::custom(raw.trim(), *condition));
                    }
                }
            }
        }

        let is_hidden = self
            .vague_terms
            .iter()
            .any(|t| contains_term(&normalized, t));

        let mut confidence = BASE_CONFIDENCE;
        if !detected.is_empty() {
            confidence += TRIGGER_BONUS;
        }
        if normalize::has_e_number(&normalized) {
            confidence += E_NUMBER_BONUS;
        }
        if normalize::has_vague_word(&normalized) {
            confidence -= VAGUE_PENALTY;
        }

        let max_severity = detected.iter().map(|t| t.severity).max();
        let mut category = normalize::categorize(&normalized);
        if category == IngredientCategory::Other {
            if let Some(first) = detected.iter().find(|t| !t.is_custom()) {
                category = first.category.into();
            }
        }

        let recommendations = recommend(&detected);

        if !detected.is_empty() {
            debug!(
                ingredient = %normalized,
                triggers = detected.len(),
                max_severity = ?max_severity,
                "hidden triggers detected"
            );
        }

        IngredientAnalysisResult {
            ingredient: ingredient.to_string(),
            is_problematic: !detected.is_empty(),
            is_hidden,
            confidence: Confidence::clamped(confidence),
            analysis: IngredientAnalysis {
                normalized_text: normalized,
                detected_keywords: keywords,
                category,
                risk_level: RiskLevel::from_max_severity(max_severity),
            },
            recommendations,
            detected_triggers: detected,
        }
    }
}

impl Default for IngredientMatcher {
    fn default() -> Self {
        Self::new(&MatcherConfig::default())
    }
}

fn recommend(detected: &[HiddenTrigger]) -> IngredientRecommendations {
    let mut alternatives: Vec<String> = Vec::new();
    for alt in detected.iter().flat_map(|t| &t.safe_alternatives) {
        if !alternatives.iter().any(|a| a.eq_ignore_ascii_case(alt)) {
            alternatives.push(alt.clone());
        }
    }

    let modifications = detected
        .iter()
        .map(|t| match t.severity {
            SeverityLevel::Severe => format!("Avoid {}: {}", t.name, t.description),
            SeverityLevel::Moderate => format!("Limit {} and watch for symptoms", t.name),
            SeverityLevel::Mild => format!("{} is usually tolerated in small amounts", t.name),
        })
        .collect();

    IngredientRecommendations {
        avoid: detected.iter().any(|t| t.severity == SeverityLevel::Severe),
        caution: detected.iter().any(|t| t.severity == SeverityLevel::Moderate),
        alternatives,
        modifications,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(items: &[GutCondition]) -> BTreeSet<GutCondition> {
        items.iter().copied().collect()
    }

    fn no_triggers() -> BTreeMap<GutCondition, BTreeSet<String>> {
        BTreeMap::new()
    }

    #[test]
    fn test_aspartame_case_and_format_insensitive() {
        let matcher = IngredientMatcher::default();
        for conds in [[GutCondition::IbsFodmap], [GutCondition::Additives]] {
            for text in ["Aspartame", "ASPARTAME", "aspartame (E951)"] {
                let r = matcher.match_ingredient(text, &conditions(&conds), &no_triggers());
                assert!(r.is_problematic, "{text} not detected");
                assert!(r.trigger_names().contains(&"Aspartame"));
                assert_eq!(r.ingredient, text);
            }
        }
    }

    #[test]
    fn test_e_number_alias_matches() {
        let matcher = IngredientMatcher::default();
        let r = matcher.match_ingredient("E951", &conditions(&[GutCondition::Additives]), &no_triggers());
        assert_eq!(r.trigger_names(), vec!["Aspartame"]);
        assert_eq!(r.analysis.detected_keywords, vec!["e951"]);
    }

    #[test]
    fn test_condition_gating() {
        let matcher = IngredientMatcher::default();
        let r = matcher.match_ingredient("carrageenan", &conditions(&[GutCondition::Gluten]), &no_triggers());
        assert!(!r.is_problematic);
        assert!(r.detected_triggers.is_empty());
        assert_eq!(r.analysis.risk_level, RiskLevel::Low);

        let r = matcher.match_ingredient("carrageenan", &conditions(&[GutCondition::Additives]), &no_triggers());
        assert_eq!(r.trigger_names(), vec!["Carrageenan"]);
    }

    #[test]
    fn test_sorbitol_is_severe() {
        let matcher = IngredientMatcher::default();
        let r = matcher.match_ingredient("sorbitol (E420)", &conditions(&[GutCondition::IbsFodmap]), &no_triggers());
        assert!(r.is_problematic);
        assert_eq!(r.analysis.risk_level, RiskLevel::Severe);
        assert!(r.recommendations.avoid);
        assert!(!r.recommendations.caution);
        assert!((r.confidence.value() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_clean_ingredient() {
        let matcher = IngredientMatcher::default();
        let all = conditions(&GutCondition::ALL);
        let r = matcher.match_ingredient("organic quinoa", &all, &no_triggers());
        assert!(!r.is_problematic);
        assert!(r.detected_triggers.is_empty());
        assert!(!r.is_hidden);
        assert!((r.confidence.value() - 0.5).abs() < 1e-9);
        assert!(r.recommendations.alternatives.is_empty());
    }

    #[test]
    fn test_hidden_vague_term() {
        let matcher = IngredientMatcher::default();
        let r = matcher.match_ingredient("Natural Flavoring", &conditions(&[GutCondition::IbsFodmap]), &no_triggers());
        assert!(r.is_hidden);
        assert!(!r.is_problematic);
        assert!((r.confidence.value() - 0.4).abs() < 1e-9);
        assert_eq!(r.analysis.category, IngredientCategory::Flavor);
    }

    #[test]
    fn test_custom_trigger_synthesized_as_severe() {
        let matcher = IngredientMatcher::default();
        let conds = conditions(&[GutCondition::Reflux]);
        let triggers = BTreeMap::from([(GutCondition::Reflux, BTreeSet::from(["Tomato".to_string()]))]);
        let r = matcher.match_ingredient("tomato paste", &conds, &triggers);
        assert!(r.is_problematic);
        assert_eq!(r.detected_triggers.len(), 1);
        let t = &r.detected_triggers[0];
        assert!(t.is_custom());
        assert_eq!(t.name, "Tomato");
        assert_eq!(t.severity, SeverityLevel::Severe);
        assert_eq!(r.analysis.risk_level, RiskLevel::Severe);
    }

    #[test]
    fn test_custom_trigger_ignored_for_disabled_condition() {
        let matcher = IngredientMatcher::default();
        let conds = conditions(&[GutCondition::Gluten]);
        let triggers = BTreeMap::from([(GutCondition::Reflux, BTreeSet::from(["tomato".to_string()]))]);
        let r = matcher.match_ingredient("tomato paste", &conds, &triggers);
        assert!(!r.is_problematic);
    }

    #[test]
    fn test_custom_trigger_does_not_duplicate_catalog_entry() {
        let matcher = IngredientMatcher::default();
        let conds = conditions(&[GutCondition::IbsFodmap]);
        let triggers = BTreeMap::from([(GutCondition::IbsFodmap, BTreeSet::from(["sorbitol".to_string()]))]);
        let r = matcher.match_ingredient("sorbitol", &conds, &triggers);
        assert_eq!(r.detected_triggers.len(), 1);
        assert!(!r.detected_triggers[0].is_custom());
    }

    #[test]
    fn test_recommendations_union_alternatives() {
        let matcher = IngredientMatcher::default();
        let conds = conditions(&[GutCondition::IbsFodmap, GutCondition::Additives]);
        let r = matcher.match_ingredient("aspartame and sucralose", &conds, &no_triggers());
        assert_eq!(r.detected_triggers.len(), 2);
        assert!(r.recommendations.caution);
        assert!(!r.recommendations.avoid);
        assert_eq!(r.recommendations.modifications.len(), 2);
        let stevia = r
            .recommendations
            .alternatives
            .iter()
            .filter(|a| a.as_str() == "stevia")
            .count();
        assert_eq!(stevia, 1);
    }

    #[test]
    fn test_cache_hit_equals_recompute() {
        let cached = IngredientMatcher::default();
        let uncached = IngredientMatcher::new(&MatcherConfig {
            cache_enabled: false,
            ..MatcherConfig::default()
        });
        let conds = conditions(&[GutCondition::IbsFodmap, GutCondition::Additives]);

        let first = cached.match_ingredient("Sorbitol (E420)", &conds, &no_triggers());
        let second = cached.match_ingredient("Sorbitol (E420)", &conds, &no_triggers());
        let fresh = uncached.match_ingredient("Sorbitol (E420)", &conds, &no_triggers());
        assert_eq!(first, second);
        assert_eq!(first, fresh);
        assert_eq!(cached.cache_len(), 1);
        assert_eq!(uncached.cache_len(), 0);
    }

    #[test]
    fn test_cache_hit_echoes_raw_text() {
        let matcher = IngredientMatcher::default();
        let conds = conditions(&[GutCondition::Additives]);
        let _ = matcher.match_ingredient("Aspartame", &conds, &no_triggers());
        let hit = matcher.match_ingredient("ASPARTAME", &conds, &no_triggers());
        assert_eq!(hit.ingredient, "ASPARTAME");
        assert_eq!(hit.analysis.normalized_text, "aspartame");
    }

    #[test]
    fn test_clear_cache() {
        let matcher = IngredientMatcher::default();
        let conds = conditions(&[GutCondition::Additives]);
        let _ = matcher.match_ingredient("msg", &conds, &no_triggers());
        matcher.clear_cache();
        assert_eq!(matcher.cache_len(), 0);
    }

    #[test]
    fn test_cache_entries_expire_after_ttl() {
        let matcher = IngredientMatcher::new(&MatcherConfig {
            cache_ttl: Duration::from_millis(50),
            ..MatcherConfig::default()
        });
        let conds = conditions(&[GutCondition::Additives]);
        let first = matcher.match_ingredient("msg", &conds, &no_triggers());
        assert_eq!(matcher.cache_len(), 1);

        std::thread::sleep(Duration::from_millis(150));
        assert_eq!(matcher.cache_len(), 0);
        assert_eq!(matcher.match_ingredient("msg", &conds, &no_triggers()), first);
    }

    #[test]
    fn test_match_all_preserves_order() {
        let matcher = IngredientMatcher::default();
        let conds = conditions(&[GutCondition::Gluten]);
        let ingredients = vec!["wheat flour".to_string(), "water".to_string(), "barley malt extract".to_string()];
        let results = matcher.match_all(&ingredients, &conds, &no_triggers());
        assert_eq!(results.len(), 3);
        assert!(results[0].is_problematic);
        assert!(!results[1].is_problematic);
        assert!(results[2].is_problematic);
        assert_eq!(results[2].ingredient, "barley malt extract");
    }
}
