//! Pattern mining over learning data.
//!
//! Four independent passes (food triggers, symptom combinations, time of
//! day, condition correlation) each count occurrences and score them with
//! `min(cap, frequency / total + base)`. Only insights above the pass
//! threshold are surfaced. The merged output is sorted by confidence,
//! highest first, keeping first-seen order among equals.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;

use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};
use tracing::debug;

use crate::condition::GutCondition;
use crate::confidence::Confidence;
use crate::matcher::normalize;

use super::data::{LearningData, ScanRecord, SymptomKind, SymptomLog};
use super::insights::{Evidence, InsightType, PatternInsight, TimeOfDay, TimingClass};
use super::mapping::{conditions_for_ingredient, conditions_for_symptom};

/// Analyzer thresholds and windows.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Upper bound of any pattern confidence.
    pub confidence_cap: f64,
    /// Added to the raw frequency ratio.
    pub confidence_base: f64,
    /// Minimum confidence for a food-trigger insight.
    pub food_trigger_threshold: f64,
    /// Minimum confidence for a symptom-pattern insight.
    pub symptom_threshold: f64,
    /// Minimum confidence for a timing insight.
    pub timing_threshold: f64,
    /// Minimum confidence for a condition correlation.
    pub correlation_threshold: f64,
    /// Related scans this close before a symptom log count as immediate.
    pub immediate_window: Duration,
    /// Related scans older than this are ignored (chronic).
    pub delayed_window: Duration,
    /// Offset applied before bucketing by hour of day.
    pub utc_offset_hours: i32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            confidence_cap: 0.95,
            confidence_base: 0.1,
            food_trigger_threshold: 0.7,
            symptom_threshold: 0.6,
            timing_threshold: 0.6,
            correlation_threshold: 0.6,
            immediate_window: Duration::hours(2),
            delayed_window: Duration::hours(24),
            utc_offset_hours: 0,
        }
    }
}

/// Insertion-ordered counter.
struct Tally<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<(K, V)>,
}

impl<K: Hash + Eq + Clone, V: Default> Tally<K, V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: &K) -> &mut V {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => {
                self.entries.push((key.clone(), V::default()));
                self.index.insert(key.clone(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[slot].1
    }

    fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}

#[derive(Default)]
struct IngredientStats {
    flagged: usize,
    seen: usize,
    max_severity: f64,
}

#[derive(Default)]
struct GroupStats {
    count: usize,
    max_severity: f64,
    timings: [usize; 3],
}

#[derive(Default)]
struct BucketStats {
    count: usize,
    max_severity: f64,
    conditions: BTreeSet<GutCondition>,
}

/// Mines patterns from learning data.
#[derive(Debug, Clone, Default)]
pub struct PatternAnalyzer {
    config: AnalyzerConfig,
}

impl PatternAnalyzer {
    /// Creates an analyzer.
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Pattern confidence for `frequency` occurrences out of `total`.
    ///
    /// Non-decreasing in `frequency` for a fixed `total`.
    #[must_use]
    pub fn confidence(&self, frequency: usize, total: usize) -> Confidence {
        Confidence::from_frequency(frequency, total, self.config.confidence_base, self.config.confidence_cap)
    }

    /// Runs every pass and merges the surfaced insights.
    #[must_use]
    pub fn analyze(&self, data: &LearningData) -> Vec<PatternInsight> {
        let mut insights = self.food_triggers(data);
        insights.extend(self.symptom_patterns(data));
        insights.extend(self.timing_patterns(data));
        insights.extend(self.condition_correlations(data));
        insights.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        debug!(
            scans = data.scan_history.len(),
            symptom_logs = data.symptom_logs.len(),
            insights = insights.len(),
            "pattern analysis complete"
        );
        insights
    }

    /// Ingredients that keep showing up in flagged scans.
    #[must_use]
    pub fn food_triggers(&self, data: &LearningData) -> Vec<PatternInsight> {
        let total = data.scan_history.len();
        if total == 0 {
            return Vec::new();
        }
        let enabled = data.user_conditions();

        let mut tally: Tally<String, IngredientStats> = Tally::new();
        for scan in &data.scan_history {
            let flagged = scan.analysis_result.is_flagged();
            let severity = scan.analysis_result.score();
            // Each ingredient counts once per scan.
            let mut in_scan: BTreeSet<String> = BTreeSet::new();
            for ingredient in scan.ingredients.iter().map(|i| normalize(i)) {
                if ingredient.is_empty() || !in_scan.insert(ingredient.clone()) {
                    continue;
                }
                let stats = tally.entry(&ingredient);
                stats.seen += 1;
                if flagged {
                    stats.flagged += 1;
                    stats.max_severity = stats.max_severity.max(severity);
                }
            }
        }

        tally
            .into_entries()
            .into_iter()
            .filter(|(_, stats)| stats.flagged > 0)
            .filter_map(|(ingredient, stats)| {
                let confidence = self.confidence(stats.flagged, total);
                if confidence.value() <= self.config.food_trigger_threshold {
                    return None;
                }
                Some(PatternInsight {
                    insight_type: InsightType::FoodTrigger,
                    description: format!(
                        "'{ingredient}' was present in {} of your {total} scans that were flagged",
                        stats.flagged
                    ),
                    evidence: Evidence {
                        frequency: stats.flagged,
                        severity: stats.max_severity,
                        consistency: ratio(stats.flagged, stats.seen),
                    },
                    recommendations: vec![
                        format!("Consider avoiding {ingredient}"),
                        format!("Look for products without {ingredient}"),
                    ],
                    affected_conditions: conditions_for_ingredient(&ingredient, &enabled),
                    subject: ingredient,
                    confidence,
                    timing: None,
                })
            })
            .collect()
    }

    /// Symptom combinations that recur together.
    #[must_use]
    pub fn symptom_patterns(&self, data: &LearningData) -> Vec<PatternInsight> {
        let total = data.symptom_logs.len();
        if total == 0 {
            return Vec::new();
        }
        let enabled = data.user_conditions();

        let mut tally: Tally<Vec<SymptomKind>, GroupStats> = Tally::new();
        for log in &data.symptom_logs {
            let key: Vec<SymptomKind> = log.kinds().into_iter().collect();
            if key.is_empty() {
                continue;
            }
            let timing = self.classify_timing(log, &data.scan_history);
            let stats = tally.entry(&key);
            stats.count += 1;
            stats.max_severity = stats
                .max_severity
                .max(log.max_severity().map_or(0.0, |s| s.score()));
            stats.timings[timing_slot(timing)] += 1;
        }

        tally
            .into_entries()
            .into_iter()
            .filter_map(|(kinds, stats)| {
                let confidence = self.confidence(stats.count, total);
                if confidence.value() <= self.config.symptom_threshold {
                    return None;
                }
                let timing = dominant_timing(stats.timings);
                let subject = kinds.iter().map(SymptomKind::as_str).collect::<Vec<_>>().join(" + ");
                let affected_conditions = kinds
                    .iter()
                    .flat_map(|k| conditions_for_symptom(*k, &enabled))
                    .collect();
                Some(PatternInsight {
                    insight_type: InsightType::SymptomPattern,
                    description: format!(
                        "{subject} occurred together in {} of {total} symptom logs, usually {timing} after eating",
                        stats.count
                    ),
                    evidence: Evidence {
                        frequency: stats.count,
                        severity: stats.max_severity,
                        consistency: ratio(stats.timings[timing_slot(timing)], stats.count),
                    },
                    recommendations: vec![timing_advice(timing, &subject)],
                    affected_conditions,
                    subject,
                    confidence,
                    timing: Some(timing),
                })
            })
            .collect()
    }

    /// Times of day when symptoms cluster.
    #[must_use]
    pub fn timing_patterns(&self, data: &LearningData) -> Vec<PatternInsight> {
        let total = data.symptom_logs.len();
        if total == 0 {
            return Vec::new();
        }
        let enabled = data.user_conditions();

        let mut tally: Tally<TimeOfDay, BucketStats> = Tally::new();
        for log in &data.symptom_logs {
            let bucket = TimeOfDay::from_hour(self.local_hour(log.timestamp));
            let stats = tally.entry(&bucket);
            stats.count += 1;
            stats.max_severity = stats
                .max_severity
                .max(log.max_severity().map_or(0.0, |s| s.score()));
            for kind in log.kinds() {
                stats.conditions.extend(conditions_for_symptom(kind, &enabled));
            }
        }

        tally
            .into_entries()
            .into_iter()
            .filter_map(|(bucket, stats)| {
                let confidence = self.confidence(stats.count, total);
                if confidence.value() <= self.config.timing_threshold {
                    return None;
                }
                Some(PatternInsight {
                    insight_type: InsightType::TimingPattern,
                    subject: bucket.to_string(),
                    confidence,
                    description: format!(
                        "{} of {total} symptom logs were recorded in the {bucket}",
                        stats.count
                    ),
                    evidence: Evidence {
                        frequency: stats.count,
                        severity: stats.max_severity,
                        consistency: ratio(stats.count, total),
                    },
                    recommendations: vec![format!(
                        "Pay attention to what you eat before the {bucket}"
                    )],
                    affected_conditions: stats.conditions,
                    timing: None,
                })
            })
            .collect()
    }

    /// Conditions that the logged symptoms keep pointing to.
    #[must_use]
    pub fn condition_correlations(&self, data: &LearningData) -> Vec<PatternInsight> {
        let total = data.symptom_logs.len();
        if total == 0 {
            return Vec::new();
        }
        let enabled = data.user_conditions();

        let mut counts: BTreeMap<GutCondition, (usize, f64)> = BTreeMap::new();
        for log in &data.symptom_logs {
            let mut conditions: BTreeSet<GutCondition> = log
                .kinds()
                .into_iter()
                .flat_map(|k| conditions_for_symptom(k, &enabled))
                .collect();
            if !enabled.is_empty() {
                conditions.retain(|c| enabled.contains(c));
            }
            let severity = log.max_severity().map_or(0.0, |s| s.score());
            for condition in conditions {
                let entry = counts.entry(condition).or_insert((0, 0.0));
                entry.0 += 1;
                entry.1 = entry.1.max(severity);
            }
        }

        counts
            .into_iter()
            .filter_map(|(condition, (count, severity))| {
                let confidence = self.confidence(count, total);
                if confidence.value() <= self.config.correlation_threshold {
                    return None;
                }
                Some(PatternInsight {
                    insight_type: InsightType::ConditionCorrelation,
                    subject: condition.as_str().to_string(),
                    confidence,
                    description: format!(
                        "{count} of {total} symptom logs point to {}",
                        condition.label()
                    ),
                    evidence: Evidence {
                        frequency: count,
                        severity,
                        consistency: ratio(count, total),
                    },
                    recommendations: vec![format!("Review your {} triggers", condition.label())],
                    affected_conditions: BTreeSet::from([condition]),
                    timing: None,
                })
            })
            .collect()
    }

    /// Classifies a log by its closest preceding related scan.
    #[must_use]
    pub fn classify_timing(&self, log: &SymptomLog, scans: &[ScanRecord]) -> TimingClass {
        let related: Vec<String> = log.related_food_items.iter().map(|f| normalize(f)).collect();
        let closest = scans
            .iter()
            .filter(|scan| related.is_empty() || related.contains(&normalize(&scan.food_name)))
            .map(|scan| log.timestamp - scan.timestamp)
            .filter(|gap| *gap >= Duration::zero() && *gap <= self.config.delayed_window)
            .min();

        match closest {
            Some(gap) if gap <= self.config.immediate_window => TimingClass::Immediate,
            Some(_) => TimingClass::Delayed,
            None => TimingClass::Chronic,
        }
    }

    fn local_hour(&self, timestamp: DateTime<Utc>) -> u32 {
        match FixedOffset::east_opt(self.config.utc_offset_hours.saturating_mul(3600)) {
            Some(offset) => timestamp.with_timezone(&offset).hour(),
            None => timestamp.hour(),
        }
    }
}

fn timing_slot(timing: TimingClass) -> usize {
    match timing {
        TimingClass::Immediate => 0,
        TimingClass::Delayed => 1,
        TimingClass::Chronic => 2,
    }
}

/// Most frequent class; ties go to the earlier (more immediate) class.
fn dominant_timing(counts: [usize; 3]) -> TimingClass {
    let classes = [TimingClass::Immediate, TimingClass::Delayed, TimingClass::Chronic];
    let mut best = (TimingClass::Immediate, counts[0]);
    for (class, count) in classes.into_iter().zip(counts).skip(1) {
        if count > best.1 {
            best = (class, count);
        }
    }
    best.0
}

fn timing_advice(timing: TimingClass, subject: &str) -> String {
    match timing {
        TimingClass::Immediate => {
            format!("{subject} tends to follow within two hours of eating; review your most recent meal")
        }
        TimingClass::Delayed => {
            format!("{subject} tends to appear hours after eating; keep a food diary covering the previous day")
        }
        TimingClass::Chronic => {
            format!("{subject} is not tied to a recent meal; consider discussing it with a healthcare provider")
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64).clamp(0.0, 1.0)
    }
}
