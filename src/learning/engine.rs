//! Learning engine.
//!
//! Owns one user's learning data, the cached profile and the derived
//! insights. Writes mark the insights stale (`Updating`); the next read
//! recomputes them once and memoizes until the following write, so every
//! read reflects all prior writes.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use crate::confidence::Confidence;
use crate::error::{EngineError, GutGuardError, GutResult, ValidationError};
use crate::food::FoodItem;
use crate::matcher::{contains_term, normalize, IngredientMatcher, MatcherConfig};
use crate::profile::GutProfile;
use crate::verdict::{ScanAnalysis, VerdictAggregator};

use super::analyzer::{AnalyzerConfig, PatternAnalyzer};
use super::data::{LearningData, ScanRecord, SymptomLog, UserFeedback};
use super::insights::{
    DataQuality, FoodRiskPrediction, InsightType, LearningInsights, LearningMetrics,
    PatternInsight, Recommendation,
};
use super::source::LearningDataSource;

/// Lifecycle of a learning engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// `initialize` has not been called.
    Uninitialized,
    /// Insights reflect every write.
    Ready,
    /// Writes are pending; insights are recomputed on the next read.
    Updating,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Ready => write!(f, "ready"),
            Self::Updating => write!(f, "updating"),
        }
    }
}

/// Learning engine configuration.
///
/// The fallback values are used only when the data carries nothing to
/// compute the statistic from.
#[derive(Debug, Clone)]
pub struct LearningConfig {
    /// Pattern mining settings.
    pub analyzer: AnalyzerConfig,
    /// Matcher used when the engine analyzes foods itself.
    pub matcher: MatcherConfig,
    /// Data points at which completeness reaches 1.
    pub completeness_target: usize,
    /// Recent items at which recency reaches 1.
    pub recency_target: usize,
    /// What counts as recent.
    pub recency_window: Duration,
    /// Consistency when no food was scanned twice.
    pub fallback_consistency: f64,
    /// Learning accuracy when no scan carries feedback.
    pub fallback_learning_accuracy: f64,
    /// Prediction accuracy when no log names a food.
    pub fallback_prediction_accuracy: f64,
    /// Satisfaction when no feedback is rated.
    pub fallback_user_satisfaction: f64,
    /// Below this many data points a "keep logging" tip is added.
    pub sparse_data_threshold: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerConfig::default(),
            matcher: MatcherConfig::default(),
            completeness_target: 100,
            recency_target: 10,
            recency_window: Duration::days(7),
            fallback_consistency: 0.8,
            fallback_learning_accuracy: 0.75,
            fallback_prediction_accuracy: 0.7,
            fallback_user_satisfaction: 0.8,
            sparse_data_threshold: 10,
        }
    }
}

const SPARSE_DATA_TIP: &str = "Keep scanning foods and logging symptoms to sharpen your insights";

/// Per-user learning engine.
pub struct LearningEngine {
    config: LearningConfig,
    analyzer: PatternAnalyzer,
    aggregator: VerdictAggregator,
    state: EngineState,
    data: LearningData,
    profile_written: bool,
    insights: Option<LearningInsights>,
    metrics: Option<LearningMetrics>,
}

impl LearningEngine {
    /// Creates an uninitialized engine.
    #[must_use]
    pub fn new(config: LearningConfig) -> Self {
        let analyzer = PatternAnalyzer::new(config.analyzer.clone());
        let aggregator = VerdictAggregator::new(IngredientMatcher::new(&config.matcher));
        Self {
            config,
            analyzer,
            aggregator,
            state: EngineState::Uninitialized,
            data: LearningData::new(),
            profile_written: false,
            insights: None,
            metrics: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// True once `initialize` or `initialize_with` has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state != EngineState::Uninitialized
    }

    /// All data the engine has seen, including pending writes.
    #[must_use]
    pub fn learning_data(&self) -> &LearningData {
        &self.data
    }

    /// The current profile.
    #[must_use]
    pub fn gut_profile(&self) -> &GutProfile {
        &self.data.gut_profile
    }

    /// Loads the snapshot from `source` and computes insights.
    ///
    /// A failing or invalid source degrades to empty data.
    pub fn initialize(&mut self, source: &dyn LearningDataSource) {
        let snapshot = match source.load() {
            Ok(data) => match data.validate() {
                Ok(()) => data,
                Err(err) => {
                    warn!(error = %err, "learning data failed validation, starting empty");
                    LearningData::new()
                }
            },
            Err(err) => {
                warn!(error = %err, "learning data source failed, starting empty");
                LearningData::new()
            }
        };
        self.install(snapshot);
    }

    /// Initializes from a snapshot supplied directly.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the snapshot is malformed.
    pub fn initialize_with(&mut self, data: LearningData) -> GutResult<()> {
        data.validate()?;
        self.install(data);
        Ok(())
    }

    fn install(&mut self, mut snapshot: LearningData) {
        if self.state == EngineState::Uninitialized {
            let pending = std::mem::take(&mut self.data);
            if self.profile_written {
                snapshot.gut_profile = pending.gut_profile.clone();
            }
            snapshot.append(pending);
        }
        self.data = snapshot;
        self.refresh();
        info!(
            scans = self.data.scan_history.len(),
            symptom_logs = self.data.symptom_logs.len(),
            conditions = self.data.user_conditions().len(),
            "learning engine initialized"
        );
    }

    /// Appends a scan record.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank food name or a bad rating.
    pub fn add_scan_data(&mut self, record: ScanRecord) -> GutResult<()> {
        if record.food_name.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "food_name".to_string(),
            }
            .into());
        }
        if let Some(feedback) = &record.user_feedback {
            feedback.validate()?;
        }
        self.data.scan_history.push(record);
        self.mark_stale();
        Ok(())
    }

    /// Analyzes `food` against the cached profile and records the scan.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed food or feedback.
    pub fn record_scan(&mut self, food: &FoodItem, feedback: Option<UserFeedback>) -> GutResult<ScanAnalysis> {
        if let Some(feedback) = &feedback {
            feedback.validate()?;
        }
        let analysis = self.aggregator.analyze_food(food, &self.data.gut_profile)?;
        self.data.scan_history.push(ScanRecord {
            food_name: food.name.clone(),
            ingredients: food.ingredients.clone(),
            analysis_result: analysis.overall_safety,
            user_feedback: feedback,
            timestamp: analysis.last_updated,
        });
        self.mark_stale();
        Ok(analysis)
    }

    /// Analyzes `food` against the cached profile without recording it.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed food.
    pub fn analyze_food(&self, food: &FoodItem) -> GutResult<ScanAnalysis> {
        self.aggregator.analyze_food(food, &self.data.gut_profile)
    }

    /// Appends a symptom log.
    pub fn add_symptom_data(&mut self, log: SymptomLog) {
        self.data.symptom_logs.push(log);
        self.mark_stale();
    }

    /// Replaces the cached profile.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the profile is malformed.
    pub fn update_gut_profile(&mut self, profile: GutProfile) -> GutResult<()> {
        profile.validate()?;
        self.data.gut_profile = profile;
        self.profile_written = true;
        self.mark_stale();
        Ok(())
    }

    /// Current insights.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotInitialized` before `initialize`.
    pub fn generate_insights(&mut self) -> GutResult<LearningInsights> {
        self.ensure_initialized("generate_insights")?;
        self.ensure_fresh();
        self.insights
            .clone()
            .ok_or_else(|| GutGuardError::internal("insights missing after refresh"))
    }

    /// Current metrics.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotInitialized` before `initialize`.
    pub fn calculate_metrics(&mut self) -> GutResult<LearningMetrics> {
        self.ensure_initialized("calculate_metrics")?;
        self.ensure_fresh();
        self.metrics
            .clone()
            .ok_or_else(|| GutGuardError::internal("metrics missing after refresh"))
    }

    /// Recommendation messages plus reminders of known triggers.
    ///
    /// Empty before `initialize`.
    pub fn personalized_recommendations(&mut self) -> Vec<String> {
        if !self.is_initialized() {
            return Vec::new();
        }
        self.ensure_fresh();

        let mut out: Vec<String> = self
            .insights
            .as_ref()
            .map(|i| i.recommendations.iter().map(|r| r.message.clone()).collect())
            .unwrap_or_default();

        for (condition, triggers) in self.data.gut_profile.known_triggers() {
            let list = triggers.into_iter().collect::<Vec<_>>().join(", ");
            let message = format!("Keep avoiding your known {} triggers: {list}", condition.label());
            if !out.contains(&message) {
                out.push(message);
            }
        }
        out
    }

    /// Scores `food` against the learned food triggers.
    ///
    /// Zeroed before `initialize`.
    pub fn predict_food_risk(&mut self, food: &FoodItem) -> FoodRiskPrediction {
        let mut prediction = FoodRiskPrediction {
            food_name: food.name.clone(),
            risk_score: Confidence::zero(),
            matched_triggers: Vec::new(),
            confidence: Confidence::zero(),
        };
        if !self.is_initialized() {
            return prediction;
        }
        self.ensure_fresh();
        let Some(insights) = &self.insights else {
            return prediction;
        };

        let ingredients: Vec<String> = food.ingredients.iter().map(|i| normalize(i)).collect();
        let matched: Vec<&PatternInsight> = insights
            .of_type(InsightType::FoodTrigger)
            .filter(|p| ingredients.iter().any(|i| contains_term(i, &p.subject)))
            .collect();

        prediction.risk_score = Confidence::clamped(
            matched
                .iter()
                .map(|p| p.confidence.value() * p.evidence.severity)
                .fold(0.0, f64::max),
        );
        prediction.confidence = if matched.is_empty() {
            insights.data_quality.completeness
        } else {
            Confidence::mean(matched.iter().map(|p| p.confidence))
        };
        prediction.matched_triggers = matched.iter().map(|p| p.subject.clone()).collect();

        debug!(
            food = %food.name,
            risk = %prediction.risk_score,
            matched = prediction.matched_triggers.len(),
            "food risk predicted"
        );
        prediction
    }

    fn ensure_initialized(&self, operation: &str) -> GutResult<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(EngineError::NotInitialized {
                operation: operation.to_string(),
            }
            .into())
        }
    }

    fn mark_stale(&mut self) {
        if self.state == EngineState::Ready {
            self.state = EngineState::Updating;
        }
    }

    fn ensure_fresh(&mut self) {
        if self.state == EngineState::Updating || self.insights.is_none() {
            self.refresh();
        }
    }

    fn refresh(&mut self) {
        let insights = self.build_insights();
        let metrics = self.build_metrics();
        debug!(
            patterns = insights.patterns.len(),
            confidence = %insights.confidence,
            "learning insights recomputed"
        );
        self.insights = Some(insights);
        self.metrics = Some(metrics);
        self.state = EngineState::Ready;
    }

    fn build_insights(&self) -> LearningInsights {
        let patterns = self.analyzer.analyze(&self.data);

        let mut recommendations: Vec<Recommendation> = Vec::new();
        for pattern in &patterns {
            for message in &pattern.recommendations {
                if recommendations.iter().any(|r| &r.message == message) {
                    continue;
                }
                recommendations.push(Recommendation {
                    message: message.clone(),
                    confidence: pattern.confidence,
                    source: Some(pattern.insight_type),
                });
            }
        }
        if self.data.data_point_count() < self.config.sparse_data_threshold {
            recommendations.push(Recommendation {
                message: SPARSE_DATA_TIP.to_string(),
                confidence: Confidence::zero(),
                source: None,
            });
        }

        // General advice carries no evidence and stays out of the mean.
        let confidence = Confidence::mean(
            patterns.iter().map(|p| p.confidence).chain(
                recommendations
                    .iter()
                    .filter(|r| r.source.is_some())
                    .map(|r| r.confidence),
            ),
        );

        LearningInsights {
            data_quality: self.data_quality(),
            patterns,
            recommendations,
            confidence,
            last_updated: Utc::now(),
        }
    }

    fn data_quality(&self) -> DataQuality {
        let now = Utc::now();
        DataQuality {
            completeness: Confidence::clamped(ratio(
                self.data.data_point_count(),
                self.config.completeness_target,
            )),
            consistency: Confidence::clamped(
                verdict_consistency(&self.data).unwrap_or(self.config.fallback_consistency),
            ),
            recency: Confidence::clamped(ratio(
                self.data.recent_count(now, self.config.recency_window),
                self.config.recency_target,
            )),
        }
    }

    fn build_metrics(&self) -> LearningMetrics {
        let now = Utc::now();
        let total = self.data.data_point_count();
        let recent = self.data.recent_count(now, self.config.recency_window);

        LearningMetrics {
            total_data_points: total,
            learning_accuracy: Confidence::clamped(
                feedback_agreement(&self.data).unwrap_or(self.config.fallback_learning_accuracy),
            ),
            prediction_accuracy: Confidence::clamped(
                prediction_hit_rate(&self.data).unwrap_or(self.config.fallback_prediction_accuracy),
            ),
            user_satisfaction: Confidence::clamped(
                mean_rating(&self.data).unwrap_or(self.config.fallback_user_satisfaction),
            ),
            adaptation_rate: Confidence::clamped(ratio(recent, total)),
            last_evaluation: now,
        }
    }
}

impl Default for LearningEngine {
    fn default() -> Self {
        Self::new(LearningConfig::default())
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64).min(1.0)
    }
}

/// Share of repeatedly scanned foods whose verdict never changed.
fn verdict_consistency(data: &LearningData) -> Option<f64> {
    let mut by_food: BTreeMap<String, Vec<_>> = BTreeMap::new();
    for scan in &data.scan_history {
        by_food
            .entry(normalize(&scan.food_name))
            .or_default()
            .push(scan.analysis_result);
    }
    let repeated: Vec<_> = by_food.values().filter(|v| v.len() > 1).collect();
    if repeated.is_empty() {
        return None;
    }
    let stable = repeated
        .iter()
        .filter(|verdicts| verdicts.iter().all(|v| *v == verdicts[0]))
        .count();
    Some(ratio(stable, repeated.len()))
}

/// Share of feedback where "flagged" agreed with "had a reaction".
fn feedback_agreement(data: &LearningData) -> Option<f64> {
    let (agree, total) = data
        .scan_history
        .iter()
        .filter_map(|s| s.user_feedback.as_ref().map(|f| (s.analysis_result, f)))
        .fold((0, 0), |(agree, total), (tier, feedback)| {
            let hit = tier.is_flagged() == feedback.had_reaction;
            (agree + usize::from(hit), total + 1)
        });
    (total > 0).then(|| ratio(agree, total))
}

/// Share of symptom logs whose suspected foods had been flagged.
fn prediction_hit_rate(data: &LearningData) -> Option<f64> {
    let flagged: BTreeSet<String> = data
        .scan_history
        .iter()
        .filter(|s| s.analysis_result.is_flagged())
        .map(|s| normalize(&s.food_name))
        .collect();
    let (hits, total) = data
        .symptom_logs
        .iter()
        .filter(|l| !l.related_food_items.is_empty())
        .fold((0, 0), |(hits, total), log| {
            let hit = log
                .related_food_items
                .iter()
                .any(|f| flagged.contains(&normalize(f)));
            (hits + usize::from(hit), total + 1)
        });
    (total > 0).then(|| ratio(hits, total))
}

fn mean_rating(data: &LearningData) -> Option<f64> {
    let ratings: Vec<f64> = data
        .scan_history
        .iter()
        .filter_map(|s| s.user_feedback.as_ref().and_then(|f| f.rating))
        .map(f64::from)
        .collect();
    if ratings.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    Some(mean / 5.0)
}
