//! Learning from scan and symptom history.
//!
//! - [`data`]: the history itself
//! - [`analyzer`]: pattern mining passes
//! - [`engine`]: per-user orchestration with lazy recompute
//! - [`source`]: where the engine loads history from

pub mod analyzer;
pub mod data;
pub mod engine;
pub mod insights;
pub mod mapping;
pub mod source;

pub use analyzer::{AnalyzerConfig, PatternAnalyzer};
pub use data::{LearningData, ScanRecord, SymptomKind, SymptomLog, SymptomReport, UserFeedback};
pub use engine::{EngineState, LearningConfig, LearningEngine};
pub use insights::{
    DataQuality, Evidence, FoodRiskPrediction, InsightType, LearningInsights, LearningMetrics,
    PatternInsight, Recommendation, TimeOfDay, TimingClass,
};
pub use source::{InMemoryLearningSource, JsonLearningSource, LearningDataSource, SourceError};
