//! # GutGuard - hidden trigger detection and gut-health pattern learning
//!
//! GutGuard inspects food ingredient lists for substances that commonly
//! upset sensitive digestive systems, even when a label hides them behind
//! an alias or an E-number, and learns which foods and times of day line up
//! with a user's logged symptoms.
//!
//! ## Core Concepts
//!
//! - **GutProfile**: the user's enabled conditions, severities and personal triggers
//! - **IngredientMatcher**: scans one ingredient string against the trigger catalog
//! - **VerdictAggregator**: turns a whole product into a safe / caution / avoid verdict
//! - **LearningEngine**: mines scan and symptom history for personal patterns
//!
//! ## Usage
//!
//! ```rust
//! use gutguard::{
//!     ConditionSettings, FoodItem, GutCondition, GutProfile, SafetyTier, SeverityLevel,
//!     VerdictAggregator,
//! };
//!
//! let profile = GutProfile::new()
//!     .with_condition(GutCondition::Gluten, ConditionSettings::enabled(SeverityLevel::Severe));
//! let bread = FoodItem::new("bread-1", "White bread")
//!     .with_ingredients(["wheat flour", "vegetable oil", "salt", "yeast"]);
//!
//! let scan = VerdictAggregator::default().analyze_food(&bread, &profile)?;
//! assert_eq!(scan.overall_safety, SafetyTier::Avoid);
//! # Ok::<(), gutguard::GutGuardError>(())
//! ```
//!
//! The library installs no tracing subscriber; hosts choose their own.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core types
pub mod condition;
pub mod confidence;
pub mod error;
pub mod food;
pub mod profile;

// Detection
pub mod catalog;
pub mod matcher;
pub mod verdict;

// Learning
pub mod learning;
pub mod serialization;

pub use catalog::{HiddenTrigger, TriggerCatalog, TriggerCategory, TriggerOrigin};
pub use condition::{GutCondition, SeverityLevel};
pub use confidence::Confidence;
pub use error::{EngineError, GutGuardError, GutResult, ValidationError};
pub use food::{DataSource, FodmapLevel, FoodItem};
pub use profile::{ConditionSettings, GutProfile, Preferences, ProfileId};

pub use matcher::{
    IngredientAnalysis, IngredientAnalysisResult, IngredientCategory, IngredientMatcher,
    IngredientRecommendations, MatcherConfig, RiskLevel,
};
pub use verdict::{
    ComplexFoodAnalysis, ConditionWarning, FlagSource, FlaggedIngredient, SafetyTier,
    ScanAnalysis, VerdictAggregator,
};

pub use learning::{
    AnalyzerConfig, DataQuality, EngineState, FoodRiskPrediction, InMemoryLearningSource,
    InsightType, JsonLearningSource, LearningConfig, LearningData, LearningDataSource,
    LearningEngine, LearningInsights, LearningMetrics, PatternAnalyzer, PatternInsight,
    Recommendation, ScanRecord, SourceError, SymptomKind, SymptomLog, SymptomReport,
    TimingClass, UserFeedback,
};
