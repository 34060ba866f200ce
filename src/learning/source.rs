//! Inbound learning-data sources.
//!
//! The host owns persistence. The engine only asks a source for one
//! snapshot at initialization time.

use thiserror::Error;

use super::data::LearningData;

/// Errors a data source can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The backing store could not be reached.
    #[error("Learning data unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be decoded.
    #[error("Learning data is corrupt: {0}")]
    Corrupt(String),
}

/// Supplies the learning-data snapshot for one user.
pub trait LearningDataSource {
    /// Loads the current snapshot.
    fn load(&self) -> Result<LearningData, SourceError>;
}

/// Source backed by an in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLearningSource {
    data: LearningData,
}

impl InMemoryLearningSource {
    /// Wraps a snapshot.
    #[must_use]
    pub fn new(data: LearningData) -> Self {
        Self { data }
    }
}

impl LearningDataSource for InMemoryLearningSource {
    fn load(&self) -> Result<LearningData, SourceError> {
        Ok(self.data.clone())
    }
}

/// Source backed by a JSON document, as a host would keep it in a
/// key-value store.
#[derive(Debug, Clone)]
pub struct JsonLearningSource {
    json: String,
}

impl JsonLearningSource {
    /// Wraps a JSON-encoded `LearningData` document.
    #[must_use]
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl LearningDataSource for JsonLearningSource {
    fn load(&self) -> Result<LearningData, SourceError> {
        crate::serialization::learning_data_from_json(&self.json)
            .map_err(|e| SourceError::Corrupt(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::data::ScanRecord;
    use crate::verdict::SafetyTier;

    #[test]
    fn test_in_memory_source_returns_snapshot() {
        let mut data = LearningData::new();
        data.scan_history.push(ScanRecord::new("bread", ["wheat flour"], SafetyTier::Avoid));
        let source = InMemoryLearningSource::new(data.clone());
        assert_eq!(source.load().unwrap(), data);
    }

    #[test]
    fn test_json_source_reports_corrupt_data() {
        let source = JsonLearningSource::new("{ not json");
        assert!(matches!(source.load(), Err(SourceError::Corrupt(_))));
    }

    #[test]
    fn test_json_source_loads_empty_document() {
        let data = JsonLearningSource::new("{}").load().unwrap();
        assert_eq!(data.data_point_count(), 0);
    }
}
