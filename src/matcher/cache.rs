//! TTL cache for ingredient results.
//!
//! Entries expire after a fixed time-to-live and the cache is bounded, so a
//! long session cannot grow it without limit. Keys cover every input that
//! influences a result, which keeps hits indistinguishable from recomputes.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use moka::sync::Cache;

use crate::condition::GutCondition;

use super::result::IngredientAnalysisResult;

/// Compound cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    normalized: String,
    conditions: Vec<GutCondition>,
    triggers: [u8; 32],
}

impl CacheKey {
    pub(crate) fn new(
        normalized: &str,
        conditions: &BTreeSet<GutCondition>,
        user_triggers: &BTreeMap<GutCondition, BTreeSet<String>>,
    ) -> Self {
        Self {
            normalized: normalized.to_string(),
            conditions: conditions.iter().copied().collect(),
            triggers: fingerprint(conditions, user_triggers),
        }
    }
}

/// Stable digest of the personal triggers that can influence a match.
fn fingerprint(
    conditions: &BTreeSet<GutCondition>,
    user_triggers: &BTreeMap<GutCondition, BTreeSet<String>>,
) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    for (condition, triggers) in user_triggers {
        if !conditions.contains(condition) {
            continue;
        }
        hasher.update(condition.as_str().as_bytes());
        hasher.update(&[0xff]);
        for trigger in triggers {
            hasher.update(trigger.as_bytes());
            hasher.update(&[0x00]);
        }
    }
    *hasher.finalize().as_bytes()
}

pub(crate) struct ResultCache {
    inner: Cache<CacheKey, IngredientAnalysisResult>,
}

impl ResultCache {
    pub(crate) fn new(capacity: u64, ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }

    pub(crate) fn get(&self, key: &CacheKey) -> Option<IngredientAnalysisResult> {
        self.inner.get(key)
    }

    pub(crate) fn insert(&self, key: CacheKey, result: IngredientAnalysisResult) {
        self.inner.insert(key, result);
    }

    pub(crate) fn len(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    pub(crate) fn clear(&self) {
        self.inner.invalidate_all();
    }
}
