//! Clamped confidence scores.
//!
//! Every confidence the engine reports lives in [0.0, 1.0]. Scores computed
//! from heuristics are clamped with [`Confidence::clamped`]; scores supplied
//! from outside (deserialized snapshots) are validated with
//! [`Confidence::new`] so an out-of-range value is rejected rather than
//! silently repaired.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A score in [0.0, 1.0].
///
/// # Examples
///
/// ```
/// use gutguard::Confidence;
///
/// let conf = Confidence::clamped(1.4);
/// assert_eq!(conf.value(), 1.0);
/// assert!(Confidence::new(-0.2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// Minimum valid confidence value.
    pub const MIN_VALUE: f64 = 0.0;

    /// Maximum valid confidence value.
    pub const MAX_VALUE: f64 = 1.0;

    /// Creates a confidence with validation.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ConfidenceOutOfRange` if the value is NaN or
    /// not in [0.0, 1.0].
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if value.is_nan() || !(Self::MIN_VALUE..=Self::MAX_VALUE).contains(&value) {
            return Err(ValidationError::ConfidenceOutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Creates a confidence, clamping into range. NaN becomes zero.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::zero();
        }
        Self(value.clamp(Self::MIN_VALUE, Self::MAX_VALUE))
    }

    /// Frequency-derived confidence: `min(cap, frequency / total + base)`.
    ///
    /// Non-decreasing in `frequency` for a fixed `total`. A zero total yields
    /// zero confidence.
    #[must_use]
    pub fn from_frequency(frequency: usize, total: usize, base: f64, cap: f64) -> Self {
        if total == 0 {
            return Self::zero();
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = frequency as f64 / total as f64;
        Self::clamped((ratio + base).min(cap))
    }

    /// Mean of a set of confidences; zero for an empty set.
    #[must_use]
    pub fn mean<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let mut sum = 0.0;
        let mut count = 0u32;
        for v in values {
            sum += v.0;
            count += 1;
        }
        if count == 0 {
            return Self::zero();
        }
        Self::clamped(sum / f64::from(count))
    }

    /// Zero confidence.
    #[must_use]
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// Full confidence.
    #[must_use]
    pub const fn one() -> Self {
        Self(1.0)
    }

    /// The raw value.
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// At least 0.8.
    pub fn is_high(&self) -> bool {
        self.0 >= 0.8
    }

    /// In [0.5, 0.8).
    pub fn is_medium(&self) -> bool {
        self.0 >= 0.5 && self.0 < 0.8
    }

    /// Below 0.5.
    pub fn is_low(&self) -> bool {
        self.0 < 0.5
    }

    /// Total order used for ranking (values are never NaN).
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        Confidence::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
