//! JSON helpers.
//!
//! Serde already provides the encoding. These helpers fix the formatting
//! and map decode failures into `ValidationError::Malformed`, so a host can
//! persist learning data and reload it unchanged.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{GutGuardError, GutResult, ValidationError};
use crate::food::FoodItem;
use crate::learning::LearningData;
use crate::profile::GutProfile;

/// Serializes any crate type to pretty JSON.
pub fn to_json_pretty<T: Serialize>(value: &T) -> GutResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| GutGuardError::internal(format!("serialize: {e}")))
}

fn decode<T: DeserializeOwned>(what: &str, s: &str) -> GutResult<T> {
    serde_json::from_str::<T>(s).map_err(|e| {
        ValidationError::Malformed {
            message: format!("{what}: {e}"),
        }
        .into()
    })
}

/// Decodes and validates a food item.
pub fn food_from_json(s: &str) -> GutResult<FoodItem> {
    let food: FoodItem = decode("food item", s)?;
    food.validate()?;
    Ok(food)
}

/// Decodes and validates a profile.
pub fn profile_from_json(s: &str) -> GutResult<GutProfile> {
    let profile: GutProfile = decode("gut profile", s)?;
    profile.validate()?;
    Ok(profile)
}

/// Decodes and validates a learning-data snapshot.
pub fn learning_data_from_json(s: &str) -> GutResult<LearningData> {
    let data: LearningData = decode("learning data", s)?;
    data.validate()?;
    Ok(data)
}
