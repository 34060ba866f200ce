//! Normalized food records supplied by the host's food-database clients.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// FODMAP content of a product, when the source reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FodmapLevel {
    /// Low FODMAP.
    Low,
    /// Moderate FODMAP.
    Moderate,
    /// High FODMAP.
    High,
    /// Not reported by the source.
    #[default]
    Unknown,
}

/// Where the product record came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Open Food Facts.
    OpenFoodFacts,
    /// USDA FoodData Central.
    Usda,
    /// Spoonacular.
    Spoonacular,
    /// Entered by the user.
    #[default]
    Manual,
    /// Any other named provider.
    Other(String),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenFoodFacts => write!(f, "open_food_facts"),
            Self::Usda => write!(f, "usda"),
            Self::Spoonacular => write!(f, "spoonacular"),
            Self::Manual => write!(f, "manual"),
            Self::Other(name) => write!(f, "other:{name}"),
        }
    }
}

/// A scanned or looked-up product. Immutable once built.
///
/// # Examples
///
/// ```
/// use gutguard::FoodItem;
///
/// let bread = FoodItem::new("123", "Sandwich bread")
///     .with_ingredients(["wheat flour", "water", "salt", "yeast"]);
/// assert_eq!(bread.ingredients.len(), 4);
/// assert!(!bread.gluten_free);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    /// Source-specific identifier.
    pub id: String,
    /// Product name.
    pub name: String,
    /// Brand, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Retail category, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Ingredient strings in label order.
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Declared allergens.
    #[serde(default)]
    pub allergens: BTreeSet<String>,
    /// Product is labelled gluten-free.
    #[serde(default)]
    pub gluten_free: bool,
    /// Product is labelled lactose-free.
    #[serde(default)]
    pub lactose_free: bool,
    /// FODMAP content reported by the source.
    #[serde(default)]
    pub fodmap_level: FodmapLevel,
    /// EAN or UPC barcode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Where the record came from.
    #[serde(default)]
    pub data_source: DataSource,
}

impl FoodItem {
    /// Creates a product with no ingredients and conservative flags.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: None,
            category: None,
            ingredients: Vec::new(),
            allergens: BTreeSet::new(),
            gluten_free: false,
            lactose_free: false,
            fodmap_level: FodmapLevel::Unknown,
            barcode: None,
            data_source: DataSource::Manual,
        }
    }

    /// Sets the ingredient list.
    #[must_use]
    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the declared allergens.
    #[must_use]
    pub fn with_allergens<I, S>(mut self, allergens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allergens = allergens.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the gluten-free and lactose-free label flags.
    #[must_use]
    pub fn with_flags(mut self, gluten_free: bool, lactose_free: bool) -> Self {
        self.gluten_free = gluten_free;
        self.lactose_free = lactose_free;
        self
    }

    /// Sets the FODMAP level.
    #[must_use]
    pub fn with_fodmap_level(mut self, level: FodmapLevel) -> Self {
        self.fodmap_level = level;
        self
    }

    /// Sets the brand.
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Sets the barcode.
    #[must_use]
    pub fn with_barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }

    /// Sets the data source.
    #[must_use]
    pub fn with_data_source(mut self, source: DataSource) -> Self {
        self.data_source = source;
        self
    }

    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` when `id` or `name` is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "id".to_string(),
            });
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "name".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_builder() {
        let food = FoodItem::new("42", "Yogurt")
            .with_ingredients(["milk", "cultures"])
            .with_allergens(["milk"])
            .with_flags(true, false)
            .with_fodmap_level(FodmapLevel::Moderate)
            .with_brand("Acme")
            .with_barcode("0001")
            .with_data_source(DataSource::OpenFoodFacts);

        assert_eq!(food.ingredients, vec!["milk", "cultures"]);
        assert!(food.allergens.contains("milk"));
        assert!(food.gluten_free);
        assert!(!food.lactose_free);
        assert_eq!(food.fodmap_level, FodmapLevel::Moderate);
        assert_eq!(food.data_source.to_string(), "open_food_facts");
    }

    #[test]
    fn test_validate_requires_id_and_name() {
        assert!(FoodItem::new("1", "Bread").validate().is_ok());
        assert_eq!(
            FoodItem::new(" ", "Bread").validate(),
            Err(ValidationError::MissingField {
                field: "id".to_string()
            })
        );
        assert_eq!(
            FoodItem::new("1", "").validate(),
            Err(ValidationError::MissingField {
                field: "name".to_string()
            })
        );
    }

    #[test]
    fn test_food_deserialize_defaults() {
        let food: FoodItem =
            serde_json::from_str(r#"{"id":"7","name":"Crackers","ingredients":["rice"]}"#).unwrap();
        assert_eq!(food.fodmap_level, FodmapLevel::Unknown);
        assert_eq!(food.data_source, DataSource::Manual);
        assert!(!food.gluten_free);
    }
}
