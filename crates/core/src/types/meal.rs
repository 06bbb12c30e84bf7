//! Meal summary type.
//!
//! The minimal view of a purchasable meal that the cart core needs: an
//! identifier, a price, and the display fields a cart row carries. Browse
//! and detail screens work with richer representations owned by the
//! presentation layer; this type is the contract for "add this to my cart".

use serde::{Deserialize, Serialize};

use super::id::MealId;
use super::price::Price;

/// A purchasable meal, as handed to the cart core.
///
/// Carries at minimum an identifier and a price; the remaining fields are
/// copied onto the cart line for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    /// Meal identifier.
    pub id: MealId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Display name of the chef offering the meal.
    pub chef: String,
    /// Image URL, if the chef uploaded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Pickup location, if the meal is tied to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Meal {
    /// Create a meal with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<MealId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            chef: String::new(),
            image: None,
            location: None,
        }
    }

    /// Set the chef display name.
    #[must_use]
    pub fn with_chef(mut self, chef: impl Into<String>) -> Self {
        self.chef = chef.into();
        self
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    /// Set the pickup location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}
