//! Cart line type and shared cart arithmetic.
//!
//! A cart is an ordered list of [`CartItem`] rows, at most one per meal.
//! The derived values the UI shows (order total, badge count) are computed
//! by the helpers here so every consumer - reducer, tests, presentation -
//! agrees on the arithmetic.

use serde::{Deserialize, Serialize};

use super::id::{LineId, MealId};
use super::meal::Meal;
use super::price::Price;

/// A single row in the shopping cart: one distinct meal and its quantity.
///
/// `line_id` identifies the row itself and is distinct from `meal_id`:
/// server-hydrated rows carry the order service's line identifiers, while
/// optimistic local inserts mint their own via [`LineId::generate`].
///
/// Serializes with camelCase field names; this is both the REST wire shape
/// and the offline snapshot shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Cart row identifier.
    pub line_id: LineId,
    /// Identifier of the purchasable meal.
    pub meal_id: MealId,
    /// Meal display name.
    pub meal_name: String,
    /// Unit price at the time the row was created.
    pub price: Price,
    /// Requested quantity, always >= 1 in a well-formed cart.
    pub quantity: u32,
    /// Chef display name.
    pub chef: String,
    /// Image URL, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Pickup location, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl CartItem {
    /// Build a cart row from a meal, minting a fresh local line ID.
    #[must_use]
    pub fn from_meal(meal: &Meal, quantity: u32) -> Self {
        Self {
            line_id: LineId::generate(),
            meal_id: meal.id.clone(),
            meal_name: meal.name.clone(),
            price: meal.price,
            quantity,
            chef: meal.chef.clone(),
            image: meal.image.clone(),
            location: meal.location.clone(),
        }
    }

    /// Price of this row: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Sum of `price * quantity` over all rows.
///
/// The cart reducer recomputes this after every items mutation; the total is
/// never stored independently of the rows it derives from.
#[must_use]
pub fn cart_total(items: &[CartItem]) -> Price {
    items.iter().map(CartItem::line_total).sum()
}

/// Sum of quantities over all rows (the cart badge count).
///
/// Saturates at `u32::MAX` rather than overflowing.
#[must_use]
pub fn cart_item_count(items: &[CartItem]) -> u32 {
    items
        .iter()
        .fold(0, |count, item| count.saturating_add(item.quantity))
}
