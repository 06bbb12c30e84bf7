//! Core types for Potlucky.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod meal;
pub mod price;

pub use cart::{CartItem, cart_item_count, cart_total};
pub use id::*;
pub use meal::Meal;
pub use price::Price;
