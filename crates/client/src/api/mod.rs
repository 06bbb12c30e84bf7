//! Marketplace REST API boundary.
//!
//! # Architecture
//!
//! - [`MarketplaceApi`] is the trait the state stores call through; it keeps
//!   the stores testable against scripted fakes.
//! - [`ApiClient`] is the production implementation, a thin `reqwest` wrapper
//!   with bearer-token auth injected via default headers.
//! - The server is the source of truth for favorites; for the cart it is a
//!   best-effort mirror of the locally authoritative state (see the store
//!   modules for the two sync policies).

mod rest;

pub use rest::ApiClient;

use async_trait::async_trait;
use thiserror::Error;

use potlucky_core::{CartItem, LineId, Meal, MealId};

/// Errors that can occur when interacting with the marketplace API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response or build a request.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Remote operations the cart and favorites stores depend on.
///
/// `Send + Sync` bounds let implementations be shared across the stores
/// behind an `Arc`.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Fetch the canonical cart for the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    async fn get_cart(&self) -> Result<Vec<CartItem>, ApiError>;

    /// Record a cart line on the order service.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn add_to_cart(&self, item: &CartItem) -> Result<(), ApiError>;

    /// Delete a cart line from the order service.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn remove_from_cart(&self, line_id: &LineId) -> Result<(), ApiError>;

    /// Delete the entire cart from the order service.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn clear_cart(&self) -> Result<(), ApiError>;

    /// Fetch the meals the current user has favorited.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    async fn get_favorite_meals(&self) -> Result<Vec<Meal>, ApiError>;

    /// Mark a meal as favorited.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn add_favorite(&self, meal_id: &MealId) -> Result<(), ApiError>;

    /// Remove a meal from the user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn remove_favorite(&self, meal_id: &MealId) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Api {
            status: 503,
            message: "service unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - service unavailable");
    }

    #[test]
    fn test_parse_error_display() {
        let err = ApiError::Parse("expected value at line 1".to_string());
        assert_eq!(err.to_string(), "Parse error: expected value at line 1");
    }
}
