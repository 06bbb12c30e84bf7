//! Production marketplace API client.
//!
//! REST over `reqwest` 0.13. The bearer token is injected once via default
//! headers so individual calls stay declarative.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;
use url::Url;

use potlucky_core::{CartItem, LineId, Meal, MealId};

use crate::api::{ApiError, MarketplaceApi};
use crate::config::ClientConfig;

/// Client for the marketplace REST API.
///
/// Cheaply cloneable via `Arc`; one instance serves both state stores.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new marketplace API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();

        // Authorization header
        let auth_value = format!("Bearer {}", config.api_token.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| ApiError::Parse(format!("Invalid API token format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: base_url_from(&config.api_url),
            }),
        })
    }
}

#[async_trait]
impl MarketplaceApi for ApiClient {
    #[instrument(skip(self))]
    async fn get_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        let url = format!("{}/cart", self.inner.base_url);

        let response = self.inner.client.get(&url).send().await?;
        let response = into_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    #[instrument(skip(self, item), fields(meal_id = %item.meal_id, quantity = %item.quantity))]
    async fn add_to_cart(&self, item: &CartItem) -> Result<(), ApiError> {
        let url = format!("{}/cart/items", self.inner.base_url);

        let response = self.inner.client.post(&url).json(item).send().await?;
        into_success(response).await?;

        Ok(())
    }

    #[instrument(skip(self), fields(line_id = %line_id))]
    async fn remove_from_cart(&self, line_id: &LineId) -> Result<(), ApiError> {
        let url = format!("{}/cart/items/{line_id}", self.inner.base_url);

        let response = self.inner.client.delete(&url).send().await?;
        into_success(response).await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_cart(&self) -> Result<(), ApiError> {
        let url = format!("{}/cart", self.inner.base_url);

        let response = self.inner.client.delete(&url).send().await?;
        into_success(response).await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_favorite_meals(&self) -> Result<Vec<Meal>, ApiError> {
        let url = format!("{}/favorites", self.inner.base_url);

        let response = self.inner.client.get(&url).send().await?;
        let response = into_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    #[instrument(skip(self), fields(meal_id = %meal_id))]
    async fn add_favorite(&self, meal_id: &MealId) -> Result<(), ApiError> {
        let url = format!("{}/favorites/{meal_id}", self.inner.base_url);

        let response = self.inner.client.put(&url).send().await?;
        into_success(response).await?;

        Ok(())
    }

    #[instrument(skip(self), fields(meal_id = %meal_id))]
    async fn remove_favorite(&self, meal_id: &MealId) -> Result<(), ApiError> {
        let url = format!("{}/favorites/{meal_id}", self.inner.base_url);

        let response = self.inner.client.delete(&url).send().await?;
        into_success(response).await?;

        Ok(())
    }
}

/// Endpoint prefix without a trailing slash, so joins stay predictable.
fn base_url_from(url: &Url) -> String {
    url.as_str().trim_end_matches('/').to_string()
}

/// Map non-2xx responses to [`ApiError::Api`] with the body as the message.
async fn into_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ApiError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;

    fn test_config(api_url: &str) -> ClientConfig {
        ClientConfig {
            api_url: api_url.parse().unwrap(),
            api_token: SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6"),
            cache_dir: PathBuf::from(".potlucky"),
            http_timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let url: Url = "https://api.potlucky.test/".parse().unwrap();
        assert_eq!(base_url_from(&url), "https://api.potlucky.test");

        let url: Url = "https://api.potlucky.test/v1/".parse().unwrap();
        assert_eq!(base_url_from(&url), "https://api.potlucky.test/v1");
    }

    #[test]
    fn test_client_builds_from_config() {
        let client = ApiClient::new(&test_config("https://api.potlucky.test/"));
        assert!(client.is_ok());
        assert_eq!(
            client.unwrap().inner.base_url,
            "https://api.potlucky.test"
        );
    }

    #[test]
    fn test_client_rejects_non_ascii_token() {
        let mut config = test_config("https://api.potlucky.test");
        config.api_token = SecretString::from("tok\nen");
        let result = ApiClient::new(&config);
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }
}
