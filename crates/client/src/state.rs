//! Application state shared across the UI shell.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError, MarketplaceApi};
use crate::cart::CartStore;
use crate::config::ClientConfig;
use crate::favorites::FavoritesStore;
use crate::offline::{FileStore, OfflineStore, OfflineStoreError};

/// Error constructing the application state.
#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("API client error: {0}")]
    Api(#[from] ApiError),
    #[error("offline store error: {0}")]
    Offline(#[from] OfflineStoreError),
}

/// Application state shared across the UI shell.
///
/// This struct is cheaply cloneable via `Arc` and owns the single cart and
/// favorites store instances for the session. Construct exactly one per
/// running application; everything below the composition root receives it
/// by reference or clone, never builds its own.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ClientConfig,
    cart: CartStore,
    favorites: FavoritesStore,
}

impl AppState {
    /// Create the application state with production collaborators.
    ///
    /// Builds the REST API client from the config and a file-backed offline
    /// store under the configured cache directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built or the cache
    /// directory cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, AppStateError> {
        let api: Arc<dyn MarketplaceApi> = Arc::new(ApiClient::new(&config)?);
        let offline: Arc<dyn OfflineStore> = Arc::new(FileStore::new(config.cache_dir.clone())?);

        Ok(Self::with_collaborators(config, api, offline))
    }

    /// Create the application state with injected collaborators.
    ///
    /// Used by tests to substitute scripted API and storage fakes.
    #[must_use]
    pub fn with_collaborators(
        config: ClientConfig,
        api: Arc<dyn MarketplaceApi>,
        offline: Arc<dyn OfflineStore>,
    ) -> Self {
        let cart = CartStore::new(Arc::clone(&api), offline);
        let favorites = FavoritesStore::new(api);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                cart,
                favorites,
            }),
        }
    }

    /// Hydrate both stores from the remote service.
    ///
    /// The stores are independent, so the two loads run concurrently. Each
    /// handles its own failure path; hydration itself cannot fail.
    pub async fn hydrate(&self) {
        tokio::join!(self.inner.cart.load(), self.inner.favorites.load());
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the favorites store.
    #[must_use]
    pub fn favorites(&self) -> &FavoritesStore {
        &self.inner.favorites
    }
}
