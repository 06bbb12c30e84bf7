//! Favorites state core.
//!
//! A reducer-driven container for the set of meal IDs the user has
//! favorited.
//!
//! # Sync policy
//!
//! Favorites are *remote-first*, the inverse of the cart: the API call must
//! succeed before the local set changes, so local membership never diverges
//! from confirmed server state. Failures surface as both a returned error
//! and the `error` field, since no local change happened and the UI must
//! not claim otherwise. There is no offline fallback; favorites rely
//! solely on the remote service.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::instrument;

use potlucky_core::MealId;

use crate::api::{ApiError, MarketplaceApi};

/// Errors returned by favorites mutations.
#[derive(Debug, Error)]
pub enum FavoritesError {
    /// The remote favorites call failed; local state is unchanged.
    #[error("favorites service error: {0}")]
    Api(#[from] ApiError),
}

// =============================================================================
// State
// =============================================================================

/// Snapshot of the favorites state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesState {
    /// Favorited meal IDs. Set semantics, no ordering guarantee.
    pub favorites: HashSet<MealId>,
    /// True only while the initial [`FavoritesStore::load`] is in flight.
    pub loading: bool,
    /// Message from the last failed operation, if any.
    pub error: Option<String>,
}

impl FavoritesState {
    /// Membership test.
    #[must_use]
    pub fn is_favorite(&self, meal_id: &MealId) -> bool {
        self.favorites.contains(meal_id)
    }

    /// Number of favorited meals.
    #[must_use]
    pub fn count(&self) -> usize {
        self.favorites.len()
    }
}

// =============================================================================
// Reducer
// =============================================================================

/// State transitions. Only dispatched after the remote call they mirror has
/// succeeded (except the loading and error bookkeeping).
#[derive(Debug)]
enum FavoritesAction {
    SetLoading(bool),
    SetError(Option<String>),
    /// Replace the whole set (hydration).
    SetFavorites(HashSet<MealId>),
    Added(MealId),
    Removed(MealId),
}

/// Pure transition function. The only place favorites state changes.
fn apply(state: &mut FavoritesState, action: FavoritesAction) {
    match action {
        FavoritesAction::SetLoading(loading) => state.loading = loading,
        FavoritesAction::SetError(error) => state.error = error,
        FavoritesAction::SetFavorites(favorites) => {
            state.favorites = favorites;
            state.error = None;
        }
        FavoritesAction::Added(meal_id) => {
            state.favorites.insert(meal_id);
            state.error = None;
        }
        FavoritesAction::Removed(meal_id) => {
            state.favorites.remove(&meal_id);
            state.error = None;
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// The favorites state container.
///
/// One instance per application session, shared by reference from the
/// composition root. State lives behind a mutex that is never held across
/// an await point.
pub struct FavoritesStore {
    state: Mutex<FavoritesState>,
    api: Arc<dyn MarketplaceApi>,
}

impl FavoritesStore {
    /// Create an empty favorites store.
    #[must_use]
    pub fn new(api: Arc<dyn MarketplaceApi>) -> Self {
        Self {
            state: Mutex::new(FavoritesState::default()),
            api,
        }
    }

    /// Hydrate the set from the favorites service.
    ///
    /// Fetches the favorited meals and projects them to their IDs. On
    /// failure the set keeps its previous contents (empty on first load)
    /// and `error` carries the message.
    #[instrument(skip(self))]
    pub async fn load(&self) {
        self.dispatch(FavoritesAction::SetLoading(true));

        match self.api.get_favorite_meals().await {
            Ok(meals) => {
                let ids = meals.into_iter().map(|meal| meal.id).collect();
                self.dispatch(FavoritesAction::SetFavorites(ids));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load favorites");
                self.dispatch(FavoritesAction::SetError(Some(e.to_string())));
            }
        }

        self.dispatch(FavoritesAction::SetLoading(false));
    }

    /// Favorite a meal.
    ///
    /// Calls the remote mutation first and inserts into the local set only
    /// on success.
    ///
    /// # Errors
    ///
    /// Returns an error (and sets the `error` field) if the remote call
    /// fails; local state is unchanged in that case.
    #[instrument(skip(self), fields(meal_id = %meal_id))]
    pub async fn add_to_favorites(&self, meal_id: &MealId) -> Result<(), FavoritesError> {
        if let Err(e) = self.api.add_favorite(meal_id).await {
            tracing::error!(error = %e, "Failed to add favorite");
            self.dispatch(FavoritesAction::SetError(Some(e.to_string())));
            return Err(e.into());
        }

        self.dispatch(FavoritesAction::Added(meal_id.clone()));
        Ok(())
    }

    /// Unfavorite a meal.
    ///
    /// Calls the remote mutation first and removes from the local set only
    /// on success.
    ///
    /// # Errors
    ///
    /// Returns an error (and sets the `error` field) if the remote call
    /// fails; local state is unchanged in that case.
    #[instrument(skip(self), fields(meal_id = %meal_id))]
    pub async fn remove_from_favorites(&self, meal_id: &MealId) -> Result<(), FavoritesError> {
        if let Err(e) = self.api.remove_favorite(meal_id).await {
            tracing::error!(error = %e, "Failed to remove favorite");
            self.dispatch(FavoritesAction::SetError(Some(e.to_string())));
            return Err(e.into());
        }

        self.dispatch(FavoritesAction::Removed(meal_id.clone()));
        Ok(())
    }

    /// Add or remove based on current membership.
    ///
    /// # Errors
    ///
    /// Propagates the error of whichever operation was chosen.
    pub async fn toggle_favorite(&self, meal_id: &MealId) -> Result<(), FavoritesError> {
        if self.is_favorite(meal_id) {
            self.remove_from_favorites(meal_id).await
        } else {
            self.add_to_favorites(meal_id).await
        }
    }

    /// Membership test against current state.
    #[must_use]
    pub fn is_favorite(&self, meal_id: &MealId) -> bool {
        self.lock_state().is_favorite(meal_id)
    }

    /// Current state snapshot.
    #[must_use]
    pub fn snapshot(&self) -> FavoritesState {
        self.lock_state().clone()
    }

    /// Current favorited meal IDs.
    #[must_use]
    pub fn favorites(&self) -> HashSet<MealId> {
        self.lock_state().favorites.clone()
    }

    /// True while the initial load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock_state().loading
    }

    /// Message from the last failed operation, if any.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.lock_state().error.clone()
    }

    fn dispatch(&self, action: FavoritesAction) {
        let mut state = self.lock_state();
        apply(&mut state, action);
    }

    fn lock_state(&self) -> MutexGuard<'_, FavoritesState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
