//! Cart state core.
//!
//! A reducer-driven container for the shopping cart: line items, derived
//! total, loading flag, and a non-blocking error message.
//!
//! # Sync policy
//!
//! The cart is *local-first*. Mutations apply to in-memory state
//! synchronously, then sync to the order service best-effort; a failed sync
//! is logged and swallowed, never rolled back, and never surfaced to the
//! caller. Only [`CartStore::load`] can set the `error` field, and even then
//! it still produces a usable cart from the offline snapshot.
//!
//! # Persistence
//!
//! Every items mutation rewrites the offline snapshot under
//! [`CART_STORAGE_KEY`] in the same dispatch, including when the cart
//! becomes empty. [`CartStore::clear_cart`] removes the key instead. No
//! other component may touch this key.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::instrument;

use potlucky_core::{CartItem, LineId, Meal, Price, cart_item_count, cart_total};

use crate::api::MarketplaceApi;
use crate::offline::OfflineStore;

/// Offline store key holding the serialized cart snapshot.
///
/// Single shared slot owned exclusively by the cart store.
pub const CART_STORAGE_KEY: &str = "potlucky_cart";

// =============================================================================
// State
// =============================================================================

/// Snapshot of the cart state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    /// Cart rows, at most one per meal, in insertion order.
    pub items: Vec<CartItem>,
    /// Always `Σ(price * quantity)` over `items`; recomputed by the reducer
    /// on every items mutation, never stored independently.
    pub total: Price,
    /// True only while the initial [`CartStore::load`] is in flight.
    pub loading: bool,
    /// Non-blocking error message from the last failed load, if any.
    pub error: Option<String>,
}

impl CartState {
    /// Sum of quantities over all rows (the cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        cart_item_count(&self.items)
    }

    /// True when the cart holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Reducer
// =============================================================================

/// State transitions. Applied atomically under the store lock.
#[derive(Debug)]
enum CartAction {
    SetLoading(bool),
    SetError(Option<String>),
    /// Replace all rows (hydration from server or offline snapshot).
    SetItems(Vec<CartItem>),
    /// Merge a row in: an existing row for the same meal absorbs the
    /// quantity, otherwise the row is appended.
    AddItem(CartItem),
    RemoveItem(LineId),
    /// Set a row's quantity; zero removes the row entirely.
    UpdateQuantity { line_id: LineId, quantity: u32 },
    Clear,
}

/// Pure transition function. The only place cart state changes.
fn apply(state: &mut CartState, action: CartAction) {
    match action {
        CartAction::SetLoading(loading) => state.loading = loading,
        CartAction::SetError(error) => state.error = error,
        CartAction::SetItems(items) => {
            state.items = items;
            state.total = cart_total(&state.items);
            state.error = None;
        }
        CartAction::AddItem(item) => {
            match state.items.iter_mut().find(|i| i.meal_id == item.meal_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => state.items.push(item),
            }
            state.total = cart_total(&state.items);
            state.error = None;
        }
        CartAction::RemoveItem(line_id) => {
            state.items.retain(|i| i.line_id != line_id);
            state.total = cart_total(&state.items);
            state.error = None;
        }
        CartAction::UpdateQuantity { line_id, quantity } => {
            if quantity == 0 {
                state.items.retain(|i| i.line_id != line_id);
            } else if let Some(item) = state.items.iter_mut().find(|i| i.line_id == line_id) {
                item.quantity = quantity;
            }
            state.total = cart_total(&state.items);
            state.error = None;
        }
        CartAction::Clear => {
            state.items.clear();
            state.total = Price::ZERO;
            state.error = None;
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// The cart state container.
///
/// One instance per application session, shared by reference from the
/// composition root. All operations take `&self`; state lives behind a
/// mutex that is never held across an await point.
pub struct CartStore {
    state: Mutex<CartState>,
    api: Arc<dyn MarketplaceApi>,
    offline: Arc<dyn OfflineStore>,
}

impl CartStore {
    /// Create an empty cart store.
    #[must_use]
    pub fn new(api: Arc<dyn MarketplaceApi>, offline: Arc<dyn OfflineStore>) -> Self {
        Self {
            state: Mutex::new(CartState::default()),
            api,
            offline,
        }
    }

    /// Hydrate the cart from the order service.
    ///
    /// On success the fetched rows replace local state. On failure the
    /// offline snapshot (empty if absent or unreadable) becomes the working
    /// set and `error` carries a non-blocking message. Either way the store
    /// ends up `Ready` with `loading` false.
    #[instrument(skip(self))]
    pub async fn load(&self) {
        self.dispatch(CartAction::SetLoading(true));

        match self.api.get_cart().await {
            Ok(items) => self.dispatch(CartAction::SetItems(items)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load cart, falling back to offline snapshot");
                let items = self.read_offline_snapshot();
                self.dispatch(CartAction::SetItems(items));
                self.dispatch(CartAction::SetError(Some(e.to_string())));
            }
        }

        self.dispatch(CartAction::SetLoading(false));
    }

    /// Add `quantity` units of a meal to the cart.
    ///
    /// If a row for the meal already exists its quantity is incremented
    /// (saturating at `u32::MAX`); otherwise a new row is appended. The
    /// local update always succeeds; the follow-up sync to the order
    /// service is best-effort. `quantity` is not clamped, passing zero is
    /// the caller's mistake.
    #[instrument(skip(self, meal), fields(meal_id = %meal.id, quantity = %quantity))]
    pub async fn add_to_cart(&self, meal: &Meal, quantity: u32) {
        let item = CartItem::from_meal(meal, quantity);
        self.dispatch(CartAction::AddItem(item.clone()));

        if let Err(e) = self.api.add_to_cart(&item).await {
            tracing::error!(error = %e, "Failed to sync cart add, keeping local state");
        }
    }

    /// Remove the row with the given line ID.
    ///
    /// Local removal always succeeds; the remote sync is best-effort.
    #[instrument(skip(self), fields(line_id = %line_id))]
    pub async fn remove_from_cart(&self, line_id: &LineId) {
        self.dispatch(CartAction::RemoveItem(line_id.clone()));

        if let Err(e) = self.api.remove_from_cart(line_id).await {
            tracing::error!(error = %e, "Failed to sync cart removal, keeping local state");
        }
    }

    /// Set a row's quantity; zero (or an unknown line ID at zero) removes it.
    ///
    /// Local only. Quantity changes never issue a remote call, unlike add
    /// and remove.
    pub fn update_quantity(&self, line_id: &LineId, quantity: u32) {
        self.dispatch(CartAction::UpdateQuantity {
            line_id: line_id.clone(),
            quantity,
        });
    }

    /// Empty the cart, purge the offline snapshot, and issue a best-effort
    /// remote clear.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) {
        self.dispatch(CartAction::Clear);

        if let Err(e) = self.api.clear_cart().await {
            tracing::error!(error = %e, "Failed to sync cart clear, keeping local state");
        }
    }

    /// Current state snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.lock_state().clone()
    }

    /// Current cart rows.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.lock_state().items.clone()
    }

    /// Sum of quantities over all rows.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lock_state().item_count()
    }

    /// Current cart total.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lock_state().total
    }

    /// True while the initial load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock_state().loading
    }

    /// Message from the last failed load, if any.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.lock_state().error.clone()
    }

    /// Apply an action and run its persistence side effect while still
    /// holding the state lock, so snapshot writes observe every mutation in
    /// dispatch order.
    fn dispatch(&self, action: CartAction) {
        let persist = matches!(
            action,
            CartAction::AddItem(_)
                | CartAction::RemoveItem(_)
                | CartAction::UpdateQuantity { .. }
        );
        let purge = matches!(action, CartAction::Clear);

        let mut state = self.lock_state();
        apply(&mut state, action);

        if persist {
            self.write_offline_snapshot(&state.items);
        } else if purge {
            if let Err(e) = self.offline.remove(CART_STORAGE_KEY) {
                tracing::error!(error = %e, "Failed to purge offline cart snapshot");
            }
        }
    }

    fn write_offline_snapshot(&self, items: &[CartItem]) {
        match serde_json::to_string(items) {
            Ok(json) => {
                if let Err(e) = self.offline.put(CART_STORAGE_KEY, &json) {
                    tracing::error!(error = %e, "Failed to write offline cart snapshot");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize cart snapshot");
            }
        }
    }

    /// Offline snapshot rows, or empty when the snapshot is absent or
    /// unreadable. Corrupt snapshots are discarded, not fatal.
    fn read_offline_snapshot(&self) -> Vec<CartItem> {
        let raw = match self.offline.get(CART_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read offline cart snapshot");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(error = %e, "Discarding corrupt offline cart snapshot");
                Vec::new()
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
