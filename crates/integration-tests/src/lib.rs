//! Integration tests for the Potlucky client.
//!
//! Exercises the cart and favorites stores end to end against scripted
//! in-process API and storage fakes, verifying the two sync policies
//! (optimistic cart, remote-first favorites) and the offline snapshot
//! behavior.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p potlucky-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Optimistic cart mutations and persistence side effects
//! - `cart_hydration` - Initial load, offline fallback, corrupt snapshots
//! - `favorites_flow` - Remote-first favorites mutations and toggling
//! - `app_state` - Composition root wiring and concurrent hydration

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use potlucky_client::api::{ApiError, MarketplaceApi};
use potlucky_client::offline::{OfflineStore, OfflineStoreError};
use potlucky_core::{CartItem, LineId, Meal, MealId};

/// Install a fmt subscriber so swallowed sync failures are visible when a
/// test is run with `RUST_LOG` set. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Build a meal fixture with the given ID and price.
///
/// # Panics
///
/// Panics if `price` is not a valid decimal string.
#[must_use]
pub fn meal(id: &str, price: &str) -> Meal {
    Meal::new(id, format!("Meal {id}"), price.parse().expect("valid price"))
        .with_chef(format!("Chef {id}"))
}

// =============================================================================
// FakeApi
// =============================================================================

/// Scripted marketplace API double.
///
/// Records every call in order, serves seeded cart and favorites payloads,
/// and can be switched into a failing mode where every operation returns
/// a 503.
#[derive(Default)]
pub struct FakeApi {
    cart: Mutex<Vec<CartItem>>,
    favorite_meals: Mutex<Vec<Meal>>,
    calls: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl FakeApi {
    /// An API double where every call succeeds against empty server state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An API double where every call fails with a 503.
    #[must_use]
    pub fn failing() -> Self {
        let api = Self::default();
        api.set_failing(true);
        api
    }

    /// Seed the cart payload served by `get_cart`.
    #[must_use]
    pub fn with_cart(self, items: Vec<CartItem>) -> Self {
        *lock(&self.cart) = items;
        self
    }

    /// Seed the meals payload served by `get_favorite_meals`.
    #[must_use]
    pub fn with_favorite_meals(self, meals: Vec<Meal>) -> Self {
        *lock(&self.favorite_meals) = meals;
        self
    }

    /// Switch all operations between succeeding and failing.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Names of the operations invoked so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Cart rows as the fake server currently sees them.
    #[must_use]
    pub fn server_cart(&self) -> Vec<CartItem> {
        lock(&self.cart).clone()
    }

    fn record(&self, op: &str) -> Result<(), ApiError> {
        lock(&self.calls).push(op.to_string());

        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MarketplaceApi for FakeApi {
    async fn get_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        self.record("get_cart")?;
        Ok(lock(&self.cart).clone())
    }

    async fn add_to_cart(&self, item: &CartItem) -> Result<(), ApiError> {
        self.record("add_to_cart")?;
        lock(&self.cart).push(item.clone());
        Ok(())
    }

    async fn remove_from_cart(&self, line_id: &LineId) -> Result<(), ApiError> {
        self.record("remove_from_cart")?;
        lock(&self.cart).retain(|item| item.line_id != *line_id);
        Ok(())
    }

    async fn clear_cart(&self) -> Result<(), ApiError> {
        self.record("clear_cart")?;
        lock(&self.cart).clear();
        Ok(())
    }

    async fn get_favorite_meals(&self) -> Result<Vec<Meal>, ApiError> {
        self.record("get_favorite_meals")?;
        Ok(lock(&self.favorite_meals).clone())
    }

    async fn add_favorite(&self, meal_id: &MealId) -> Result<(), ApiError> {
        self.record("add_favorite")?;
        let mut meals = lock(&self.favorite_meals);
        if !meals.iter().any(|m| m.id == *meal_id) {
            meals.push(meal(meal_id.as_str(), "0.00"));
        }
        Ok(())
    }

    async fn remove_favorite(&self, meal_id: &MealId) -> Result<(), ApiError> {
        self.record("remove_favorite")?;
        lock(&self.favorite_meals).retain(|m| m.id != *meal_id);
        Ok(())
    }
}

// =============================================================================
// FailingStore
// =============================================================================

/// Offline store double where every operation fails with an I/O error.
///
/// Models a profile whose storage is unavailable (quota exhausted, revoked
/// permission); the cart must keep working purely in memory.
#[derive(Debug, Default)]
pub struct FailingStore;

impl OfflineStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, OfflineStoreError> {
        Err(storage_unavailable())
    }

    fn put(&self, _key: &str, _value: &str) -> Result<(), OfflineStoreError> {
        Err(storage_unavailable())
    }

    fn remove(&self, _key: &str) -> Result<(), OfflineStoreError> {
        Err(storage_unavailable())
    }
}

fn storage_unavailable() -> OfflineStoreError {
    OfflineStoreError::Io(std::io::Error::other("storage unavailable"))
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
