//! Potlucky marketplace client core.
//!
//! This crate provides the state-management layer the Potlucky UI shell is
//! built on: the cart and favorites stores, their remote API client, and the
//! offline snapshot store used for refresh resilience.
//!
//! # Architecture
//!
//! - Each store is a reducer-driven state container: a private action enum
//!   plus a pure transition function, wrapped in a store type that owns the
//!   state behind a mutex and exposes the public operations.
//! - The cart is *optimistic*: mutations apply locally first, then sync to
//!   the order service best-effort (failures are logged and swallowed).
//! - Favorites are *remote-first*: the API call must succeed before the
//!   local set changes. The asymmetry is a product decision, not an
//!   inconsistency.
//! - [`state::AppState`] is the composition root; construct exactly one per
//!   application session and hand it to the UI shell.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod favorites;
pub mod offline;
pub mod state;
