//! Potlucky Core - Shared domain types.
//!
//! This crate provides the common types used across the Potlucky client
//! components:
//! - `client` - Cart and favorites state cores plus their collaborators
//! - `integration-tests` - Cross-crate tests driving the composition root
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients, no storage. This keeps it lightweight and allows it to be used
//! anywhere, including inside test fakes.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, the currency-agnostic [`Price`], meal and
//!   cart-line types, and the shared cart arithmetic helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
