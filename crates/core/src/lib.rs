//! Volt Core - Shared domain types.
//!
//! This crate provides common types used across all Volt Store components:
//! - `storefront` - Client library: cart, persistence, REST API client
//! - `cli` - Terminal front end for browsing, the cart and checkout
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, cart entries, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
