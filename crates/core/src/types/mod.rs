//! Core types for Volt Store.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use cart::CartEntry;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use status::*;
