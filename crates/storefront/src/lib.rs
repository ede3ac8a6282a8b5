//! Volt Store client library.
//!
//! Everything a Volt Store front end needs besides rendering:
//!
//! - [`cart`] - the shopping cart, persisted after every change
//! - [`storage`] - string key-value stores and typed bindings onto them
//! - [`api`] - the REST client with a product lookup cache
//! - [`session`] and [`preferences`] - login token and theme, also persisted
//! - [`checkout`], [`validation`] and [`format`] - form handling and display
//!   helpers
//!
//! [`state::AppState`] wires these together for one run of a front end.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod format;
pub mod preferences;
pub mod session;
pub mod state;
pub mod storage;
pub mod validation;

pub use error::{AppError, Result};
pub use state::AppState;
