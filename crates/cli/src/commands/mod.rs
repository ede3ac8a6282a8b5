//! Command implementations.
//!
//! Each command prints its result to stdout; logs go to stderr.

pub mod account;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod theme;
