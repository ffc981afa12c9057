//! Repository layer for data access operations.
//!
//! The notification dispatcher only depends on the `AccountStore` trait so
//! tests can substitute an in-memory store.

mod account_repo;

pub use account_repo::{AccountStore, DieselAccountStore};
