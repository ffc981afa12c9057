//! Shared helpers for the HTTP layer.

pub mod validate;

pub use validate::ValidatedJson;
