//! Shared types for the snack mall backend
//!
//! Data models and DTOs used by the server and (via JSON) the storefront,
//! plus money and ID helpers.

pub mod models;
pub mod money;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
