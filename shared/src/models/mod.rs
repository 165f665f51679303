//! Data models
//!
//! Shared between mall-server and the storefront (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), all timestamps Unix millis.

pub mod address;
pub mod cart;
pub mod order;
pub mod page;
pub mod snack;

// Re-exports
pub use address::*;
pub use cart::*;
pub use order::*;
pub use page::*;
pub use snack::*;
