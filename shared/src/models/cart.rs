//! Cart Model

use serde::{Deserialize, Serialize};

/// Cart line entity (购物车行)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Cart {
    pub id: i64,
    pub user_id: i64,
    pub snack_id: i64,
    pub quantity: i64,
    pub create_time: i64,
    pub update_time: i64,
}
