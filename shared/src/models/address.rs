//! Address Model

use serde::{Deserialize, Serialize};

/// Shipping address entity (收货地址)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Address {
    pub id: i64,
    pub user_id: i64,
    pub consignee_name: String,
    pub phone: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub detailed_address: String,
    pub is_default: bool,
    pub create_time: i64,
    pub update_time: i64,
}
