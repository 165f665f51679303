//! Snack Model

use serde::{Deserialize, Serialize};

/// Snack status enum (上架/下架)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(
    feature = "db",
    derive(sqlx::Type),
    sqlx(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum SnackStatus {
    OnSale,
    OffShelf,
}

impl SnackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnSale => "ON_SALE",
            Self::OffShelf => "OFF_SHELF",
        }
    }
}

impl std::fmt::Display for SnackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snack entity (商品)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Snack {
    pub id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    /// 单价（分）
    pub price: i64,
    pub stock: i64,
    pub cover_image: Option<String>,
    pub detail_images: Option<String>,
    pub status: SnackStatus,
    pub sales_count: i64,
    pub create_time: i64,
    pub update_time: i64,
}

impl Snack {
    pub fn is_on_sale(&self) -> bool {
        self.status == SnackStatus::OnSale
    }
}
