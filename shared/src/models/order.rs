//! Order Model
//!
//! 订单主表 + 订单项，以及订单状态机。
//!
//! # 状态机
//!
//! ```text
//! UNPAID --pay--> PAID --ship--> SHIPPED --complete--> COMPLETED
//! UNPAID --cancel--> CANCELLED
//! ```
//!
//! Transition validity is the pure function [`OrderStatus::permits`];
//! everything else (timestamps, stock restoration) hangs off it.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::address::Address;
use crate::money::format_minor_units;

/// Order status enum (closed set, one-directional transitions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(
    feature = "db",
    derive(sqlx::Type),
    sqlx(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum OrderStatus {
    Unpaid,
    Paid,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "UNPAID",
            Self::Paid => "PAID",
            Self::Shipped => "SHIPPED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Whether `transition` is legal from this status.
    pub fn permits(&self, transition: OrderTransition) -> bool {
        match transition {
            OrderTransition::Pay => *self == Self::Unpaid,
            OrderTransition::Cancel => *self == Self::Unpaid,
            OrderTransition::Ship => *self == Self::Paid,
            OrderTransition::Complete => *self == Self::Shipped,
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested order transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderTransition {
    Pay,
    Cancel,
    Ship,
    Complete,
}

impl OrderTransition {
    /// Status the order lands in after this transition.
    pub fn target(&self) -> OrderStatus {
        match self {
            Self::Pay => OrderStatus::Paid,
            Self::Cancel => OrderStatus::Cancelled,
            Self::Ship => OrderStatus::Shipped,
            Self::Complete => OrderStatus::Completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pay => "pay",
            Self::Cancel => "cancel",
            Self::Ship => "ship",
            Self::Complete => "complete",
        }
    }
}

impl std::fmt::Display for OrderTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order entity (订单主表)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub order_no: String,
    pub user_id: i64,
    pub address_id: i64,
    /// 总金额（分）
    pub total_amount: i64,
    pub status: OrderStatus,
    pub remark: Option<String>,
    pub create_time: i64,
    pub payment_time: Option<i64>,
    pub ship_time: Option<i64>,
    pub complete_time: Option<i64>,
    pub cancel_time: Option<i64>,
}

/// Order item entity (订单项，价格/名称/图片为下单时快照)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub snack_id: i64,
    pub quantity: i64,
    /// 下单时单价（分），不随商品后续改价变动
    pub price: i64,
    pub snack_name: String,
    pub snack_image: Option<String>,
    pub create_time: i64,
}

// =============================================================================
// API Request Types
// =============================================================================

/// Order lines, tagged by order type.
///
/// An unrecognized `order_type` fails deserialization at the API boundary,
/// so handlers and the lifecycle engine only ever see these two shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "order_type")]
pub enum OrderLines {
    /// 购物车下单：消费并清除所选购物车行
    #[serde(rename = "CART_ORDER")]
    Cart { cart_item_ids: Vec<i64> },
    /// 直接购买：单个商品 + 数量
    #[serde(rename = "DIRECT_ORDER")]
    Direct { snack_id: i64, quantity: i64 },
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreateRequest {
    pub address_id: i64,
    #[validate(length(max = 500))]
    pub remark: Option<String>,
    #[serde(flatten)]
    pub lines: OrderLines,
}

// =============================================================================
// API Response Types (for frontend)
// =============================================================================

/// Order header for list view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    pub id: i64,
    pub order_no: String,
    pub user_id: i64,
    pub address_id: i64,
    pub total_amount: i64,
    pub total_amount_display: String,
    pub status: OrderStatus,
    pub remark: Option<String>,
    pub create_time: i64,
    pub payment_time: Option<i64>,
    pub ship_time: Option<i64>,
    pub complete_time: Option<i64>,
    pub cancel_time: Option<i64>,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            total_amount_display: format_minor_units(order.total_amount),
            id: order.id,
            order_no: order.order_no,
            user_id: order.user_id,
            address_id: order.address_id,
            total_amount: order.total_amount,
            status: order.status,
            remark: order.remark,
            create_time: order.create_time,
            payment_time: order.payment_time,
            ship_time: order.ship_time,
            complete_time: order.complete_time,
            cancel_time: order.cancel_time,
        }
    }
}

/// Order item for detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemView {
    pub snack_id: i64,
    pub quantity: i64,
    pub price: i64,
    pub price_display: String,
    pub line_total: i64,
    pub line_total_display: String,
    pub snack_name: String,
    pub snack_image: Option<String>,
}

impl From<OrderItem> for OrderItemView {
    fn from(item: OrderItem) -> Self {
        let line_total = item.price.saturating_mul(item.quantity);
        Self {
            price_display: format_minor_units(item.price),
            line_total,
            line_total_display: format_minor_units(line_total),
            snack_id: item.snack_id,
            quantity: item.quantity,
            price: item.price,
            snack_name: item.snack_name,
            snack_image: item.snack_image,
        }
    }
}

/// Full order detail (header + items + resolved address)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: OrderView,
    pub items: Vec<OrderItemView>,
    /// 收货地址；地址后续被删除时为 None
    pub address: Option<Address>,
}

impl OrderDetail {
    pub fn assemble(order: Order, items: Vec<OrderItem>, address: Option<Address>) -> Self {
        Self {
            order: order.into(),
            items: items.into_iter().map(Into::into).collect(),
            address,
        }
    }
}
