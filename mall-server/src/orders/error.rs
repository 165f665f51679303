use thiserror::Error;

use crate::db::repository::RepoError;
use crate::utils::AppError;
use shared::models::{OrderStatus, OrderTransition};

/// Order lifecycle errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Address not found: {0}")]
    AddressNotFound(i64),

    #[error("Snack not found: {0}")]
    ItemNotFound(i64),

    #[error("Some cart items do not exist or belong to another user")]
    CartItemsMissing,

    #[error("Order does not belong to the current user")]
    NotOwner,

    #[error("Transition '{action}' is not allowed from status {from}")]
    InvalidStateTransition {
        from: OrderStatus,
        action: OrderTransition,
    },

    #[error("Snack is off shelf: {name}")]
    ItemUnavailable { name: String },

    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    #[error("Stock update affected no rows for snack {snack_id}")]
    StockUpdateFailed { snack_id: i64 },

    #[error("Quantity must be between 1 and {}", shared::money::MAX_QUANTITY)]
    InvalidQuantity,

    #[error("Order total exceeds the representable amount")]
    AmountOverflow,

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

pub type OrderResult<T> = Result<T, OrderError>;

/// 引擎错误 → HTTP 层错误
///
/// 引擎自身不生成面向用户的文案，HTTP 层按错误类别映射状态码。
impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::OrderNotFound(_)
            | OrderError::AddressNotFound(_)
            | OrderError::ItemNotFound(_)
            | OrderError::CartItemsMissing => AppError::NotFound(err.to_string()),

            OrderError::NotOwner => AppError::Forbidden(err.to_string()),

            OrderError::InvalidStateTransition { .. }
            | OrderError::ItemUnavailable { .. }
            | OrderError::InsufficientStock { .. }
            | OrderError::StockUpdateFailed { .. } => AppError::BusinessRule(err.to_string()),

            OrderError::InvalidQuantity | OrderError::AmountOverflow => {
                AppError::Validation(err.to_string())
            }

            OrderError::Repo(repo) => match repo {
                RepoError::NotFound(msg) => AppError::NotFound(msg),
                RepoError::Duplicate(msg) => AppError::Conflict(msg),
                RepoError::Validation(msg) => AppError::Validation(msg),
                RepoError::Database(msg) => AppError::Database(msg),
            },
        }
    }
}
