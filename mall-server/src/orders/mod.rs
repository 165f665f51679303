//! Order Lifecycle Engine
//!
//! 订单创建、支付、取消、发货、收货与库存预留。
//!
//! 状态机与所有业务不变量见 [`service::OrderService`]。

mod error;
mod service;

pub use error::{OrderError, OrderResult};
pub use service::OrderService;

#[cfg(test)]
mod tests;
