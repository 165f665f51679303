//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 订单接口（用户 + 管理端）
//!
//! 认证由上游网关完成，handler 通过 [`extract::CurrentUser`] 取得用户身份。

pub mod extract;
pub mod health;
pub mod orders;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
pub use extract::CurrentUser;
