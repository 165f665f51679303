//! Snack Mall Server - 零食商城订单后端
//!
//! # 模块结构
//!
//! ```text
//! mall-server/src/
//! ├── core/          # 配置、状态、HTTP 服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── orders/        # 订单生命周期引擎 (核心)
//! ├── db/            # 数据库层 (SQLite + 仓储)
//! └── utils/         # 错误、日志
//! ```
//!
//! The order lifecycle engine ([`orders::OrderService`]) owns order creation
//! and all status transitions; stock reservation happens at creation time via
//! a conditional decrement so stock can never go negative under concurrency.

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use orders::{OrderError, OrderService};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
