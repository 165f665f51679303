//! Order API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/pay", put(handler::pay))
        .route("/{id}/cancel", put(handler::cancel))
        .route("/{id}/complete", put(handler::complete))
        // 管理端路由：权限控制由上游网关完成
        .route("/admin", get(handler::admin_list))
        .route("/admin/{id}", get(handler::admin_detail))
        .route("/admin/{id}/ship", put(handler::ship))
}
