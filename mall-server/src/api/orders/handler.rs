//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::api::CurrentUser;
use crate::core::ServerState;
use crate::orders::OrderService;
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{OrderCreateRequest, OrderDetail, OrderStatus, OrderView, Page};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub status: Option<OrderStatus>,
}

/// Query params for the admin order list
#[derive(Debug, Deserialize)]
pub struct AdminListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub status: Option<OrderStatus>,
    pub order_no: Option<String>,
}

fn default_limit() -> i64 {
    20
}

/// Create an order (cart or direct purchase)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreateRequest>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let service = OrderService::new(state.pool.clone());
    let detail = service.create_order(user.0, payload).await?;
    Ok(ok(detail))
}

/// List the current user's orders (paginated, optional status filter)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Page<OrderView>>>> {
    let service = OrderService::new(state.pool.clone());
    let page = service
        .page_for_user(user.0, query.status, query.limit, query.offset)
        .await?;
    Ok(ok(page))
}

/// Get one of the current user's orders
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let service = OrderService::new(state.pool.clone());
    let detail = service.get_order_detail(id, Some(user.0)).await?;
    Ok(ok(detail))
}

/// Pay an order
pub async fn pay(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let service = OrderService::new(state.pool.clone());
    let detail = service.pay_order(id, user.0).await?;
    Ok(ok(detail))
}

/// Cancel an order (restores reserved stock)
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let service = OrderService::new(state.pool.clone());
    let detail = service.cancel_order(id, user.0).await?;
    Ok(ok(detail))
}

/// Confirm receipt of a shipped order
pub async fn complete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let service = OrderService::new(state.pool.clone());
    let detail = service.complete_order(id, user.0).await?;
    Ok(ok(detail))
}

/// Ship an order (admin, owner-agnostic)
pub async fn ship(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let service = OrderService::new(state.pool.clone());
    let detail = service.ship_order(id).await?;
    Ok(ok(detail))
}

/// Admin order detail (skips the ownership check)
pub async fn admin_detail(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let service = OrderService::new(state.pool.clone());
    let detail = service.get_order_detail(id, None).await?;
    Ok(ok(detail))
}

/// List all orders (admin, paginated, optional status/order_no filters)
pub async fn admin_list(
    State(state): State<ServerState>,
    Query(query): Query<AdminListQuery>,
) -> AppResult<Json<AppResponse<Page<OrderView>>>> {
    let service = OrderService::new(state.pool.clone());
    let page = service
        .page_all(
            query.status,
            query.order_no.as_deref(),
            query.limit,
            query.offset,
        )
        .await?;
    Ok(ok(page))
}
