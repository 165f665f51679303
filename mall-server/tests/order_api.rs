//! Order API integration tests
//!
//! Drives the full router (extractors, handlers, engine, SQLite) through
//! `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use mall_server::core::{Config, ServerState, build_app};
use shared::util::{now_millis, snowflake_id};

const USER_ID: i64 = 1001;
const OTHER_USER_ID: i64 = 2002;

async fn test_state() -> (tempfile::TempDir, ServerState) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    let state = ServerState::initialize(&config).await.unwrap();
    (dir, state)
}

fn app(state: &ServerState) -> Router {
    build_app().with_state(state.clone())
}

async fn seed_snack(state: &ServerState, name: &str, price: i64, stock: i64) -> i64 {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO snack (id, name, price, stock, status, sales_count, cover_image, create_time, update_time) VALUES (?, ?, ?, ?, 'ON_SALE', 0, 'cover.png', ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(price)
    .bind(stock)
    .bind(now)
    .bind(now)
    .execute(&state.pool)
    .await
    .unwrap();
    id
}

async fn seed_address(state: &ServerState, user_id: i64) -> i64 {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO address (id, user_id, consignee_name, phone, province, city, district, detailed_address, is_default, create_time, update_time) VALUES (?, ?, 'Tester', '13800000000', 'Guangdong', 'Shenzhen', 'Nanshan', 'No.1 Snack Road', 1, ?, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(now)
    .bind(now)
    .execute(&state.pool)
    .await
    .unwrap();
    id
}

fn json_request(method: &str, uri: &str, user_id: Option<i64>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(uid) = user_id {
        builder = builder.header("x-user-id", uid.to_string());
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn read_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (_dir, state) = test_state().await;
    let response = app(&state)
        .oneshot(json_request("GET", "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn full_order_lifecycle_over_http() {
    let (_dir, state) = test_state().await;
    let snack_id = seed_snack(&state, "Shrimp Chips", 500, 10).await;
    let address_id = seed_address(&state, USER_ID).await;

    // 创建
    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/api/orders",
            Some(USER_ID),
            Some(json!({
                "address_id": address_id,
                "order_type": "DIRECT_ORDER",
                "snack_id": snack_id,
                "quantity": 2,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E0000");
    assert_eq!(body["data"]["status"], "UNPAID");
    assert_eq!(body["data"]["total_amount"], 1000);
    assert_eq!(body["data"]["total_amount_display"], "10.00");
    let order_id = body["data"]["id"].as_i64().unwrap();

    // 支付
    let response = app(&state)
        .oneshot(json_request(
            "PUT",
            &format!("/api/orders/{order_id}/pay"),
            Some(USER_ID),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["status"], "PAID");

    // 发货 (管理端)
    let response = app(&state)
        .oneshot(json_request(
            "PUT",
            &format!("/api/orders/admin/{order_id}/ship"),
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["status"], "SHIPPED");

    // 收货
    let response = app(&state)
        .oneshot(json_request(
            "PUT",
            &format!("/api/orders/{order_id}/complete"),
            Some(USER_ID),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["status"], "COMPLETED");

    // 详情包含订单项和地址
    let response = app(&state)
        .oneshot(json_request(
            "GET",
            &format!("/api/orders/{order_id}"),
            Some(USER_ID),
            None,
        ))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["data"]["items"][0]["snack_name"], "Shrimp Chips");
    assert_eq!(body["data"]["address"]["id"], address_id);
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let (_dir, state) = test_state().await;
    let response = app(&state)
        .oneshot(json_request("GET", "/api/orders", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E3001");
}

#[tokio::test]
async fn unknown_order_type_is_rejected_at_the_boundary() {
    let (_dir, state) = test_state().await;
    let address_id = seed_address(&state, USER_ID).await;

    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/api/orders",
            Some(USER_ID),
            Some(json!({
                "address_id": address_id,
                "order_type": "GROUP_ORDER",
                "snack_id": 1,
                "quantity": 1,
            })),
        ))
        .await
        .unwrap();
    // 反序列化边界直接拒绝，未知订单类型到不了引擎
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn insufficient_stock_maps_to_business_rule() {
    let (_dir, state) = test_state().await;
    let snack_id = seed_snack(&state, "Last Bag", 500, 1).await;
    let address_id = seed_address(&state, USER_ID).await;

    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/api/orders",
            Some(USER_ID),
            Some(json!({
                "address_id": address_id,
                "order_type": "DIRECT_ORDER",
                "snack_id": snack_id,
                "quantity": 2,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E0005");
}

#[tokio::test]
async fn ownership_is_enforced_except_for_admin_paths() {
    let (_dir, state) = test_state().await;
    let snack_id = seed_snack(&state, "Gummy Bears", 100, 10).await;
    let address_id = seed_address(&state, USER_ID).await;

    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/api/orders",
            Some(USER_ID),
            Some(json!({
                "address_id": address_id,
                "order_type": "DIRECT_ORDER",
                "snack_id": snack_id,
                "quantity": 1,
            })),
        ))
        .await
        .unwrap();
    let body = read_json(response).await;
    let order_id = body["data"]["id"].as_i64().unwrap();

    let response = app(&state)
        .oneshot(json_request(
            "GET",
            &format!("/api/orders/{order_id}"),
            Some(OTHER_USER_ID),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E2001");

    // 管理端详情跳过归属校验（权限由上游网关控制）
    let response = app(&state)
        .oneshot(json_request(
            "GET",
            &format!("/api/orders/admin/{order_id}"),
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn user_list_is_paginated() {
    let (_dir, state) = test_state().await;
    let snack_id = seed_snack(&state, "Wasabi Peas", 250, 50).await;
    let address_id = seed_address(&state, USER_ID).await;

    for quantity in [1, 2, 3] {
        let response = app(&state)
            .oneshot(json_request(
                "POST",
                "/api/orders",
                Some(USER_ID),
                Some(json!({
                    "address_id": address_id,
                    "order_type": "DIRECT_ORDER",
                    "snack_id": snack_id,
                    "quantity": quantity,
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app(&state)
        .oneshot(json_request(
            "GET",
            "/api/orders?limit=2&offset=0",
            Some(USER_ID),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);

    let response = app(&state)
        .oneshot(json_request(
            "GET",
            "/api/orders?status=UNPAID",
            Some(USER_ID),
            None,
        ))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["data"]["total"], 3);
}
