use super::*;

use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::db::DbService;
use shared::models::{OrderCreateRequest, OrderLines, SnackStatus};
use shared::util::{now_millis, snowflake_id};


const USER_ID: i64 = 1001;
const OTHER_USER_ID: i64 = 2002;

/// Open a fresh file-backed test database (WAL, migrations applied).
///
/// The TempDir must stay alive for the duration of the test.
async fn test_pool() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let db = DbService::new(&db_path.to_string_lossy()).await.unwrap();
    (dir, db.pool)
}

// ========================================================================
// Seed helpers
// ========================================================================

async fn seed_snack_with_status(
    pool: &SqlitePool,
    name: &str,
    price: i64,
    stock: i64,
    status: SnackStatus,
) -> i64 {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO snack (id, name, price, stock, status, sales_count, cover_image, create_time, update_time) VALUES (?, ?, ?, ?, ?, 0, 'cover.png', ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(price)
    .bind(stock)
    .bind(status)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();
    id
}

async fn seed_snack(pool: &SqlitePool, name: &str, price: i64, stock: i64) -> i64 {
    seed_snack_with_status(pool, name, price, stock, SnackStatus::OnSale).await
}

async fn seed_address(pool: &SqlitePool, user_id: i64) -> i64 {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO address (id, user_id, consignee_name, phone, province, city, district, detailed_address, is_default, create_time, update_time) VALUES (?, ?, 'Tester', '13800000000', 'Guangdong', 'Shenzhen', 'Nanshan', 'No.1 Snack Road', 1, ?, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();
    id
}

async fn seed_cart_line(pool: &SqlitePool, user_id: i64, snack_id: i64, quantity: i64) -> i64 {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO cart (id, user_id, snack_id, quantity, create_time, update_time) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(snack_id)
    .bind(quantity)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();
    id
}

// ========================================================================
// Request builders
// ========================================================================

fn direct_request(address_id: i64, snack_id: i64, quantity: i64) -> OrderCreateRequest {
    OrderCreateRequest {
        address_id,
        remark: None,
        lines: OrderLines::Direct { snack_id, quantity },
    }
}

fn cart_request(address_id: i64, cart_item_ids: Vec<i64>) -> OrderCreateRequest {
    OrderCreateRequest {
        address_id,
        remark: None,
        lines: OrderLines::Cart { cart_item_ids },
    }
}

// ========================================================================
// State probes
// ========================================================================

async fn snack_stock(pool: &SqlitePool, id: i64) -> i64 {
    sqlx::query_scalar("SELECT stock FROM snack WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn cart_count(pool: &SqlitePool, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM cart WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn order_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await
        .unwrap()
}
