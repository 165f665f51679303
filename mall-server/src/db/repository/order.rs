//! Order Repository
//!
//! 订单主表 + 订单项的持久化。状态流转使用带前置状态谓词的条件更新，
//! 由调用方检查 rows_affected；所有写操作都在调用方持有的事务内执行。

use super::RepoResult;
use shared::models::{Order, OrderItem, OrderStatus, OrderTransition};
use sqlx::{SqliteConnection, SqlitePool};

const ORDER_SELECT: &str = "SELECT id, order_no, user_id, address_id, total_amount, status, remark, create_time, payment_time, ship_time, complete_time, cancel_time FROM orders";

/// New order row (status is always UNPAID at insert)
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: i64,
    pub order_no: String,
    pub user_id: i64,
    pub address_id: i64,
    pub total_amount: i64,
    pub remark: Option<String>,
    pub create_time: i64,
}

/// New order item row (price/name/image are snapshots)
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub id: i64,
    pub order_id: i64,
    pub snack_id: i64,
    pub quantity: i64,
    pub price: i64,
    pub snack_name: String,
    pub snack_image: Option<String>,
    pub create_time: i64,
}

pub async fn insert(conn: &mut SqliteConnection, order: &NewOrder) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, order_no, user_id, address_id, total_amount, status, remark, create_time) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(order.id)
    .bind(&order.order_no)
    .bind(order.user_id)
    .bind(order.address_id)
    .bind(order.total_amount)
    .bind(OrderStatus::Unpaid)
    .bind(&order.remark)
    .bind(order.create_time)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn insert_item(conn: &mut SqliteConnection, item: &NewOrderItem) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_item (id, order_id, snack_id, quantity, price, snack_name, snack_image, create_time) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(item.id)
    .bind(item.order_id)
    .bind(item.snack_id)
    .bind(item.quantity)
    .bind(item.price)
    .bind(&item.snack_name)
    .bind(&item.snack_image)
    .bind(item.create_time)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

/// Find an order inside a caller-owned transaction
pub async fn find_by_id_tx(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_item WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Find order items inside a caller-owned transaction (cancel restores stock)
pub async fn find_items_tx(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_item WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    Ok(items)
}

fn timestamp_column(transition: OrderTransition) -> &'static str {
    match transition {
        OrderTransition::Pay => "payment_time",
        OrderTransition::Cancel => "cancel_time",
        OrderTransition::Ship => "ship_time",
        OrderTransition::Complete => "complete_time",
    }
}

/// 原子状态流转：status + 对应时间戳一条 UPDATE 完成
///
/// `AND status = ?` 前置谓词挡住并发下已被流转的订单；
/// 返回 0 行表示状态已变，由调用方判定为非法流转。
pub async fn apply_transition(
    conn: &mut SqliteConnection,
    id: i64,
    from: OrderStatus,
    transition: OrderTransition,
    now: i64,
) -> RepoResult<u64> {
    let sql = format!(
        "UPDATE orders SET status = ?, {} = ? WHERE id = ? AND status = ?",
        timestamp_column(transition)
    );
    let rows = sqlx::query(&sql)
        .bind(transition.target())
        .bind(now)
        .bind(id)
        .bind(from)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}

/// 用户订单分页 (按创建时间倒序)
pub async fn page_by_user(
    pool: &SqlitePool,
    user_id: i64,
    status: Option<OrderStatus>,
    limit: i64,
    offset: i64,
) -> RepoResult<(Vec<Order>, i64)> {
    let mut where_sql = "WHERE user_id = ?".to_string();
    if status.is_some() {
        where_sql.push_str(" AND status = ?");
    }

    let sql = format!("{ORDER_SELECT} {where_sql} ORDER BY create_time DESC LIMIT ? OFFSET ?");
    let mut query = sqlx::query_as::<_, Order>(&sql).bind(user_id);
    if let Some(s) = status {
        query = query.bind(s);
    }
    let orders = query.bind(limit).bind(offset).fetch_all(pool).await?;

    let count_sql = format!("SELECT COUNT(*) FROM orders {where_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(user_id);
    if let Some(s) = status {
        count_query = count_query.bind(s);
    }
    let total = count_query.fetch_one(pool).await?;

    Ok((orders, total))
}

/// 全量订单分页 (管理端，支持状态和订单号过滤)
pub async fn page_all(
    pool: &SqlitePool,
    status: Option<OrderStatus>,
    order_no: Option<&str>,
    limit: i64,
    offset: i64,
) -> RepoResult<(Vec<Order>, i64)> {
    let mut clauses: Vec<&str> = Vec::new();
    if status.is_some() {
        clauses.push("status = ?");
    }
    if order_no.is_some() {
        clauses.push("order_no LIKE ?");
    }
    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    let pattern = order_no.map(|no| format!("%{no}%"));

    let sql = format!("{ORDER_SELECT} {where_sql} ORDER BY create_time DESC LIMIT ? OFFSET ?");
    let mut query = sqlx::query_as::<_, Order>(&sql);
    if let Some(s) = status {
        query = query.bind(s);
    }
    if let Some(p) = &pattern {
        query = query.bind(p);
    }
    let orders = query.bind(limit).bind(offset).fetch_all(pool).await?;

    let count_sql = format!("SELECT COUNT(*) FROM orders {where_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(s) = status {
        count_query = count_query.bind(s);
    }
    if let Some(p) = &pattern {
        count_query = count_query.bind(p);
    }
    let total = count_query.fetch_one(pool).await?;

    Ok((orders, total))
}
