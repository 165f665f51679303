//! Snack Repository
//!
//! 商品读取 + 库存原子增减。库存扣减使用条件更新 (`stock >= ?`)，
//! 由调用方检查 rows_affected，零行即视为库存竞争失败。

use super::{RepoResult, placeholders};
use shared::models::Snack;
use sqlx::{SqliteConnection, SqlitePool};

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Snack>> {
    let snack = sqlx::query_as::<_, Snack>("SELECT * FROM snack WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(snack)
}

/// Find a snack inside a caller-owned transaction
pub async fn find_by_id_tx(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Snack>> {
    let snack = sqlx::query_as::<_, Snack>("SELECT * FROM snack WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(snack)
}

/// Find several snacks by id inside a caller-owned transaction
pub async fn find_by_ids_tx(conn: &mut SqliteConnection, ids: &[i64]) -> RepoResult<Vec<Snack>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!("SELECT * FROM snack WHERE id IN ({})", placeholders(ids.len()));
    let mut query = sqlx::query_as::<_, Snack>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let snacks = query.fetch_all(conn).await?;
    Ok(snacks)
}

/// 条件扣减库存，返回受影响行数
///
/// `stock >= ?` 谓词保证并发下库存不会被扣成负数；
/// 返回 0 表示商品不存在或库存已被并发消费。
pub async fn decrement_stock(
    conn: &mut SqliteConnection,
    id: i64,
    quantity: i64,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE snack SET stock = stock - ?, update_time = ? WHERE id = ? AND stock >= ?",
    )
    .bind(quantity)
    .bind(now)
    .bind(id)
    .bind(quantity)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected())
}

/// 恢复库存 (取消订单)，返回受影响行数
pub async fn increment_stock(
    conn: &mut SqliteConnection,
    id: i64,
    quantity: i64,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE snack SET stock = stock + ?, update_time = ? WHERE id = ?")
        .bind(quantity)
        .bind(now)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}
