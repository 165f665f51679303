//! Cart Repository

use super::{RepoResult, placeholders};
use shared::models::Cart;
use sqlx::SqliteConnection;

/// Resolve cart lines by id, scoped to the owning user.
///
/// 行数少于请求的 id 数说明部分 id 不存在或属于其他用户，由调用方判定。
pub async fn find_by_ids_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
    ids: &[i64],
) -> RepoResult<Vec<Cart>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT * FROM cart WHERE user_id = ? AND id IN ({})",
        placeholders(ids.len())
    );
    let mut query = sqlx::query_as::<_, Cart>(&sql);
    query = query.bind(user_id);
    for id in ids {
        query = query.bind(id);
    }
    let lines = query.fetch_all(conn).await?;
    Ok(lines)
}

/// Delete consumed cart lines (owner-scoped), returns affected rows
pub async fn delete_by_ids_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
    ids: &[i64],
) -> RepoResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    let sql = format!(
        "DELETE FROM cart WHERE user_id = ? AND id IN ({})",
        placeholders(ids.len())
    );
    let mut query = sqlx::query(&sql);
    query = query.bind(user_id);
    for id in ids {
        query = query.bind(id);
    }
    let rows = query.execute(conn).await?;
    Ok(rows.rows_affected())
}
