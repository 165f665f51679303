//! Address Repository

use super::RepoResult;
use shared::models::Address;
use sqlx::SqlitePool;

/// Resolve an address by id, scoped to the owning user
pub async fn find_by_id_for_user(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
) -> RepoResult<Option<Address>> {
    let address =
        sqlx::query_as::<_, Address>("SELECT * FROM address WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(address)
}
