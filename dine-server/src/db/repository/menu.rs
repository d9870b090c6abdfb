//! Menu Repository
//!
//! 菜单集合的变更器: 插入 / 列表 / 点查 / 幂等删除。
//! 菜单项没有原地更新操作，价格一经写入不再改动。

use shared::models::{MenuItem, MenuItemCreate};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

const COLLECTION: &str = "menu";

/// Full listing, id ascending.
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    sqlx::query_as::<_, MenuItem>("SELECT id, name, price FROM menu ORDER BY id")
        .fetch_all(pool)
        .await
        .map_err(RepoError::storage("find_all", COLLECTION))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    sqlx::query_as::<_, MenuItem>("SELECT id, name, price FROM menu WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(RepoError::storage("find_by_id", COLLECTION))
}

/// Insert a new item and return the committed row, fresh id included.
pub async fn create(pool: &SqlitePool, data: MenuItemCreate) -> RepoResult<MenuItem> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN).map_err(RepoError::Validation)?;
    if !data.price.is_finite() || data.price < 0.0 {
        return Err(RepoError::Validation(format!(
            "price must be a non-negative number, got {}",
            data.price
        )));
    }

    let id: i64 = sqlx::query_scalar("INSERT INTO menu (name, price) VALUES (?, ?) RETURNING id")
        .bind(&data.name)
        .bind(data.price)
        .fetch_one(pool)
        .await
        .map_err(RepoError::storage("insert", COLLECTION))?;

    // 重新读取已提交记录，广播携带的就是这一份
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("menu item {id} missing after insert")))
}

/// Delete by id. Deleting an absent id is a successful no-op; returns
/// whether a row actually existed.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM menu WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(RepoError::storage("delete", COLLECTION))?;
    Ok(result.rows_affected() > 0)
}
