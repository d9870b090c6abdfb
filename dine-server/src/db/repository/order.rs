//! Order Repository
//!
//! 订单集合的变更器。下单时把行项目快照成 JSON 文本、盖上服务器
//! 本地时间戳、状态固定为 pending。状态更新是宽松的字段写入
//! (last write wins)，删除不看当前状态。

use chrono::Local;
use shared::models::{Order, OrderCreate, OrderStatus, SortDirection};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use crate::utils::validation::{MAX_TABLE_LEN, validate_required_text};

const COLLECTION: &str = "orders";

const ORDER_COLUMNS: &str = "id, order_datetime, table_number, items, total_price, status";

/// List all orders ordered by id per the requested direction.
pub async fn find_all(pool: &SqlitePool, sort: SortDirection) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "SELECT {ORDER_COLUMNS} FROM orders ORDER BY id {}",
        sort.sql_keyword()
    );
    sqlx::query_as::<_, Order>(&sql)
        .fetch_all(pool)
        .await
        .map_err(RepoError::storage("find_all", COLLECTION))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
    sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(RepoError::storage("find_by_id", COLLECTION))
}

/// Insert a new order and return the committed row.
///
/// Validates the submission (non-empty line items, positive quantities,
/// non-negative total); the total itself is client-computed and stored
/// as given, never re-derived from the menu.
pub async fn create(pool: &SqlitePool, data: OrderCreate) -> RepoResult<Order> {
    validate_required_text(&data.table_number, "tableNumber", MAX_TABLE_LEN)
        .map_err(RepoError::Validation)?;
    if data.items.is_empty() {
        return Err(RepoError::Validation(
            "order must contain at least one item".into(),
        ));
    }
    for (name, qty) in &data.items {
        if *qty <= 0 {
            return Err(RepoError::Validation(format!(
                "quantity for {name} must be positive, got {qty}"
            )));
        }
    }
    if !data.total_price.is_finite() || data.total_price < 0.0 {
        return Err(RepoError::Validation(format!(
            "totalPrice must be a non-negative number, got {}",
            data.total_price
        )));
    }

    let items_json = serde_json::to_string(&data.items)
        .map_err(|e| RepoError::Validation(format!("items are not serializable: {e}")))?;
    let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO orders (order_datetime, table_number, items, total_price, status) \
         VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&now)
    .bind(&data.table_number)
    .bind(&items_json)
    .bind(data.total_price)
    .bind(OrderStatus::Pending)
    .fetch_one(pool)
    .await
    .map_err(RepoError::storage("insert", COLLECTION))?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("order {id} missing after insert")))
}

/// Permissive status field update.
///
/// Writes whichever member of the vocabulary it is given without
/// checking the current value; concurrent writers race and the last
/// commit wins. Updating an absent id succeeds and changes nothing.
pub async fn update_status(pool: &SqlitePool, id: i64, status: OrderStatus) -> RepoResult<()> {
    sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await
        .map_err(RepoError::storage("update_status", COLLECTION))?;
    Ok(())
}

/// Delete by id, regardless of status. Absent ids are a successful
/// no-op; returns whether a row actually existed.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(RepoError::storage("delete", COLLECTION))?;
    Ok(result.rows_affected() > 0)
}
