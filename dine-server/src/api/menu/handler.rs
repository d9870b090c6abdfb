//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::SyncEvent;
use shared::models::{MenuItem, MenuItemCreate};

use crate::core::ServerState;
use crate::db::repository::menu;
use crate::utils::AppResult;

/// GET /api/menu - 获取菜单 (快照也复用这条查询)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let items = menu::find_all(&state.pool).await?;
    Ok(Json(items))
}

/// POST /api/menu - 新增菜单项
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    // 变更器里已经是 insert → 重读已提交记录的链
    let item = menu::create(&state.pool, payload).await?;

    // 提交成功后恰好一次广播，携带重读出的记录
    state.broadcast(SyncEvent::NewFoodItem(item.clone()));

    Ok(Json(item))
}

/// DELETE /api/menu/{id} - 删除菜单项 (幂等)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let existed = menu::delete(&state.pool, id).await?;
    if !existed {
        tracing::debug!(id, "delete of absent menu item");
    }

    // 不存在也广播，与历史行为保持一致
    state.broadcast(SyncEvent::FoodItemDeleted(id));

    Ok(Json(true))
}
