//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::SyncEvent;
use shared::models::{Order, OrderCreate, OrderStatus, SortDirection};

use crate::core::ServerState;
use crate::db::repository::order;
use crate::utils::{AppError, AppResult};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub sort: Option<String>,
}

/// GET /api/orders?sort=asc|desc - 订单列表 (默认新单在前)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let sort = SortDirection::from_query(query.sort.as_deref());
    let orders = order::find_all(&state.pool, sort).await?;
    Ok(Json(orders))
}

/// POST /api/orders - 顾客下单
pub async fn submit(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let email = payload.email.clone();

    let committed = order::create(&state.pool, payload).await?;

    state.broadcast(SyncEvent::NewOrder(committed.clone()));

    // 小票是 best-effort 副作用: 订单已提交，发信失败只记日志
    if let Some(email) = email {
        state.mailer.dispatch(&email, &committed);
    }

    Ok(Json(committed))
}

/// Status update payload. 词表校验在 handler 里做，变更器只接受
/// 已经解析过的 [`OrderStatus`]。
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// PUT /api/orders/{id}/status - 更新订单状态
///
/// 宽松契约: 不检查当前状态，写入即生效 (last write wins)。
/// 策略上调用方只应该 pending → completed，重复 completed 是
/// 可观察的 no-op。
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<bool>> {
    let status: OrderStatus = payload.status.parse().map_err(AppError::validation)?;

    order::update_status(&state.pool, id, status).await?;

    // 提交后重读; 行不存在则跳过广播 (见 DESIGN.md)
    match order::find_by_id(&state.pool, id).await? {
        Some(committed) => {
            if status == OrderStatus::Completed {
                // 机器人与状态更新并行，互不影响结果
                state.robot.dispatch(&committed.table_number);
            }
            state.broadcast(SyncEvent::OrderUpdated(committed));
        }
        None => tracing::debug!(id, "status update for absent order, no broadcast"),
    }

    Ok(Json(true))
}

/// DELETE /api/orders/{id} - 删除订单 (任意状态，幂等)
///
/// "只删已完成订单" 是管理台的策略; 这里按 id 无条件删除。
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let existed = order::delete(&state.pool, id).await?;
    if !existed {
        tracing::debug!(id, "delete of absent order");
    }

    // 不存在也广播，与历史行为保持一致
    state.broadcast(SyncEvent::OrderDeleted(id));

    Ok(Json(true))
}
