//! 健康检查接口

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: bool,
    /// 当前在线观察者数量
    pub viewers: usize,
}

/// GET /api/health - 存活探针 + 数据库连通性
async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthStatus>> {
    let database = sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .is_ok();

    Ok(Json(HealthStatus {
        status: "ok",
        database,
        viewers: state.event_bus.viewer_count(),
    }))
}
