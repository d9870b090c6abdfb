//! Receipt API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::validation::{MAX_EMAIL_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// Send-receipt payload (老客户端的 send-bill 字段)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    pub email: String,
    pub order_details: String,
}

/// POST /api/receipts - 发送订单小票邮件
///
/// 同步路径: 这里的失败回给调用方，但和订单状态无关，
/// 订单早已提交。
pub async fn send(
    State(state): State<ServerState>,
    Json(payload): Json<SendReceipt>,
) -> AppResult<Json<bool>> {
    validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)
        .map_err(AppError::validation)?;

    state.mailer.send(&payload.email, &payload.order_details).await?;

    Ok(Json(true))
}
