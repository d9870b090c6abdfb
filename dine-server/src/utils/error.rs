//! 统一错误处理
//!
//! # 错误分类
//!
//! | 分类 | HTTP | 错误码 | 说明 |
//! |------|------|--------|------|
//! | Validation | 400 | E0002 | 输入不合法，报告给调用方，不重试不广播 |
//! | NotFound | 404 | E0003 | 资源不存在 |
//! | Storage | 500 | E9002 | 持久层故障，带失败的操作和集合名 |
//! | Internal | 500 | E9001 | 其他内部错误 |
//!
//! 投递类故障 (广播、机器人、邮件) 不在此列: 它们只进日志，
//! 永远不出现在原请求的响应里。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// API 统一错误响应体
///
/// ```json
/// {
///   "code": "E0002",
///   "message": "Validation failed: ..."
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// 错误码
    pub code: String,
    /// 消息
    pub message: String,
}

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Storage error in {collection}.{op}: {message}")]
    /// 持久层故障 (500)
    Storage {
        op: &'static str,
        collection: &'static str,
        message: String,
    },

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

impl AppError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Storage {
                op,
                collection,
                source,
            } => AppError::Storage {
                op,
                collection,
                message: source.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),

            AppError::Storage {
                op,
                collection,
                message,
            } => {
                error!(target: "database", collection, op, error = %message, "Storage error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Storage error".to_string(),
                )
            }

            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorBody {
            code: code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// 处理器的 Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
