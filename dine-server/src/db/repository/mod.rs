//! Repository Module
//!
//! 状态变更器: 对 `menu` / `orders` 两个集合的唯一写入方。
//! 所有访问都走这层窄接口，handler 不直接碰连接池做写操作。

pub mod menu;
pub mod order;

use thiserror::Error;

/// Repository error types
///
/// `Storage` carries the operation and collection that failed, so a
/// persistence fault is never reported without its origin.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{collection}.{op} failed: {source}")]
    Storage {
        op: &'static str,
        collection: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl RepoError {
    /// Tag an sqlx failure with the operation and collection it came from.
    pub(crate) fn storage(
        op: &'static str,
        collection: &'static str,
    ) -> impl FnOnce(sqlx::Error) -> RepoError {
        move |source| RepoError::Storage {
            op,
            collection,
            source,
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
