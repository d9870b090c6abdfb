//! DineSync 共享类型
//!
//! 在 dine-server 和客户端之间共享的数据模型与同步事件词表。
//!
//! - **模型** (`models`): 菜单项、订单及其创建/更新载荷
//! - **同步事件** (`message`): 服务器推送给观察者的事件词表
//!
//! 启用 `db` feature 后模型带 sqlx 行映射派生。

pub mod message;
pub mod models;

// Re-export 公共类型
pub use message::{SNAPSHOT_MENU, SNAPSHOT_ORDERS, SyncEvent};
pub use models::{
    LineItems, MenuItem, MenuItemCreate, Order, OrderCreate, OrderStatus, SortDirection,
};
