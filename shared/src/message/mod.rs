//! 同步事件定义
//!
//! 服务器推送给所有在线观察者的事件词表。事件名和 payload 形状是
//! 对外协议: 客户端按名字订阅，服务器不做事件重放，连接之后才
//! 发生的变更只能通过增量事件到达。
//!
//! # 事件流
//!
//! ```text
//! mutation commit ──▶ SyncEvent ──▶ EventBus ──▶ 所有在线 socket
//! connection      ──▶ initialMenu + initialOrders (一次性快照)
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{MenuItem, Order};

/// Per-connection snapshot event: the full menu listing, sent once
/// immediately after a viewer connects.
pub const SNAPSHOT_MENU: &str = "initialMenu";

/// Per-connection snapshot event: the full orders listing, sent once
/// right after [`SNAPSHOT_MENU`].
pub const SNAPSHOT_ORDERS: &str = "initialOrders";

/// One event per committed mutation, carrying the freshly-read record
/// (or the bare id for deletions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyncEvent {
    NewFoodItem(MenuItem),
    FoodItemDeleted(i64),
    NewOrder(Order),
    OrderUpdated(Order),
    OrderDeleted(i64),
}

impl SyncEvent {
    /// Wire event name.
    pub fn name(&self) -> &'static str {
        match self {
            SyncEvent::NewFoodItem(_) => "newFoodItem",
            SyncEvent::FoodItemDeleted(_) => "foodItemDeleted",
            SyncEvent::NewOrder(_) => "newOrder",
            SyncEvent::OrderUpdated(_) => "orderUpdated",
            SyncEvent::OrderDeleted(_) => "orderDeleted",
        }
    }

    /// Wire payload: the committed record, or the bare id for deletes.
    pub fn payload(&self) -> Value {
        match self {
            SyncEvent::NewFoodItem(item) => {
                serde_json::to_value(item).expect("Failed to serialize menu item payload")
            }
            SyncEvent::FoodItemDeleted(id) => Value::from(*id),
            SyncEvent::NewOrder(order) | SyncEvent::OrderUpdated(order) => {
                serde_json::to_value(order).expect("Failed to serialize order payload")
            }
            SyncEvent::OrderDeleted(id) => Value::from(*id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;

    fn sample_order() -> Order {
        Order {
            id: 1,
            order_datetime: "2026-01-01 12:00:00".to_string(),
            table_number: "5".to_string(),
            items: r#"{"Pizza":2}"#.to_string(),
            total_price: 1500.0,
            status: OrderStatus::Pending,
        }
    }

    #[test]
    fn test_event_names() {
        let item = MenuItem {
            id: 1,
            name: "Pizza".to_string(),
            price: 750.0,
        };
        assert_eq!(SyncEvent::NewFoodItem(item).name(), "newFoodItem");
        assert_eq!(SyncEvent::FoodItemDeleted(1).name(), "foodItemDeleted");
        assert_eq!(SyncEvent::NewOrder(sample_order()).name(), "newOrder");
        assert_eq!(SyncEvent::OrderUpdated(sample_order()).name(), "orderUpdated");
        assert_eq!(SyncEvent::OrderDeleted(1).name(), "orderDeleted");
    }

    #[test]
    fn test_delete_payload_is_bare_id() {
        assert_eq!(SyncEvent::FoodItemDeleted(7).payload(), Value::from(7));
        assert_eq!(SyncEvent::OrderDeleted(3).payload(), Value::from(3));
    }

    #[test]
    fn test_order_payload_mirrors_row() {
        let payload = SyncEvent::NewOrder(sample_order()).payload();
        assert_eq!(payload["id"], 1);
        assert_eq!(payload["table_number"], "5");
        assert_eq!(payload["items"], r#"{"Pizza":2}"#);
        assert_eq!(payload["total_price"], 1500.0);
        assert_eq!(payload["status"], "pending");
    }
}
