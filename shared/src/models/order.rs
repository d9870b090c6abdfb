//! Order Model
//!
//! `items` 持久化为 JSON 文本 (名称 → 数量)，下单时快照。
//! 快照与 menu 表解耦: 删除菜单项不影响既有订单的行项目。

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Line items captured at submission time: item name → positive quantity.
pub type LineItems = BTreeMap<String, i64>;

/// Order status. `pending` is the initial state, `completed` the only
/// state reachable from it; deletion is allowed from either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    Pending,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    /// 受控词表: 只接受 "pending" / "completed"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(format!("invalid order status: {other}")),
        }
    }
}

/// Order entity
///
/// Mirrors the `orders` row; `items` is kept as the raw JSON text the
/// store holds, so events and listings carry it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Server-local wall-clock, set once at creation.
    pub order_datetime: String,
    pub table_number: String,
    /// JSON-encoded line-items snapshot.
    pub items: String,
    /// Client-computed total, trusted as given.
    pub total_price: f64,
    pub status: OrderStatus,
}

impl Order {
    /// Decode the line-items snapshot.
    pub fn line_items(&self) -> Result<LineItems, serde_json::Error> {
        serde_json::from_str(&self.items)
    }
}

/// Submit order payload (customer client, camelCase wire format)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub table_number: String,
    pub items: LineItems,
    pub total_price: f64,
    /// Optional receipt address; triggers a best-effort mail dispatch
    /// after the order commits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Listing sort direction by id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse a query value; anything other than the literal "asc" means
    /// descending (newest-by-id first), matching the admin console.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn sql_keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_vocabulary() {
        assert_eq!("pending".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
        assert_eq!(
            "completed".parse::<OrderStatus>(),
            Ok(OrderStatus::Completed)
        );
        assert!("delivered".parse::<OrderStatus>().is_err());
        assert!("PENDING".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_serde_roundtrip() {
        let json = serde_json::to_string(&OrderStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
        let back: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OrderStatus::Completed);
    }

    #[test]
    fn test_submit_payload_wire_format() {
        // Exactly what the customer page posts
        let raw = r#"{"tableNumber":"5","items":{"Pizza":2},"totalPrice":1500}"#;
        let payload: OrderCreate = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.table_number, "5");
        assert_eq!(payload.items.get("Pizza"), Some(&2));
        assert_eq!(payload.total_price, 1500.0);
        assert!(payload.email.is_none());
    }

    #[test]
    fn test_line_items_decode() {
        let order = Order {
            id: 1,
            order_datetime: "2026-01-01 12:00:00".to_string(),
            table_number: "5".to_string(),
            items: r#"{"Pizza":2,"Cola":1}"#.to_string(),
            total_price: 1800.0,
            status: OrderStatus::Pending,
        };
        let items = order.line_items().unwrap();
        assert_eq!(items.get("Pizza"), Some(&2));
        assert_eq!(items.get("Cola"), Some(&1));
    }

    #[test]
    fn test_sort_direction_from_query() {
        assert_eq!(SortDirection::from_query(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::from_query(Some("desc")), SortDirection::Desc);
        // Anything unrecognized falls back to newest first
        assert_eq!(SortDirection::from_query(Some("bogus")), SortDirection::Desc);
        assert_eq!(SortDirection::from_query(None), SortDirection::Desc);
    }
}
