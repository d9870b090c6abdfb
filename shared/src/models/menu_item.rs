//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Menu item entity (菜单项)
///
/// Ids are store-assigned and immutable. Items are never edited in
/// place: the only mutations are create and delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

/// Create menu item payload (admin console)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_item_wire_shape() {
        let item = MenuItem {
            id: 1,
            name: "Pizza".to_string(),
            price: 750.0,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Pizza");
        assert_eq!(json["price"], 750.0);
    }
}
