//! Data Models
//!
//! Wire shapes mirror the persisted rows: clients see exactly what the
//! store committed.

pub mod menu_item;
pub mod order;

pub use menu_item::{MenuItem, MenuItemCreate};
pub use order::{LineItems, Order, OrderCreate, OrderStatus, SortDirection};
