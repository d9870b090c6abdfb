//! 事件总线模块
//!
//! 广播器核心: 变更事件从这里扇出到所有在线观察者。

pub mod bus;

pub use bus::{ConnectedViewer, EventBus};
