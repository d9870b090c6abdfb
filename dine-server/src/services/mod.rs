//! 服务模块
//!
//! - [`realtime`] - socket.io 实时桥 (快照 + 事件转发)
//! - [`robot`] - 送餐机器人派发
//! - [`receipt`] - 小票邮件派发

pub mod realtime;
pub mod receipt;
pub mod robot;

pub use receipt::ReceiptMailer;
pub use robot::RobotDispatcher;
