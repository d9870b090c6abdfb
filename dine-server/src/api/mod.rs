//! API 路由模块
//!
//! 同步引擎的编排层: 每个处理器按 [变更 → 重读 → 广播] 的因果链
//! 执行，变更器失败时整条链中止，不发生任何广播。
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`menu`] - 菜单管理接口 (admin)
//! - [`orders`] - 订单接口 (customer 下单 / admin 管理)
//! - [`receipts`] - 小票邮件接口

pub mod health;
pub mod menu;
pub mod orders;
pub mod receipts;
