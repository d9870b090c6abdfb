//! DineSync Server - 餐厅菜单/订单实时同步服务
//!
//! # 架构概述
//!
//! 本模块是服务器的主入口，提供以下核心功能：
//!
//! - **事件总线** (`message`): 每次提交的变更恰好广播一次
//! - **数据库** (`db`): 嵌入式 SQLite 存储，仓储层是唯一写入方
//! - **实时桥** (`services/realtime`): socket.io 快照 + 增量推送
//! - **HTTP API** (`api`): 菜单/订单/小票接口
//!
//! # 模块结构
//!
//! ```text
//! dine-server/src/
//! ├── core/          # 配置、状态、HTTP 服务器
//! ├── api/           # HTTP 路由和处理器 (同步引擎编排)
//! ├── db/            # 数据库层 (状态变更器)
//! ├── message/       # 事件总线 (广播器核心)
//! ├── services/      # 实时桥、机器人、小票邮件
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod message;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use message::EventBus;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 初始化运行环境 (dotenv + 日志)
///
/// 必须在读取 [`Config`] 之前调用，否则 .env 里的配置不生效。
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____  _            _____
   / __ \(_)___  ___  / ___/__  ______  _____
  / / / / / __ \/ _ \ \__ \/ / / / __ \/ ___/
 / /_/ / / / / /  __/___/ / /_/ / / / / /__
/_____/_/_/ /_/\___//____/\__, /_/ /_/\___/
                         /____/
    "#
    );
}
