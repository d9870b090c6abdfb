use std::sync::Arc;

use sqlx::SqlitePool;

use shared::SyncEvent;

use crate::core::Config;
use crate::db::DbService;
use crate::message::EventBus;
use crate::services::{ReceiptMailer, RobotDispatcher};

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是同步引擎的载体: 它把状态变更器 (仓储层) 的输出接到
/// 广播器 (事件总线) 的输入上。使用 Arc 实现浅拷贝，克隆成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | 嵌入式数据库连接池 |
/// | event_bus | Arc<EventBus> | 事件总线 (广播器) |
/// | robot | RobotDispatcher | 送餐机器人派发 |
/// | mailer | ReceiptMailer | 小票邮件派发 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SQLite)
    pub pool: SqlitePool,
    /// 事件总线 - 所有成功变更的唯一广播出口
    pub event_bus: Arc<EventBus>,
    /// 送餐机器人派发器
    pub robot: RobotDispatcher,
    /// 小票邮件派发器
    pub mailer: ReceiptMailer,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/dinesync.db)
    /// 3. 事件总线与协作方派发器
    ///
    /// # Panics
    ///
    /// 工作目录或数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("dinesync.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let event_bus = Arc::new(EventBus::with_capacity(config.bus_capacity));
        let robot = RobotDispatcher::new(config);
        let mailer = ReceiptMailer::new(config);

        Self {
            config: config.clone(),
            pool: db_service.pool,
            event_bus,
            robot,
            mailer,
        }
    }

    /// 获取数据库连接池
    pub fn db(&self) -> SqlitePool {
        self.pool.clone()
    }

    /// 广播同步事件
    ///
    /// 每次成功提交的变更恰好调用一次。投递是 at-most-once:
    /// 没有在线观察者不算错误，投递失败只记日志，永远不影响
    /// 已提交的变更结果。
    pub fn broadcast(&self, event: SyncEvent) {
        let receivers = self.event_bus.publish(event);
        tracing::debug!(receivers, "sync event published");
    }
}
