use std::path::PathBuf;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/dinesync | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | BUS_CAPACITY | 1024 | 事件总线通道容量 |
/// | ROBOT_BASE_URL | (未设置) | 送餐机器人基地址，未设置则不派发 |
/// | MAIL_GATEWAY_URL | (未设置) | 邮件网关地址，未设置则不发小票 |
/// | MAIL_FROM | receipts@dinesync.local | 小票发件人 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/dinesync HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 事件总线通道容量
    pub bus_capacity: usize,

    // === 协作方配置 ===
    /// 送餐机器人基地址 (fire-and-forget GET {base}/move?table=N)
    pub robot_base_url: Option<String>,
    /// 邮件网关地址 (小票投递)
    pub mail_gateway_url: Option<String>,
    /// 小票发件人地址
    pub mail_from: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/dinesync".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            bus_capacity: std::env::var("BUS_CAPACITY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1024),

            robot_base_url: std::env::var("ROBOT_BASE_URL").ok(),
            mail_gateway_url: std::env::var("MAIL_GATEWAY_URL").ok(),
            mail_from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "receipts@dinesync.local".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录 (work_dir/logs)
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
