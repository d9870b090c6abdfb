//! 送餐机器人派发
//!
//! Fire-and-forget: 状态变更已经提交之后才派发，结果只进日志。
//! 机器人不可达既不回滚状态更新，也不拖慢原请求。

use crate::core::Config;

#[derive(Clone, Debug)]
pub struct RobotDispatcher {
    base_url: Option<String>,
    client: reqwest::Client,
}

impl RobotDispatcher {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.robot_base_url.clone(),
            client: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Send the robot to a table. Spawned in the background; the caller
    /// never observes the outcome.
    pub fn dispatch(&self, table_number: &str) {
        let Some(base) = self.base_url.clone() else {
            tracing::debug!(table = table_number, "robot dispatch skipped, ROBOT_BASE_URL not set");
            return;
        };

        let client = self.client.clone();
        let table = table_number.to_string();
        tokio::spawn(async move {
            let url = format!("{base}/move?table={table}");
            match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::info!(table = %table, "robot dispatched");
                }
                Ok(resp) => {
                    tracing::warn!(table = %table, status = %resp.status(), "robot returned error status");
                }
                Err(e) => {
                    tracing::warn!(table = %table, error = %e, "robot dispatch failed");
                }
            }
        });
    }
}
