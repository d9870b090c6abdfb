//! 事件总线核心实现
//!
//! # 消息流
//!
//! ```text
//! api handler ──▶ publish() ──▶ broadcast::Sender<SyncEvent>
//!                                        │
//!                                 forwarder 任务
//!                                        ▼
//!                                所有在线 socket
//! ```
//!
//! 投递语义是 at-most-once: 没有确认、没有重放，事件发出时不在线的
//! 观察者永远收不到它 (快照负责补齐连接时刻之前的状态)。

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use shared::SyncEvent;

/// 已连接的观察者 (顾客页或管理台)
#[derive(Debug, Clone)]
pub struct ConnectedViewer {
    pub id: String,
    /// Unix millis at registration time
    pub connected_at: i64,
}

/// 事件总线 - 负责同步事件的扇出和观察者管理
///
/// # 职责
///
/// - 事件扇出 (publish / subscribe)
/// - 观察者注册表 (register_viewer / deregister_viewer)
/// - 关闭信号 (shutdown)
///
/// 注册表归总线私有，其他组件只能通过这几个方法触碰连接集合。
#[derive(Debug)]
pub struct EventBus {
    /// 服务器到观察者的广播通道
    tx: broadcast::Sender<SyncEvent>,
    /// 关闭信号令牌
    shutdown_token: CancellationToken,
    /// 在线观察者注册表 (socket id → info)
    viewers: DashMap<String, ConnectedViewer>,
}

impl EventBus {
    /// 创建默认容量的事件总线
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// 创建指定容量的事件总线
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            shutdown_token: CancellationToken::new(),
            viewers: DashMap::new(),
        }
    }

    /// 发布一个同步事件给所有订阅者
    ///
    /// 返回收到事件的订阅者数量。没有订阅者不算错误: 变更已经
    /// 提交，没有观众只意味着没人要通知。
    pub fn publish(&self, event: SyncEvent) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                tracing::debug!(event = event.name(), "no subscribers, event dropped");
                0
            }
        }
    }

    /// 订阅事件流
    ///
    /// 订阅只覆盖之后发布的事件，之前的不重放。
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.tx.subscribe()
    }

    /// 登记一个新连接的观察者
    pub fn register_viewer(&self, id: impl Into<String>) {
        let id = id.into();
        self.viewers.insert(
            id.clone(),
            ConnectedViewer {
                id,
                connected_at: Utc::now().timestamp_millis(),
            },
        );
    }

    /// 移除一个断开的观察者
    pub fn deregister_viewer(&self, id: &str) {
        self.viewers.remove(id);
    }

    /// 当前在线观察者数量
    pub fn viewer_count(&self) -> usize {
        self.viewers.len()
    }

    /// 获取在线观察者列表
    pub fn connected_viewers(&self) -> Vec<ConnectedViewer> {
        self.viewers.iter().map(|e| e.value().clone()).collect()
    }

    /// 获取关闭令牌 (用于后台任务监控关闭信号)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 优雅关闭事件总线，停止转发任务
    pub fn shutdown(&self) {
        tracing::info!("Shutting down event bus");
        self.shutdown_token.cancel();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::MenuItem;

    fn sample_event() -> SyncEvent {
        SyncEvent::NewFoodItem(MenuItem {
            id: 1,
            name: "Pizza".to_string(),
            price: 750.0,
        })
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        assert_eq!(bus.publish(sample_event()), 1);
        let event = rx.recv().await.unwrap();
        assert_eq!(event.name(), "newFoodItem");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let bus = EventBus::new();
        // No audience: the event is dropped, not an error
        assert_eq!(bus.publish(sample_event()), 0);
    }

    #[tokio::test]
    async fn test_no_replay_for_late_subscribers() {
        let bus = EventBus::new();
        let mut early = bus.subscribe();
        bus.publish(sample_event());

        let mut late = bus.subscribe();
        bus.publish(SyncEvent::FoodItemDeleted(1));

        // Early subscriber sees both, late one only the second
        assert_eq!(early.recv().await.unwrap().name(), "newFoodItem");
        assert_eq!(early.recv().await.unwrap().name(), "foodItemDeleted");
        assert_eq!(late.recv().await.unwrap().name(), "foodItemDeleted");
        assert!(late.try_recv().is_err());
    }

    #[test]
    fn test_viewer_registry_lifecycle() {
        let bus = EventBus::new();
        assert_eq!(bus.viewer_count(), 0);

        bus.register_viewer("sid-1");
        bus.register_viewer("sid-2");
        assert_eq!(bus.viewer_count(), 2);

        bus.deregister_viewer("sid-1");
        assert_eq!(bus.viewer_count(), 1);
        assert_eq!(bus.connected_viewers()[0].id, "sid-2");

        // Deregistering an unknown id is a no-op
        bus.deregister_viewer("sid-1");
        assert_eq!(bus.viewer_count(), 1);
    }
}
