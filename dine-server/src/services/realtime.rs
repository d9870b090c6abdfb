//! 实时同步桥 (socket.io)
//!
//! 两条路径:
//!
//! 1. **快照**: 连接处理器读当前全量菜单和订单，按
//!    `initialMenu` → `initialOrders` 的顺序发给新 socket，然后把它
//!    登记进观察者注册表。快照反映连接时刻 (或之后) 的存储状态。
//! 2. **增量**: forwarder 任务订阅事件总线，把每个 [`SyncEvent`]
//!    用它的事件名转发给所有在线 socket。
//!
//! 投递失败只记日志 (at-most-once)，永远不回传给触发变更的请求。

use std::sync::Arc;

use socketioxide::SocketIo;
use socketioxide::extract::{SocketRef, State};
use tokio::sync::broadcast;

use shared::message::{SNAPSHOT_MENU, SNAPSHOT_ORDERS};
use shared::models::SortDirection;

use crate::core::ServerState;
use crate::db::repository::{menu, order};
use crate::message::EventBus;

/// Namespace `/` connection handler: snapshot first, then live events.
pub async fn on_connect(socket: SocketRef, State(state): State<ServerState>) {
    let sid = socket.id.to_string();
    tracing::info!(sid = %sid, "viewer connected");

    // 快照: 先菜单后订单，和老客户端约定一致。
    // 订单按自然 id 顺序 (插入序)。
    match menu::find_all(&state.pool).await {
        Ok(items) => {
            if let Err(e) = socket.emit(SNAPSHOT_MENU, &items) {
                tracing::warn!(sid = %sid, error = %e, "menu snapshot delivery failed");
            }
        }
        Err(e) => tracing::warn!(sid = %sid, error = %e, "failed to load menu snapshot"),
    }
    match order::find_all(&state.pool, SortDirection::Asc).await {
        Ok(orders) => {
            if let Err(e) = socket.emit(SNAPSHOT_ORDERS, &orders) {
                tracing::warn!(sid = %sid, error = %e, "orders snapshot delivery failed");
            }
        }
        Err(e) => tracing::warn!(sid = %sid, error = %e, "failed to load orders snapshot"),
    }

    state.event_bus.register_viewer(sid);

    let bus = state.event_bus.clone();
    socket.on_disconnect(move |socket: SocketRef| {
        let bus = bus.clone();
        async move {
            tracing::info!(sid = %socket.id, "viewer disconnected");
            bus.deregister_viewer(&socket.id.to_string());
        }
    });
}

/// Spawn the bus → socket.io forwarder: one event in, one emit out.
///
/// Stops when the bus shuts down or every sender is gone.
pub fn start_forwarder(io: SocketIo, bus: Arc<EventBus>) {
    let mut rx = bus.subscribe();
    let shutdown = bus.shutdown_token().clone();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                received = rx.recv() => match received {
                    Ok(event) => {
                        if let Err(e) = io.emit(event.name(), &event.payload()).await {
                            // 投递故障与变更结果隔离，只记日志
                            tracing::warn!(event = event.name(), error = %e, "broadcast delivery failed");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "forwarder lagged behind the event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
        tracing::debug!("event forwarder stopped");
    });
}
