//! Server Implementation
//!
//! HTTP 服务器启动和管理: 组装路由、挂 socket.io 层、
//! 启动事件转发任务。

use anyhow::Context;
use axum::{Router, middleware};
use socketioxide::SocketIo;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::core::{Config, ServerState};
use crate::services::realtime;

/// HTTP 请求日志中间件
async fn log_request(
    request: axum::extract::Request,
    next: middleware::Next,
) -> axum::response::Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::menu::router())
        .merge(crate::api::orders::router())
        .merge(crate::api::receipts::router())
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (for sharing with tests)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        // Create application state if not provided
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await,
        };

        // socket.io 层: 连接处理器负责快照，转发任务负责增量事件
        let (socket_layer, io) = SocketIo::builder()
            .with_state(state.clone())
            .build_layer();
        io.ns("/", realtime::on_connect);
        realtime::start_forwarder(io, state.event_bus.clone());

        let app = build_app()
            .with_state(state.clone())
            .layer(socket_layer)
            // Tower HTTP 中间件
            .layer(CorsLayer::permissive())
            .layer(CompressionLayer::new())
            // HTTP 请求日志中间件
            .layer(middleware::from_fn(log_request));

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("🍽️ DineSync server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;

        let shutdown_bus = state.event_bus.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
                shutdown_bus.shutdown();
            })
            .await
            .context("server error")?;

        Ok(())
    }
}
