//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    config::ServerConfig,
    error::ServerError,
    usecase::{ConnectionRegistry, SessionController},
};

use super::{
    dispatcher::MessageDispatcher,
    handler::{debug_race, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Race session server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(config, session, connections);
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    /// SessionController（レースセッションのユースケース）
    session: Arc<SessionController>,
    /// ConnectionRegistry（接続管理のユースケース）
    connections: Arc<ConnectionRegistry>,
}

impl Server {
    pub fn new(
        config: ServerConfig,
        session: Arc<SessionController>,
        connections: Arc<ConnectionRegistry>,
    ) -> Self {
        Self {
            config,
            session,
            connections,
        }
    }

    /// Build the router: `/ws`, the HTTP API and the static asset fallback
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            session: self.session.clone(),
            connections: self.connections.clone(),
            dispatcher: MessageDispatcher::new(self.session.clone()),
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/debug/race", get(debug_race))
            // それ以外は静的ファイル
            .fallback_service(ServeDir::new(&self.config.static_dir))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Bind to the configured address and serve until a shutdown signal
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if the address cannot be bound.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!("Race server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws", local_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        let probe_task = self
            .connections
            .spawn_probe_loop(self.config.heartbeat_interval);
        let app = self.router();

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        probe_task.abort();
        tracing::info!("Server shutdown complete");

        Ok(result?)
    }
}
