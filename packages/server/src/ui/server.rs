//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::usecase::{
    ConnectSessionUseCase, DisconnectSessionUseCase, GetOnlineUsersUseCase,
    RegisterIdentityUseCase, RelayMessageUseCase,
};

use super::{
    handler::{get_online_users, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat server
///
/// This struct encapsulates the server configuration and provides methods to
/// run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_session_usecase,
///     register_identity_usecase,
///     relay_message_usecase,
///     disconnect_session_usecase,
///     get_online_users_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// ConnectSessionUseCase（コネクション受付のユースケース）
    connect_session_usecase: Arc<ConnectSessionUseCase>,
    /// RegisterIdentityUseCase（identity claim のユースケース）
    register_identity_usecase: Arc<RegisterIdentityUseCase>,
    /// RelayMessageUseCase（メッセージ中継のユースケース）
    relay_message_usecase: Arc<RelayMessageUseCase>,
    /// DisconnectSessionUseCase（コネクション切断のユースケース）
    disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// GetOnlineUsersUseCase（プレゼンス取得のユースケース）
    get_online_users_usecase: Arc<GetOnlineUsersUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        connect_session_usecase: Arc<ConnectSessionUseCase>,
        register_identity_usecase: Arc<RegisterIdentityUseCase>,
        relay_message_usecase: Arc<RelayMessageUseCase>,
        disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
        get_online_users_usecase: Arc<GetOnlineUsersUseCase>,
    ) -> Self {
        Self {
            connect_session_usecase,
            register_identity_usecase,
            relay_message_usecase,
            disconnect_session_usecase,
            get_online_users_usecase,
        }
    }

    /// Run the WebSocket chat server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            connect_session_usecase: self.connect_session_usecase,
            register_identity_usecase: self.register_identity_usecase,
            relay_message_usecase: self.relay_message_usecase,
            disconnect_session_usecase: self.disconnect_session_usecase,
            get_online_users_usecase: self.get_online_users_usecase,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/online-users", get(get_online_users))
            .route("/api/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "WebSocket chat server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
