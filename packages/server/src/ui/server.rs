//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::{CredentialPolicy, ServerConfig},
    domain::{ConnectionRegistry, CredentialStore, HistoryStore, TokenService},
    infrastructure::{
        auth::{AcceptAnyCredentials, FirstUseCredentialStore, JwtTokenService},
        history::InMemoryHistoryStore,
        registry::InMemoryConnectionRegistry,
    },
    usecase::{
        AdmitSessionUseCase, BroadcastDispatcher, DisconnectSessionUseCase, LoginUseCase,
        MessageSequencer, SendMessageUseCase,
    },
};

use super::{
    handler::{
        http::{debug_history, health_check, login, stats},
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Broadcast relay server
///
/// Owns the shared state and the single broadcast dispatcher.
///
/// # Example
///
/// ```ignore
/// let server = Server::from_config(&ServerConfig::default());
/// server.run().await?;
/// ```
pub struct Server {
    bind_addr: String,
    state: Arc<AppState>,
    dispatcher: BroadcastDispatcher,
}

impl Server {
    /// Compose every dependency from the configuration
    ///
    /// Order: stores, token service, sequencer + dispatcher, usecases, state.
    pub fn from_config(config: &ServerConfig) -> Self {
        // 1. Stores
        let registry: Arc<dyn ConnectionRegistry> = Arc::new(InMemoryConnectionRegistry::new());
        let history: Arc<dyn HistoryStore> =
            Arc::new(InMemoryHistoryStore::new(config.history_capacity));
        let credentials: Arc<dyn CredentialStore> = match config.credential_policy {
            CredentialPolicy::AcceptAny => Arc::new(AcceptAnyCredentials),
            CredentialPolicy::FirstUse => Arc::new(FirstUseCredentialStore::new()),
        };

        // 2. Token service
        let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(
            config.jwt_secret.as_bytes(),
            config.token_ttl_seconds,
        ));

        // 3. Sequencer and the dispatcher reading its queue
        let (sequencer, queue) = MessageSequencer::new(history.clone(), registry.clone());
        let sequencer = Arc::new(sequencer);
        let dispatcher = BroadcastDispatcher::new(registry.clone(), queue);

        // 4. UseCases
        let state = Arc::new(AppState {
            login_usecase: Arc::new(LoginUseCase::new(token_service.clone(), credentials)),
            admit_session_usecase: Arc::new(AdmitSessionUseCase::new(
                token_service,
                sequencer.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(sequencer)),
            disconnect_session_usecase: Arc::new(DisconnectSessionUseCase::new(registry.clone())),
            registry,
            history,
            token_ttl_seconds: config.token_ttl_seconds,
        });

        Self {
            bind_addr: config.bind_addr(),
            state,
            dispatcher,
        }
    }

    /// Run the server on the configured address until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        self.serve(listener).await?;
        Ok(())
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let Self {
            state, dispatcher, ..
        } = self;

        tokio::spawn(dispatcher.run());

        let local_addr = listener.local_addr()?;
        tracing::info!("Hiroba server listening on {}", local_addr);
        tracing::info!("Log in with: POST http://{}/login", local_addr);
        tracing::info!("Connect to: ws://{}/ws", local_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/login", post(login))
        .route("/api/health", get(health_check))
        .route("/api/stats", get(stats))
        .route("/debug/history", get(debug_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
