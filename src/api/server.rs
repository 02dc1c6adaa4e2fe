//! HTTP server for the stock records REST API

use crate::api::handlers;
use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Build the API router over shared state
pub fn router(state: Arc<AppState>) -> Router {
    // The frontend is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ================================================================
        // Health check
        // ================================================================
        .route("/health", get(handlers::health_check))
        .route("/", get(handlers::health_check))

        // ================================================================
        // Stock records
        // ================================================================
        .route("/stocks/api/stocks/", get(handlers::list_stocks))
        .route("/stocks/api/stocks/create/", post(handlers::create_stock))
        .route(
            "/stocks/api/stocks/:id/update/",
            put(handlers::replace_stock).patch(handlers::update_stock),
        )
        .route("/stocks/api/stocks/:id/delete/", delete(handlers::delete_stock))

        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// API server manager
pub struct ApiServer {
    state: Arc<AppState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ApiServer {
    /// Create a new server
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            shutdown_tx: None,
            task: None,
        }
    }

    /// Bind the configured address and start serving in the background
    ///
    /// Returns the bound address, which differs from the configured one
    /// when port 0 is used.
    pub async fn start(&mut self) -> Result<SocketAddr> {
        let host = self.state.config.server.host.clone();
        let port = self.state.config.server.port;

        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid address {}:{}: {}", host, port, e)))?;

        let app = router(self.state.clone());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        info!("Starting stock records API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let task = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("API server shutting down");
            });

            if let Err(e) = server.await {
                error!("API server error: {}", e);
            }
        });

        self.shutdown_tx = Some(shutdown_tx);
        self.task = Some(task);

        info!("Stock records API server started on {}", local_addr);
        info!("");
        info!("=== Endpoints ===");
        info!("  GET    http://{}/health", local_addr);
        info!("  GET    http://{}/stocks/api/stocks/", local_addr);
        info!("  POST   http://{}/stocks/api/stocks/create/", local_addr);
        info!("  PUT    http://{}/stocks/api/stocks/{{id}}/update/", local_addr);
        info!("  PATCH  http://{}/stocks/api/stocks/{{id}}/update/", local_addr);
        info!("  DELETE http://{}/stocks/api/stocks/{{id}}/delete/", local_addr);

        Ok(local_addr)
    }

    /// Signal the server to stop
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            info!("API server stop signal sent");
        }
    }

    /// Stop the server and wait for in-flight requests to finish
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("API server task failed: {}", e);
            }
        }
    }
}

impl Drop for ApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}
