//! Shared test utilities.

use std::sync::Arc;
use stock_records::api::ApiServer;
use stock_records::config::{AppConfig, ServerConfig};
use stock_records::db::SqliteDb;
use stock_records::AppState;

/// An API server on an ephemeral port backed by an in-memory database.
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub state: Arc<AppState>,
    _server: ApiServer,
}

impl TestServer {
    pub async fn start() -> Self {
        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            ..AppConfig::default()
        };
        let db = SqliteDb::open_in_memory().expect("failed to open in-memory database");
        let state = Arc::new(AppState::with_database(config, db));

        let mut server = ApiServer::new(state.clone());
        let addr = server.start().await.expect("failed to start API server");

        Self {
            base_url: format!("http://{}", addr),
            client: reqwest::Client::new(),
            state,
            _server: server,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
