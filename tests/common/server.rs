//! Test server lifecycle management
//!
//! Spawns a real server on a random port. Temp resources live until the
//! `TestServer` is dropped.

use royalty_shield::audit_store::SqliteAuditStore;
use royalty_shield::catalog::InMemoryCatalog;
use royalty_shield::providers::ProviderGateway;
use royalty_shield::server::{make_app, RequestsLoggingLevel, ServerConfig};
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    // Keep the audit database directory alive until drop
    _temp_db_dir: TempDir,
}

impl TestServer {
    /// Spawns a new test server on a random port with a fresh audit
    /// database.
    pub async fn spawn() -> Self {
        let temp_db_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let audit_store = Arc::new(
            SqliteAuditStore::new(temp_db_dir.path().join("audit.db"))
                .expect("Failed to create audit database"),
        );

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            ..ServerConfig::default()
        };
        let app = make_app(
            config,
            Arc::new(InMemoryCatalog::demo()),
            Arc::new(ProviderGateway::disabled()),
            audit_store,
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            port,
            _temp_db_dir: temp_db_dir,
        }
    }
}
