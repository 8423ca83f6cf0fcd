//! Royalty Shield Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod audit_store;
pub mod catalog;
pub mod config;
pub mod dispute;
pub mod metrics;
pub mod providers;
pub mod risk;
pub mod server;
pub mod sustainability;

// Re-export commonly used types for convenience
pub use audit_store::{AuditStore, NoOpAuditStore, SqliteAuditStore};
pub use catalog::{InMemoryCatalog, Track, TrackCatalog};
pub use providers::ProviderGateway;
pub use risk::{AuditResult, RiskEngine, RiskLevel};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
