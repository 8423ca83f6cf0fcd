//! Audit log persistence.
//!
//! The audit sink is best-effort by contract: the HTTP response path never
//! waits on it and never fails because of it.

mod sqlite_audit_store;

pub use sqlite_audit_store::SqliteAuditStore;

use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

use crate::risk::AuditResult;

pub trait AuditStore: Send + Sync {
    fn save_audit(&self, audit: &AuditResult) -> Result<()>;

    /// Persisted audits for one track, newest first.
    fn track_history(&self, track_id: &str) -> Result<Vec<AuditResult>>;
}

/// Sink used when no audit database is configured. Accepts writes, keeps
/// nothing.
pub struct NoOpAuditStore;

impl AuditStore for NoOpAuditStore {
    fn save_audit(&self, _audit: &AuditResult) -> Result<()> {
        Ok(())
    }

    fn track_history(&self, _track_id: &str) -> Result<Vec<AuditResult>> {
        Ok(Vec::new())
    }
}

/// Persist an audit without blocking the caller. Write errors are logged and
/// swallowed; the spawned task is never awaited by the response path.
pub fn save_detached(store: Arc<dyn AuditStore>, audit: AuditResult) {
    tokio::task::spawn_blocking(move || {
        if let Err(err) = store.save_audit(&audit) {
            warn!(
                "Failed to persist audit for track {}: {:#}",
                audit.track_id, err
            );
        }
    });
}
