use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

use super::AuditStore;
use crate::risk::{AuditResult, RiskLevel};

const SCHEMA_VERSION: i64 = 1;

const CREATE_AUDIT_LOG_TABLE: &str = "CREATE TABLE audit_log (
    id INTEGER PRIMARY KEY,
    track_id TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    risk_level TEXT NOT NULL,
    findings TEXT NOT NULL
)";

const CREATE_AUDIT_LOG_INDICES: [&str; 2] = [
    "CREATE INDEX idx_audit_log_track_id ON audit_log(track_id)",
    "CREATE INDEX idx_audit_log_timestamp ON audit_log(timestamp DESC)",
];

/// SQLite-backed audit log. One row per audit; findings stored as a JSON
/// array.
pub struct SqliteAuditStore {
    conn: Mutex<Connection>,
}

impl SqliteAuditStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let is_new_db = !path.exists();

        let conn = Connection::open(path).context("Failed to open audit database")?;

        if is_new_db {
            info!("Creating new audit database at {:?}", path);
            conn.execute(CREATE_AUDIT_LOG_TABLE, [])?;
            for index_sql in CREATE_AUDIT_LOG_INDICES {
                conn.execute(index_sql, [])?;
            }
            conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;
        } else {
            let db_version: i64 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
            if db_version != SCHEMA_VERSION {
                anyhow::bail!(
                    "Audit database version {} is not supported (expected {})",
                    db_version,
                    SCHEMA_VERSION
                );
            }
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn row_to_audit(row: &rusqlite::Row) -> rusqlite::Result<(AuditResult, String)> {
        let risk_level_str: String = row.get("risk_level")?;
        let findings_json: String = row.get("findings")?;
        Ok((
            AuditResult {
                track_id: row.get("track_id")?,
                timestamp: row.get("timestamp")?,
                risk_level: RiskLevel::parse(&risk_level_str).unwrap_or(RiskLevel::Low),
                findings: Vec::new(),
            },
            findings_json,
        ))
    }
}

impl AuditStore for SqliteAuditStore {
    fn save_audit(&self, audit: &AuditResult) -> Result<()> {
        let findings_json =
            serde_json::to_string(&audit.findings).context("Failed to encode findings")?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO audit_log (track_id, timestamp, risk_level, findings)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                audit.track_id,
                audit.timestamp,
                audit.risk_level.as_str(),
                findings_json,
            ],
        )
        .context("Failed to insert audit row")?;
        Ok(())
    }

    fn track_history(&self, track_id: &str) -> Result<Vec<AuditResult>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT track_id, timestamp, risk_level, findings
             FROM audit_log WHERE track_id = ?1 ORDER BY timestamp DESC",
        )?;

        let rows = stmt
            .query_map(params![track_id], Self::row_to_audit)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read audit history")?;

        rows.into_iter()
            .map(|(mut audit, findings_json)| {
                audit.findings = serde_json::from_str(&findings_json)
                    .context("Failed to decode stored findings")?;
                Ok(audit)
            })
            .collect()
    }
}
