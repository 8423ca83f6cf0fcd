use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;
use crate::audit_store::AuditStore;
use crate::catalog::TrackCatalog;
use crate::providers::ProviderGateway;
use crate::risk::RiskEngine;

pub type GuardedCatalog = Arc<dyn TrackCatalog>;
pub type GuardedAuditStore = Arc<dyn AuditStore>;
pub type GuardedGateway = Arc<ProviderGateway>;
pub type GuardedRiskEngine = Arc<RiskEngine>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog: GuardedCatalog,
    pub gateway: GuardedGateway,
    pub risk_engine: GuardedRiskEngine,
    pub audit_store: GuardedAuditStore,
    pub hash: String,
}

impl FromRef<ServerState> for GuardedCatalog {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog.clone()
    }
}

impl FromRef<ServerState> for GuardedGateway {
    fn from_ref(input: &ServerState) -> Self {
        input.gateway.clone()
    }
}

impl FromRef<ServerState> for GuardedRiskEngine {
    fn from_ref(input: &ServerState) -> Self {
        input.risk_engine.clone()
    }
}

impl FromRef<ServerState> for GuardedAuditStore {
    fn from_ref(input: &ServerState) -> Self {
        input.audit_store.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
