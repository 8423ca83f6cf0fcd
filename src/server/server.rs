use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use super::{log_requests, state::*, ServerConfig};
use crate::audit_store::save_detached;
use crate::dispute;
use crate::metrics::{self, AggregatedTrackView};
use crate::risk::{AuditResult, RiskEngine, RiskError};
use crate::sustainability;

const MAX_REPORT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Track not found: {0}")]
    TrackNotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<RiskError> for ApiError {
    fn from(err: RiskError) -> Self {
        match err {
            RiskError::TrackNotFound(id) => ApiError::TrackNotFound(id),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::TrackNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string()).into_response()
            }
            ApiError::Internal(err) => {
                error!("Internal error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    };
    Json(stats)
}

/// All tracks with live overrides applied, in catalog order. Both provider
/// fetches for a track are joined before its view is built; tracks are
/// fetched concurrently.
async fn list_tracks(
    State(catalog): State<GuardedCatalog>,
    State(gateway): State<GuardedGateway>,
) -> Json<Vec<AggregatedTrackView>> {
    let tracks = catalog.list();
    let views = futures::future::join_all(tracks.iter().map(|track| {
        let gateway = gateway.clone();
        async move {
            let (streaming, analytics) = tokio::join!(
                gateway.fetch_streaming_data(&track.isrc),
                gateway.fetch_analytics(&track.isrc),
            );
            metrics::build_view(track, streaming, analytics)
        }
    }))
    .await;
    Json(views)
}

async fn audit_track(
    State(risk_engine): State<GuardedRiskEngine>,
    State(audit_store): State<GuardedAuditStore>,
    Path(id): Path<String>,
) -> Result<Json<AuditResult>, ApiError> {
    let audit = risk_engine.audit_track(&id)?;
    save_detached(audit_store, audit.clone());
    Ok(Json(audit))
}

async fn get_audit_history(
    State(catalog): State<GuardedCatalog>,
    State(audit_store): State<GuardedAuditStore>,
    Path(id): Path<String>,
) -> Result<Json<Vec<AuditResult>>, ApiError> {
    if catalog.get_by_id(&id).is_none() {
        return Err(ApiError::TrackNotFound(id));
    }
    let history = audit_store.track_history(&id)?;
    Ok(Json(history))
}

/// Re-runs the audit, then composes the dispute narrative. When the
/// streaming provider knows the track, its identity takes precedence over
/// the baseline record in the letter.
async fn generate_dispute(
    State(catalog): State<GuardedCatalog>,
    State(gateway): State<GuardedGateway>,
    State(audit_store): State<GuardedAuditStore>,
    Path(id): Path<String>,
) -> Result<Json<dispute::DisputeDraft>, ApiError> {
    let mut track = catalog
        .get_by_id(&id)
        .ok_or(ApiError::TrackNotFound(id))?;

    let audit = RiskEngine::evaluate(&track);
    save_detached(audit_store, audit.clone());

    if let Some(metadata) = gateway.fetch_track_metadata(&track.isrc).await {
        track.name = metadata.name;
        track.artist = metadata.artist;
    }

    Ok(Json(dispute::compose(&track, &audit)))
}

/// Accepts either a multipart upload with a `file` field or a raw CSV body.
async fn upload_sustainability_report(request: Request) -> Response {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("multipart/form-data"))
        .unwrap_or(false);

    let csv_text = if is_multipart {
        match read_multipart_report(request).await {
            Ok(text) => text,
            Err(response) => return response,
        }
    } else {
        match axum::body::to_bytes(request.into_body(), MAX_REPORT_BYTES).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                return (
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read report body: {}", err),
                )
                    .into_response()
            }
        }
    };

    match sustainability::parse_report(&csv_text) {
        Ok(rows) => Json(rows).into_response(),
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}

async fn read_multipart_report(request: Request) -> Result<String, Response> {
    let mut multipart = Multipart::from_request(request, &()).await.map_err(|err| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid multipart request: {}", err),
        )
            .into_response()
    })?;

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            return field.text().await.map_err(|err| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read uploaded file: {}", err),
                )
                    .into_response()
            });
        }
    }

    Err((
        StatusCode::BAD_REQUEST,
        "Missing 'file' field in multipart upload",
    )
        .into_response())
}

pub fn make_app(
    config: ServerConfig,
    catalog: GuardedCatalog,
    gateway: GuardedGateway,
    audit_store: GuardedAuditStore,
) -> Router {
    let state = ServerState {
        config,
        start_time: Instant::now(),
        risk_engine: Arc::new(RiskEngine::new(catalog.clone())),
        catalog,
        gateway,
        audit_store,
        hash: env!("GIT_HASH").to_string(),
    };

    let api_routes = Router::new()
        .route("/tracks", get(list_tracks))
        .route("/tracks/{id}/audit", post(audit_track))
        .route("/tracks/{id}/audits", get(get_audit_history))
        .route("/tracks/{id}/dispute", post(generate_dispute))
        .route("/sustainability/report", post(upload_sustainability_report));

    Router::new()
        .route("/", get(home))
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

pub async fn run_server(
    config: ServerConfig,
    catalog: GuardedCatalog,
    gateway: GuardedGateway,
    audit_store: GuardedAuditStore,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, catalog, gateway, audit_store);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Server running on port {}", port);

    Ok(axum::serve(listener, app).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit_store::NoOpAuditStore;
    use crate::catalog::InMemoryCatalog;
    use crate::providers::ProviderGateway;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt; // for `oneshot`

    fn test_app() -> Router {
        make_app(
            ServerConfig {
                requests_logging_level: super::super::RequestsLoggingLevel::None,
                ..ServerConfig::default()
            },
            Arc::new(InMemoryCatalog::demo()),
            Arc::new(ProviderGateway::disabled()),
            Arc::new(NoOpAuditStore),
        )
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn lists_tracks_in_catalog_order_with_growth() {
        let app = test_app();
        let response = app
            .oneshot(Request::get("/api/tracks").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let tracks = body.as_array().unwrap();
        assert_eq!(tracks.len(), 4);
        assert_eq!(tracks[0]["id"], "1");
        assert_eq!(tracks[1]["growth"], "125.0");
        assert_eq!(tracks[1]["isHighGrowth"], true);
    }

    #[tokio::test]
    async fn audit_of_suspicious_track_is_red() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::post("/api/tracks/2/audit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["riskLevel"], "Red");
        assert_eq!(body["findings"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn audit_of_unknown_track_is_not_found() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::post("/api/tracks/999/audit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn raw_csv_report_is_classified() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::post("/api/sustainability/report")
                    .body(Body::from("Date,Streams,Saves\n2026-01-01,1000,5\n"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body[0]["sustainabilityScore"], 0.5);
        assert_eq!(body[0]["isSuspicious"], true);
    }

    #[tokio::test]
    async fn unusable_report_is_rejected() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::post("/api/sustainability/report")
                    .body(Body::from("foo,bar\n1,2\n"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
