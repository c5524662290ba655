//! HTTP server for the importer service.
//!
//! Provides endpoints for:
//! - `POST /api/imports/csv/parse` - Parse and geocode an upload for preview
//! - `POST /api/imports/csv/import` - Store previously parsed rows
//! - `POST /api/imports/csv` - Parse and store in one request
//! - `GET /status` - Active and recent imports
//! - `GET /health` - Health check
//! - `GET /metrics` - Prometheus metrics

use axum::{
    extract::{DefaultBodyLimit, Extension, Json, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use uuid::Uuid;

use csv_import::{ImportOutcome, ImportPipeline, ImportRun, ParseReport};
use foodmap_common::{ImportAction, ImportRow, TenantId};

use crate::error::ApiError;
use crate::tracker::{ImportStage, ImportTracker, StatusResponse};

/// Largest accepted CSV upload.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared state for the HTTP server.
pub struct ServerState {
    pub pipeline: ImportPipeline,
    pub tracker: ImportTracker,
    /// Set when a Prometheus recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl ServerState {
    pub fn new(pipeline: ImportPipeline) -> Self {
        Self {
            pipeline,
            tracker: ImportTracker::new(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Run the import stage and record it in the tracker.
    async fn tracked_import(
        &self,
        rows: &[ImportRow],
        action: ImportAction,
        tenant_id: TenantId,
    ) -> ImportOutcome {
        let id = Uuid::new_v4().to_string();
        info!(id = %id, tenant_id, action = %action, rows = rows.len(), "Import started");

        self.tracker
            .start(&id, tenant_id, action, ImportStage::Storing, rows.len())
            .await;
        self.store_tracked(&id, rows, action, tenant_id).await
    }

    /// Store rows for an import the tracker already knows about, then complete it.
    async fn store_tracked(
        &self,
        id: &str,
        rows: &[ImportRow],
        action: ImportAction,
        tenant_id: TenantId,
    ) -> ImportOutcome {
        let outcome = self.pipeline.import_csv(rows, action, tenant_id).await;
        self.tracker.complete(id, outcome.clone()).await;
        outcome
    }
}

/// Request body for `POST /api/imports/csv/import`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub rows: Vec<ImportRow>,
    #[serde(default)]
    pub action: ImportAction,
    pub tenant_id: TenantId,
}

/// Query string for `POST /api/imports/csv`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunParams {
    pub tenant_id: TenantId,
    #[serde(default)]
    pub action: ImportAction,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// POST /api/imports/csv/parse
async fn parse_handler(
    Extension(state): Extension<Arc<ServerState>>,
    body: Bytes,
) -> Result<Json<ParseReport>, ApiError> {
    let report = state.pipeline.parse_csv(&body).await?;
    Ok(Json(report))
}

/// POST /api/imports/csv/import
///
/// Storage failures are part of the returned outcome, so this always answers
/// 200 once the body is accepted.
async fn import_handler(
    Extension(state): Extension<Arc<ServerState>>,
    Json(request): Json<ImportRequest>,
) -> Json<ImportOutcome> {
    let outcome = state
        .tracked_import(&request.rows, request.action, request.tenant_id)
        .await;
    Json(outcome)
}

/// POST /api/imports/csv?tenantId=..&action=..
///
/// The import shows up under `/status` from the moment the upload is accepted.
/// Uploads that fail to parse are recorded as failed imports.
async fn run_handler(
    Extension(state): Extension<Arc<ServerState>>,
    Query(params): Query<RunParams>,
    body: Bytes,
) -> Result<Json<ImportRun>, ApiError> {
    let RunParams { tenant_id, action } = params;
    let id = Uuid::new_v4().to_string();
    info!(id = %id, tenant_id, action = %action, bytes = body.len(), "Import started");

    state
        .tracker
        .start(&id, tenant_id, action, ImportStage::Parsing, 0)
        .await;

    let report = match state.pipeline.parse_csv(&body).await {
        Ok(report) => report,
        Err(e) => {
            let reason = e.to_string();
            state.tracker.complete(&id, ImportOutcome::Failed { reason }).await;
            return Err(e.into());
        }
    };

    if report.aborted {
        let reason = format!(
            "parse aborted after {} row failure(s)",
            report.failures.len()
        );
        state.tracker.complete(&id, ImportOutcome::Failed { reason }).await;
        return Ok(Json(ImportRun {
            report,
            outcome: None,
        }));
    }

    state
        .tracker
        .advance(&id, ImportStage::Storing, report.rows.len())
        .await;
    let outcome = state
        .store_tracked(&id, &report.rows, action, tenant_id)
        .await;

    Ok(Json(ImportRun {
        report,
        outcome: Some(outcome),
    }))
}

/// GET /status
async fn status_handler(Extension(state): Extension<Arc<ServerState>>) -> Json<StatusResponse> {
    Json(state.tracker.get_status().await)
}

/// GET /health
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "importer".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /metrics
async fn metrics_handler(Extension(state): Extension<Arc<ServerState>>) -> impl IntoResponse {
    let body = state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .unwrap_or_default();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}

/// Build the HTTP router.
pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/imports/csv", post(run_handler))
        .route("/api/imports/csv/parse", post(parse_handler))
        .route("/api/imports/csv/import", post(import_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server.
pub async fn start_server(state: Arc<ServerState>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(address = %addr, "Starting importer HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
