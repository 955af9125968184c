//! HTTP server.
//!
//! Exposes the originality check as a JSON HTTP API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/stats` | Corpus sizes of both slices |
//! | `POST` | `/check` | Full report: scores, labels, trend, neighbors, suggestions |
//! | `POST` | `/score` | Scores, labels, and trend only |
//!
//! `/check` and `/score` accept `{ "title", "description"?, "tags"?, "k"? }`.
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "k must be between 1 and 50, got 0" } }
//! ```
//!
//! Error codes: `bad_request` (400), `embeddings_disabled` (400), `internal` (500).
//! Bodies that are not a valid request object are `bad_request` as well.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser-based
//! clients.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use originality_core::check::{CheckReport, CheckRequest, ScoreResponse, StatsResponse};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::engine::{CheckError, Engine};

/// Build the router over a shared engine.
pub fn build_router(engine: Arc<Engine>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/stats", get(handle_stats))
        .route("/check", post(handle_check))
        .route("/score", post(handle_score))
        .layer(cors)
        .with_state(engine)
}

/// Bind to `[server].bind` and serve until the process is terminated.
pub async fn run_server(engine: Arc<Engine>) -> anyhow::Result<()> {
    let bind_addr = engine.config().server.bind.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %listener.local_addr()?, "server listening");
    println!("Originality server listening on http://{}", bind_addr);

    axum::serve(listener, build_router(engine)).await?;
    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        bad_request(rejection.body_text())
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

impl From<CheckError> for AppError {
    fn from(err: CheckError) -> Self {
        match err {
            CheckError::InvalidK { .. } => bad_request(err.to_string()),
            CheckError::EmbeddingsDisabled => AppError {
                status: StatusCode::BAD_REQUEST,
                code: "embeddings_disabled".to_string(),
                message: err.to_string(),
            },
            CheckError::Internal(e) => {
                error!(error = %format!("{e:#}"), "check failed");
                AppError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "internal".to_string(),
                    message: format!("{e:#}"),
                }
            }
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /stats ============

async fn handle_stats(State(engine): State<Arc<Engine>>) -> Json<StatsResponse> {
    Json(engine.stats())
}

// ============ POST /check, POST /score ============

async fn handle_check(
    State(engine): State<Arc<Engine>>,
    body: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<CheckReport>, AppError> {
    let Json(req) = body?;
    let report = engine.check(&req).await?;
    Ok(Json(report))
}

async fn handle_score(
    State(engine): State<Arc<Engine>>,
    body: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<ScoreResponse>, AppError> {
    let Json(req) = body?;
    let report = engine.check(&req).await?;
    Ok(Json(ScoreResponse::from(report)))
}
