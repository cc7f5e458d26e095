//! HTTP surface of the public service: `POST /analyze`, `GET /health`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::analyzer::UrlAnalyzer;
use crate::response::AnalysisResponse;

/// Shared handler state: the engine behind the [`UrlAnalyzer`] seam.
pub struct AppState<A> {
    pub analyzer: A,
}

pub fn router<A: UrlAnalyzer + 'static>(state: Arc<AppState<A>>) -> Router {
    Router::new()
        .route("/analyze", post(analyze::<A>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub url: Option<String>,
}

async fn analyze<A: UrlAnalyzer>(
    State(state): State<Arc<AppState<A>>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let started = Utc::now();
    let url = request
        .url
        .filter(|url| !url.is_empty())
        .ok_or(ApiError::MissingUrl { started })?;

    let report = state.analyzer.analyze(&url).await.map_err(|error| {
        tracing::error!(%url, %error, "analysis failed");
        ApiError::AnalysisFailed { started }
    })?;

    let duration = (Utc::now() - started).num_milliseconds() as f64 / 1000.0;
    Ok(Json(AnalysisResponse::from_report(&report, started, duration)))
}

async fn health() -> &'static str {
    "ok"
}

/// Failure wire shape: an `error` message plus request metadata with a
/// zero duration. The messages are part of the public contract.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No URL provided")]
    MissingUrl { started: DateTime<Utc> },

    #[error("Failed to analyze URL")]
    AnalysisFailed { started: DateTime<Utc> },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, started) = match &self {
            ApiError::MissingUrl { started } => (StatusCode::BAD_REQUEST, *started),
            ApiError::AnalysisFailed { started } => (StatusCode::INTERNAL_SERVER_ERROR, *started),
        };
        let body = serde_json::json!({
            "error": self.to_string(),
            "metadata": {
                "analyzedAt": started,
                "analysisDuration": 0,
            },
        });
        (status, Json(body)).into_response()
    }
}
