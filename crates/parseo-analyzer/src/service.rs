//! HTTP surface of the analyzer service: `POST /analyze`, `GET /health`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::analysis::{AnalysisError, SeoAnalyzer, SeoReport};

pub fn router(analyzer: Arc<SeoAnalyzer>) -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(analyzer)
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    url: Option<String>,
}

async fn analyze(
    State(analyzer): State<Arc<SeoAnalyzer>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<SeoReport>, ServiceError> {
    let url = request
        .url
        .as_deref()
        .filter(|url| !url.is_empty())
        .ok_or(ServiceError::MissingUrl)?;

    let report = analyzer.analyze(url).await.map_err(|error| {
        tracing::error!(%url, %error, "analysis failed");
        ServiceError::Analysis(error)
    })?;
    Ok(Json(report))
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug)]
enum ServiceError {
    MissingUrl,
    Analysis(AnalysisError),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingUrl => (StatusCode::BAD_REQUEST, "No URL provided".to_owned()),
            Self::Analysis(error) => {
                let status = match &error {
                    AnalysisError::Fetch(_) => StatusCode::BAD_GATEWAY,
                    AnalysisError::InvalidUrl { .. } | AnalysisError::InsufficientContent { .. } => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                };
                (status, error.to_string())
            }
        };
        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(SeoAnalyzer::new().unwrap()))
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_url_is_a_bad_request() {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/analyze")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "No URL provided");
    }

    #[tokio::test]
    async fn empty_url_is_a_bad_request() {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/analyze")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from(r#"{"url": ""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
