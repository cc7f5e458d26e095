//! Analyzer service: the SEO engine behind an HTTP endpoint.

use std::sync::Arc;

use parseo_analyzer::SeoAnalyzer;
use parseo_analyzer::service;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_loaded = dotenvy::dotenv().is_ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    tracing::debug!(dotenv = dotenv_loaded, "starting analyzer service");

    let port: u16 = std::env::var("PORT")
        // arch-lint: allow(no-silent-result-drop) reason="PORT is optional; Cloud Run injects it and local runs fall back to the default"
        .ok()
        // arch-lint: allow(no-silent-result-drop) reason="an unparsable PORT value falls back to the default"
        .and_then(|value| value.parse().ok())
        .unwrap_or(5000);

    let analyzer = Arc::new(SeoAnalyzer::new()?);
    let app = service::router(analyzer);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("analyzer listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
