use std::future::Future;

use parseo_analyzer::{AnalysisError, SeoAnalyzer, SeoReport};

/// Boundary between the HTTP surface and the analysis engine.
///
/// Handlers await the returned future inside axum, so it must be `Send`;
/// the explicit return type carries that bound.
pub trait UrlAnalyzer: Send + Sync {
    fn analyze(&self, url: &str) -> impl Future<Output = Result<SeoReport, AnalysisError>> + Send;
}

/// The in-process engine. The service binary always runs this one; tests
/// swap in stubs through [`UrlAnalyzer`].
pub struct EngineAnalyzer {
    engine: SeoAnalyzer,
}

impl EngineAnalyzer {
    pub fn new() -> Result<Self, AnalysisError> {
        Ok(Self {
            engine: SeoAnalyzer::new()?,
        })
    }
}

impl UrlAnalyzer for EngineAnalyzer {
    async fn analyze(&self, url: &str) -> Result<SeoReport, AnalysisError> {
        self.engine.analyze(url).await
    }
}
