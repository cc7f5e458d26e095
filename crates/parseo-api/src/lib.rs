//! Public JSON API in front of the analysis engine.
//!
//! Serves the original service contract on port 8080: `POST /analyze`
//! takes a URL and answers with the camelCase analysis payload, failures
//! carry an `error` message and zeroed timing metadata.

pub mod analyzer;
pub mod response;
pub mod routes;

pub use analyzer::{EngineAnalyzer, UrlAnalyzer};
pub use response::{AnalysisResponse, interpret_readability};
pub use routes::{ApiError, AppState, router};
