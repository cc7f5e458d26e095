//! SEO analysis engine for Parseo.
//!
//! [`SeoAnalyzer`] fetches a page and distills it into a [`SeoReport`]:
//! keyword stems by frequency, readability, technical markers (title,
//! description, canonical, viewport, SSL, structured data), link split,
//! and resource weight. The `parseo-analyzer` binary serves the engine
//! over HTTP; `parseo-api` links it directly for the public endpoint.

pub mod analysis;
pub mod fetch;
pub mod html;
pub mod report;
pub mod service;
pub mod text;

pub use analysis::{
    AnalysisError, ContentStats, ContentTags, LinkStats, PerformanceStats, ReportMetadata,
    SeoAnalyzer, SeoReport, TechnicalStats, analyze_document,
};
pub use fetch::{FetchError, PageFetcher};
pub use html::Document;
