//! Full-page SEO analysis: fetch, scan, score, report.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::fetch::{FetchError, PageFetcher};
use crate::html::Document;
use crate::text;

/// Documents below this size carry nothing worth scoring.
const MIN_DOCUMENT_BYTES: usize = 100;

const KEYWORD_COUNT: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid url '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("document at {url} too small to analyze ({bytes} bytes)")]
    InsufficientContent { url: String, bytes: usize },
}

/// Complete analysis of one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoReport {
    pub url: String,
    /// Top stems by frequency, most frequent first.
    pub keywords: Vec<String>,
    pub content: ContentStats,
    pub technical: TechnicalStats,
    pub links: LinkStats,
    pub performance: PerformanceStats,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    pub readability_score: f64,
    pub readability_interpretation: String,
    pub word_count: usize,
    /// Tag counts for h1 through h6.
    pub heading_distribution: BTreeMap<String, usize>,
    pub content_tags: ContentTags,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentTags {
    pub strong: usize,
    pub em: usize,
    pub blockquote: usize,
    pub images: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalStats {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub canonical: Option<String>,
    pub mobile_friendly: bool,
    pub ssl: bool,
    pub structured_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    pub internal_count: usize,
    pub external_count: usize,
    pub total_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
    /// Referenced script, stylesheet/link, and image tags.
    pub total_resources: usize,
    /// Fetched document size in bytes.
    pub total_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub analyzed_at: DateTime<Utc>,
    /// Seconds from the start of the analysis, fetch included.
    pub analysis_duration: f64,
}

/// Fetches pages and turns them into [`SeoReport`]s.
#[derive(Debug, Clone)]
pub struct SeoAnalyzer {
    fetcher: PageFetcher,
}

impl SeoAnalyzer {
    pub fn new() -> Result<Self, AnalysisError> {
        Ok(Self {
            fetcher: PageFetcher::new()?,
        })
    }

    /// Fetch a page and analyze it.
    pub async fn analyze(&self, url: &str) -> Result<SeoReport, AnalysisError> {
        let started = Utc::now();
        tracing::info!(%url, "analyzing page");
        let body = self.fetcher.fetch(url).await?;
        let report = analyze_document(url, &body, started)?;
        tracing::info!(
            %url,
            words = report.content.word_count,
            duration = report.metadata.analysis_duration,
            "analysis complete"
        );
        Ok(report)
    }
}

/// Analyze an already-fetched document.
///
/// `started` marks when the whole analysis began, so time a caller spent
/// fetching counts toward the reported duration.
pub fn analyze_document(
    url: &str,
    html: &str,
    started: DateTime<Utc>,
) -> Result<SeoReport, AnalysisError> {
    if html.len() < MIN_DOCUMENT_BYTES {
        return Err(AnalysisError::InsufficientContent {
            url: url.to_owned(),
            bytes: html.len(),
        });
    }
    let base = Url::parse(url).map_err(|source| AnalysisError::InvalidUrl {
        url: url.to_owned(),
        source,
    })?;

    let doc = Document::parse(html);
    let words = text::normalize(doc.text());

    Ok(SeoReport {
        url: url.to_owned(),
        keywords: text::top_keywords(&words, KEYWORD_COUNT),
        content: content_stats(&doc),
        technical: technical_stats(&base, &doc),
        links: link_stats(&base, &doc),
        performance: PerformanceStats {
            total_resources: doc.count("script") + doc.count("link") + doc.count("img"),
            total_size: html.len(),
        },
        metadata: ReportMetadata {
            analyzed_at: started,
            analysis_duration: duration_secs(started, Utc::now()),
        },
    })
}

fn duration_secs(started: DateTime<Utc>, finished: DateTime<Utc>) -> f64 {
    (finished - started).num_milliseconds() as f64 / 1000.0
}

fn content_stats(doc: &Document) -> ContentStats {
    let text = doc.text();
    let (readability_score, readability_interpretation) = match text::flesch_reading_ease(text) {
        Some(score) => (score, interpret_readability(score).to_owned()),
        None => (0.0, "Unable to calculate".to_owned()),
    };

    let heading_distribution = (1..=6)
        .map(|level| {
            let name = format!("h{level}");
            let count = doc.count(&name);
            (name, count)
        })
        .collect();

    ContentStats {
        readability_score,
        readability_interpretation,
        word_count: text::count_words(text),
        heading_distribution,
        content_tags: ContentTags {
            strong: doc.count("strong"),
            em: doc.count("em"),
            blockquote: doc.count("blockquote"),
            images: doc.count("img"),
        },
    }
}

/// Reading-ease bands for the engine report.
fn interpret_readability(score: f64) -> &'static str {
    if score > 60.0 {
        "Good"
    } else if score > 40.0 {
        "Fair"
    } else {
        "Needs Improvement"
    }
}

fn technical_stats(base: &Url, doc: &Document) -> TechnicalStats {
    TechnicalStats {
        title: doc.title().map(str::to_owned),
        meta_description: doc.meta_content("description").map(str::to_owned),
        canonical: doc.canonical().map(str::to_owned),
        mobile_friendly: doc
            .tags("meta")
            .any(|tag| tag.attr("name").is_some_and(|n| n.eq_ignore_ascii_case("viewport"))),
        ssl: base.scheme() == "https",
        structured_data: doc.tags("script").any(|tag| {
            tag.attr("type")
                .is_some_and(|t| t.eq_ignore_ascii_case("application/ld+json"))
        }),
    }
}

/// Internal/external split by resolved authority; unresolvable hrefs are
/// skipped.
fn link_stats(base: &Url, doc: &Document) -> LinkStats {
    let mut internal = 0;
    let mut external = 0;
    for link in doc.tags("a") {
        let Some(href) = link.attr("href") else {
            continue;
        };
        let Ok(resolved) = base.join(href) else {
            continue;
        };
        if resolved.authority() == base.authority() {
            internal += 1;
        } else {
            external += 1;
        }
    }
    LinkStats {
        internal_count: internal,
        external_count: external,
        total_count: internal + external,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(html: &str) -> String {
        // Comment padding clears the size floor without adding content.
        format!("{html}<!-- {} -->", "x".repeat(MIN_DOCUMENT_BYTES))
    }

    #[test]
    fn tiny_documents_are_an_error() {
        let result = analyze_document("https://example.com", "<p>hi</p>", Utc::now());
        assert!(matches!(
            result,
            Err(AnalysisError::InsufficientContent { bytes: 9, .. })
        ));
    }

    #[test]
    fn invalid_base_url_is_an_error() {
        let html = padded("<p>some text</p>");
        let result = analyze_document("not a url", &html, Utc::now());
        assert!(matches!(result, Err(AnalysisError::InvalidUrl { .. })));
    }

    #[test]
    fn interpretation_bands() {
        assert_eq!(interpret_readability(80.0), "Good");
        assert_eq!(interpret_readability(60.0), "Fair");
        assert_eq!(interpret_readability(41.0), "Fair");
        assert_eq!(interpret_readability(40.0), "Needs Improvement");
        assert_eq!(interpret_readability(-12.0), "Needs Improvement");
    }

    #[test]
    fn ssl_follows_the_scheme() {
        let html = padded("<p>plain body text here</p>");
        let https = analyze_document("https://example.com", &html, Utc::now()).unwrap();
        assert!(https.technical.ssl);
        let http = analyze_document("http://example.com", &html, Utc::now()).unwrap();
        assert!(!http.technical.ssl);
    }

    #[test]
    fn empty_text_reports_unscorable_readability() {
        let html = padded("<img src=a.png>");
        let report = analyze_document("https://example.com", &html, Utc::now()).unwrap();
        assert_eq!(report.content.readability_score, 0.0);
        assert_eq!(report.content.readability_interpretation, "Unable to calculate");
        assert_eq!(report.content.word_count, 0);
    }

    #[test]
    fn report_serializes_camel_case() {
        let html = padded("<h1>Title</h1><p>body text</p>");
        let report = analyze_document("https://example.com", &html, Utc::now()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("keywords").is_some());
        assert!(json["content"].get("readabilityScore").is_some());
        assert!(json["content"].get("headingDistribution").is_some());
        assert!(json["technical"].get("mobileFriendly").is_some());
        assert!(json["links"].get("internalCount").is_some());
        assert!(json["performance"].get("totalResources").is_some());
        assert!(json["metadata"].get("analyzedAt").is_some());
        assert!(json["metadata"].get("analysisDuration").is_some());
    }
}
