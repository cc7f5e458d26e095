use chrono::{DateTime, Utc};
use parseo_analyzer::SeoReport;
use serde::Serialize;

/// Wire shape of a successful `POST /analyze`.
///
/// The camelCase keys are the public contract; existing clients bind to
/// them directly.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub keywords: Vec<String>,
    pub content: ContentSection,
    pub technical: TechnicalSection,
    pub links: LinksSection,
    pub performance: PerformanceSection,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSection {
    pub readability_score: f64,
    pub readability_interpretation: String,
    pub word_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSection {
    pub mobile_friendly: bool,
    pub ssl: bool,
    pub structured_data: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinksSection {
    pub internal_count: usize,
    pub external_count: usize,
    pub total_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSection {
    pub total_resources: usize,
    pub total_size: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub analyzed_at: DateTime<Utc>,
    pub analysis_duration: f64,
}

impl AnalysisResponse {
    /// Project the engine report onto the public shape.
    ///
    /// Readability is re-banded on the five-level public scale; the
    /// engine's own three-level interpretation stays internal. `started`
    /// and `duration` are measured at the HTTP layer, not in the engine.
    pub fn from_report(report: &SeoReport, started: DateTime<Utc>, duration: f64) -> Self {
        Self {
            keywords: report.keywords.clone(),
            content: ContentSection {
                readability_score: report.content.readability_score,
                readability_interpretation: interpret_readability(report.content.readability_score)
                    .to_owned(),
                word_count: report.content.word_count,
            },
            technical: TechnicalSection {
                mobile_friendly: report.technical.mobile_friendly,
                ssl: report.technical.ssl,
                structured_data: report.technical.structured_data,
            },
            links: LinksSection {
                internal_count: report.links.internal_count,
                external_count: report.links.external_count,
                total_count: report.links.total_count,
            },
            performance: PerformanceSection {
                total_resources: report.performance.total_resources,
                total_size: report.performance.total_size,
            },
            metadata: ResponseMetadata {
                analyzed_at: started,
                analysis_duration: duration,
            },
        }
    }
}

/// Five-level Flesch reading-ease banding used on the public surface.
pub fn interpret_readability(score: f64) -> &'static str {
    if score > 80.0 {
        "Very Easy"
    } else if score > 60.0 {
        "Easy"
    } else if score > 40.0 {
        "Moderate"
    } else if score > 20.0 {
        "Difficult"
    } else {
        "Very Difficult"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use parseo_analyzer::{
        ContentStats, ContentTags, LinkStats, PerformanceStats, ReportMetadata, TechnicalStats,
    };

    fn engine_report() -> SeoReport {
        SeoReport {
            url: "https://example.com".to_owned(),
            keywords: vec!["coffe".to_owned(), "brew".to_owned()],
            content: ContentStats {
                readability_score: 72.5,
                readability_interpretation: "Good".to_owned(),
                word_count: 120,
                heading_distribution: BTreeMap::new(),
                content_tags: ContentTags {
                    strong: 1,
                    em: 0,
                    blockquote: 0,
                    images: 2,
                },
            },
            technical: TechnicalStats {
                title: Some("Example".to_owned()),
                meta_description: None,
                canonical: None,
                mobile_friendly: true,
                ssl: true,
                structured_data: false,
            },
            links: LinkStats {
                internal_count: 3,
                external_count: 2,
                total_count: 5,
            },
            performance: PerformanceStats {
                total_resources: 6,
                total_size: 2048,
            },
            metadata: ReportMetadata {
                analyzed_at: Utc::now(),
                analysis_duration: 0.25,
            },
        }
    }

    #[test]
    fn five_band_scale_boundaries() {
        assert_eq!(interpret_readability(80.1), "Very Easy");
        assert_eq!(interpret_readability(80.0), "Easy");
        assert_eq!(interpret_readability(60.0), "Moderate");
        assert_eq!(interpret_readability(40.0), "Difficult");
        assert_eq!(interpret_readability(20.0), "Very Difficult");
        assert_eq!(interpret_readability(-12.0), "Very Difficult");
    }

    #[test]
    fn readability_is_rebanded_for_clients() {
        let response = AnalysisResponse::from_report(&engine_report(), Utc::now(), 0.5);
        // 72.5 reads "Good" internally but "Easy" on the public scale.
        assert_eq!(response.content.readability_interpretation, "Easy");
        assert_eq!(response.content.readability_score, 72.5);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let started = Utc::now();
        let response = AnalysisResponse::from_report(&engine_report(), started, 0.5);
        let json = serde_json::to_value(&response).unwrap();

        assert!(json["content"].get("readabilityScore").is_some());
        assert!(json["content"].get("wordCount").is_some());
        assert!(json["technical"].get("mobileFriendly").is_some());
        assert!(json["technical"].get("structuredData").is_some());
        assert!(json["links"].get("internalCount").is_some());
        assert!(json["performance"].get("totalResources").is_some());
        assert_eq!(json["metadata"]["analysisDuration"], 0.5);
    }
}
