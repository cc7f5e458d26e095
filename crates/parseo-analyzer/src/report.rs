//! Plaintext report rendering and the append-only report file.

use std::path::{Path, PathBuf};

use crate::analysis::SeoReport;

#[derive(Debug, thiserror::Error)]
#[error("failed to append report to {path}")]
pub struct ReportWriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Render one report as plaintext.
pub fn render(report: &SeoReport) -> String {
    let rule = "=".repeat(50);
    let mut out = format!(
        "\n{rule}\nSEO Analysis Report for {}\nGenerated on: {}\n{rule}\n\n",
        report.url,
        report.metadata.analyzed_at.to_rfc3339(),
    );

    out.push_str(&format!(
        "Keywords\n--------\n{}\n\n",
        report.keywords.join(", "),
    ));

    let headings: Vec<String> = report
        .content
        .heading_distribution
        .iter()
        .map(|(name, count)| format!("{name}={count}"))
        .collect();
    let tags = &report.content.content_tags;
    out.push_str(&format!(
        "Content Statistics\n------------------\n\
         readabilityScore: {:.2}\n\
         readabilityInterpretation: {}\n\
         wordCount: {}\n\
         headingDistribution: {}\n\
         contentTags: strong={} em={} blockquote={} images={}\n",
        report.content.readability_score,
        report.content.readability_interpretation,
        report.content.word_count,
        headings.join(" "),
        tags.strong,
        tags.em,
        tags.blockquote,
        tags.images,
    ));

    out.push_str(&format!(
        "\nTechnical Analysis\n-------------------\n\
         title: {}\n\
         metaDescription: {}\n\
         canonical: {}\n\
         mobileFriendly: {}\n\
         ssl: {}\n\
         structuredData: {}\n",
        opt(&report.technical.title),
        opt(&report.technical.meta_description),
        opt(&report.technical.canonical),
        report.technical.mobile_friendly,
        report.technical.ssl,
        report.technical.structured_data,
    ));

    out.push_str(&format!(
        "\nLink Analysis\n-------------\n\
         Internal Links: {}\n\
         External Links: {}\n",
        report.links.internal_count,
        report.links.external_count,
    ));

    out.push_str(&format!(
        "\nPerformance\n-----------\n\
         Total Resources: {}\n\
         Total Size: {} bytes\n",
        report.performance.total_resources,
        report.performance.total_size,
    ));

    out.push_str(&format!(
        "\nMetadata\n--------\n\
         Analysis Duration: {:.3} seconds\n\
         Analyzed At: {}\n",
        report.metadata.analysis_duration,
        report.metadata.analyzed_at.to_rfc3339(),
    ));

    out.push_str(&format!("\n{rule}\n"));
    out
}

/// Append a rendered report to the file, creating parent directories as
/// needed.
pub fn append_to(report: &SeoReport, path: &Path) -> Result<(), ReportWriteError> {
    let wrap = |source| ReportWriteError {
        path: path.to_owned(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }

    use std::io::Write as _;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(wrap)?;
    file.write_all(render(report).as_bytes()).map_err(wrap)?;
    Ok(())
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}
