use std::path::Path;

use parseo_cloud::{CheckResult, GcloudClient};
use parseo_core::ParseoConfig;

/// Print the full environment report and fail if any row is `[NG]`.
pub async fn doctor() -> anyhow::Result<()> {
    let config = ParseoConfig::load(Path::new("."));
    let project_id = config
        .as_ref()
        // arch-lint: allow(no-silent-result-drop) reason="doctor must report diagnostics even when parseo.toml is missing or invalid"
        .ok()
        .and_then(|c| c.project.gcp_project_id.as_deref());

    let client = GcloudClient::new();
    let mut report = client.doctor(project_id).await;

    // The client leaves the config row to us; it has no idea where we looked.
    report.config_file = if Path::new("parseo.toml").exists() {
        CheckResult::ok("Found")
    } else {
        CheckResult::fail("Not found")
    };

    println!();
    println!("{report}");

    if !report.all_passed() {
        anyhow::bail!("environment checks failed; see the report above");
    }

    Ok(())
}
