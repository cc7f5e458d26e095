use std::path::PathBuf;

use parseo_cloud::GcloudClient;
use parseo_core::ParseoConfig;

pub async fn status() -> anyhow::Result<()> {
    let config = ParseoConfig::load(&PathBuf::from("."))?;
    let project_id = super::require_project_id(&config)?;

    let client = GcloudClient::new();
    let output = client
        .describe_service(
            &config.project.service,
            project_id,
            &config.project.region,
        )
        .await?;

    println!("{output}");
    Ok(())
}
