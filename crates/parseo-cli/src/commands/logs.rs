use std::path::PathBuf;

use parseo_cloud::GcloudClient;
use parseo_core::ParseoConfig;

pub async fn logs(tail: u32) -> anyhow::Result<()> {
    let config = ParseoConfig::load(&PathBuf::from("."))?;
    let project_id = super::require_project_id(&config)?;

    let client = GcloudClient::new();
    client
        .read_logs(
            &config.project.service,
            project_id,
            &config.project.region,
            tail,
        )
        .await?;

    Ok(())
}
