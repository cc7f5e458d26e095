use std::io::Write;
use std::path::PathBuf;

use parseo_build::bundle;
use parseo_cloud::GcloudClient;
use parseo_core::ParseoConfig;

/// Delete the Cloud Run service, the commit-tagged image, and the local bundle.
pub async fn destroy(skip_confirm: bool) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let client = GcloudClient::new();

    let config = ParseoConfig::load(&project_dir)?;
    let gcp_project_id = super::require_project_id(&config)?;

    let service_name = &config.project.service;
    let region = &config.project.region;

    if !skip_confirm {
        println!("This will delete:");
        println!("  - Cloud Run service '{service_name}' in {region}");
        println!("  - The container image tagged with the current HEAD commit");
        println!("  - Local .parseo-bundle/");
        println!();
        print!("Are you sure? [y/N] ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !matches!(input.trim(), "y" | "Y" | "yes" | "YES") {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 1. Delete Cloud Run service
    println!("Deleting Cloud Run service '{service_name}'...");
    match client
        .delete_service(service_name, gcp_project_id, region)
        .await
    {
        Ok(()) => println!("  Deleted."),
        Err(e) => println!("  Skipped ({e})"),
    }

    // 2. Delete the image this checkout shipped
    println!("Deleting container image...");
    match bundle::head_commit(&project_dir) {
        Ok(sha) => {
            let image_tag = format!("{image}:{sha}", image = config.pipeline.image);
            match client.delete_image(&image_tag).await {
                Ok(()) => println!("  Deleted {image_tag}"),
                Err(e) => println!("  Skipped ({e})"),
            }
        }
        Err(e) => println!("  Skipped ({e})"),
    }

    // 3. Clean local bundle
    let bundle_dir = project_dir.join(".parseo-bundle");
    if bundle_dir.exists() {
        std::fs::remove_dir_all(&bundle_dir)?;
        println!("Removed local .parseo-bundle/");
    }

    println!();
    println!("Destroy complete.");
    Ok(())
}
