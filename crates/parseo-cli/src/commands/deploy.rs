use std::path::PathBuf;

use parseo_build::{bundle, eject, render_artifacts};
use parseo_cloud::GcloudClient;
use parseo_core::{ParseoConfig, WorkspaceMeta};

/// Execute the full deploy pipeline.
///
/// The workstation side stops at `gcloud builds submit`; the pipeline's
/// third step performs the Cloud Run deploy inside Cloud Build.
pub async fn deploy(allow_dirty: bool) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let client = GcloudClient::new();

    // Dirty check: refuse to deploy uncommitted changes unless --allow-dirty
    if !allow_dirty && bundle::is_dirty(&project_dir)? {
        anyhow::bail!(
            "uncommitted changes detected.\n\
             Commit your changes, or use `parseo deploy --allow-dirty` to deploy anyway."
        );
    }

    let config = ParseoConfig::load(&project_dir)?;
    let gcp_project_id = super::require_project_id(&config)?;

    // Catalog ↔ workspace check before anything leaves the machine
    let meta = WorkspaceMeta::discover(&project_dir)?;
    config.services.ensure_buildable(&meta)?;

    // Pre-flight checks
    println!("Running pre-flight checks...");
    let report = client.check_prerequisites(gcp_project_id).await?;

    if report.has_warnings() {
        println!("Warning: the following APIs are not enabled:");
        for api in &report.disabled_apis {
            println!("  - {api}");
        }
        println!("Enable them with: gcloud services enable <api> --project {gcp_project_id}");
        anyhow::bail!("required APIs not enabled");
    }

    // Build artifacts: ejected files win over fresh renders
    let artifacts = if eject::is_ejected(&project_dir) {
        println!("Using ejected artifacts from .parseo/");
        eject::load_ejected(&project_dir)?
    } else {
        render_artifacts(&config)?
    };
    let dockerfile = artifacts.dockerfile(config.pipeline.target);

    // Bundle source
    println!("Bundling source...");
    let bundle_dir = bundle::create_bundle(&project_dir, dockerfile, &artifacts.cloudbuild)?;
    let commit_sha = bundle::head_commit(&project_dir)?;
    tracing::debug!(%commit_sha, bundle = %bundle_dir.display(), "submitting bundle");

    println!("Submitting build to Cloud Build (target: {})...", config.pipeline.target);
    client
        .submit_build(&bundle_dir, gcp_project_id, &commit_sha)
        .await?;

    println!("Reading deployed service status...");
    let status = client
        .describe_service(
            &config.project.service,
            gcp_project_id,
            &config.project.region,
        )
        .await?;

    println!();
    println!("{status}");
    Ok(())
}
