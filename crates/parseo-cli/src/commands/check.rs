use std::path::PathBuf;

use parseo_build::{DockerfileFacts, DockerfileGenerator, PipelineSpec, eject, render_artifacts};
use parseo_core::{DeployTarget, ParseoConfig, WorkspaceMeta};

/// Audit the build artifacts against the config and the workspace.
///
/// Audits ejected files when present, freshly rendered artifacts otherwise,
/// so a clean run means the files Cloud Build will see match the catalog.
pub async fn check() -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let config = ParseoConfig::load(&project_dir)?;

    // Catalog ↔ workspace: every configured binary must be buildable
    let meta = WorkspaceMeta::discover(&project_dir)?;
    config.services.ensure_buildable(&meta)?;
    println!("[OK] service catalog: all binaries buildable");

    let artifacts = if eject::is_ejected(&project_dir) {
        println!("Auditing ejected artifacts under .parseo/");
        eject::load_ejected(&project_dir)?
    } else {
        println!("Auditing freshly rendered artifacts");
        render_artifacts(&config)?
    };

    let generator = DockerfileGenerator::new(&config.build, &config.services);
    let mut failures = 0;

    for target in [DeployTarget::Api, DeployTarget::Analyzer, DeployTarget::Stack] {
        let facts = DockerfileFacts::parse(artifacts.dockerfile(target));
        let issues = facts.audit(generator.entry_binary(target), generator.port(target));
        report(&format!("Dockerfile.{target}"), &issues, &mut failures);
    }

    match PipelineSpec::from_yaml(&artifacts.cloudbuild) {
        Ok(spec) => {
            let issues = spec.audit(&config);
            report("cloudbuild.yaml", &issues, &mut failures);
        }
        Err(error) => {
            println!("[NG] cloudbuild.yaml");
            println!("     - {error}");
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} artifact issue(s) found");
    }
    println!();
    println!("All artifact checks passed.");
    Ok(())
}

fn report<I: std::fmt::Display>(label: &str, issues: &[I], failures: &mut usize) {
    if issues.is_empty() {
        println!("[OK] {label}");
    } else {
        println!("[NG] {label}");
        for issue in issues {
            println!("     - {issue}");
        }
        *failures += issues.len();
    }
}
