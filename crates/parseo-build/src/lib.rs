//! Image recipes, pipeline config, source bundling, and eject for parseo.
//!
//! # Deploy pipeline
//!
//! ```text
//! parseo deploy
//!   1. Dirty check  ── git status --porcelain (skip with --allow-dirty)
//!   2. Artifacts    ── DockerfileGenerator::render() + cloudbuild::render()
//!                      (or the ejected files under .parseo/)
//!   3. Bundle       ── git ls-files → .parseo-bundle/
//!   4. Cloud Build  ── gcloud builds submit --config …/cloudbuild.yaml
//!                      --substitutions COMMIT_SHA=$(git rev-parse HEAD)
//!   5. Cloud Run    ── deployed by the pipeline's third step
//! ```
//!
//! # Bundle strategy
//!
//! The bundle mirrors the git repository state:
//! - All tracked and untracked (non-ignored) files via `git ls-files`
//! - `.gitignore`d paths are excluded automatically
//! - `.parseo-bundle/`, `.parseo/`, `.git/` are always excluded
//!
//! # Auditing
//!
//! `parseo check` parses the artifacts back ([`DockerfileFacts`],
//! [`PipelineSpec`]) and verifies the recipe/pipeline contract: one EXPOSE
//! per recipe matching the catalog port, the catalog binary as the default
//! command, three pipeline steps in build → push → deploy order, one
//! commit-tagged image reference throughout, and the exact timeout bound.

pub mod bundle;
pub mod cloudbuild;
pub mod dockerfile;
pub mod eject;

pub use cloudbuild::{PipelineIssue, PipelineSpec};
pub use dockerfile::{DockerfileFacts, DockerfileGenerator, DockerfileIssue, SUPERVISOR_BINARY};
pub use eject::BuildArtifacts;

use parseo_core::{DeployTarget, ParseoConfig};

/// Render the full artifact set for a config.
pub fn render_artifacts(config: &ParseoConfig) -> Result<BuildArtifacts, cloudbuild::PipelineError> {
    let generator = DockerfileGenerator::new(&config.build, &config.services);
    Ok(BuildArtifacts {
        dockerfile_api: generator.render(DeployTarget::Api),
        dockerfile_analyzer: generator.render(DeployTarget::Analyzer),
        dockerfile_stack: generator.render(DeployTarget::Stack),
        cloudbuild: cloudbuild::render(config).to_yaml()?,
    })
}
