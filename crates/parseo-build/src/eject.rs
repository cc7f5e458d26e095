use std::path::{Path, PathBuf};

use parseo_core::DeployTarget;

/// The four build artifacts eject writes under `.parseo/`.
pub const ARTIFACT_FILES: &[&str] = &[
    "Dockerfile.api",
    "Dockerfile.analyzer",
    "Dockerfile.stack",
    "cloudbuild.yaml",
];

/// Rendered build artifacts, ready to eject or audit.
#[derive(Debug, Clone)]
pub struct BuildArtifacts {
    pub dockerfile_api: String,
    pub dockerfile_analyzer: String,
    pub dockerfile_stack: String,
    pub cloudbuild: String,
}

impl BuildArtifacts {
    /// The recipe for a deploy target.
    pub fn dockerfile(&self, target: DeployTarget) -> &str {
        match target {
            DeployTarget::Api => &self.dockerfile_api,
            DeployTarget::Analyzer => &self.dockerfile_analyzer,
            DeployTarget::Stack => &self.dockerfile_stack,
        }
    }
}

/// Ejects build artifacts into the project directory.
///
/// After ejecting, `parseo deploy` and `parseo check` use the files under
/// `.parseo/` instead of rendering fresh ones.
pub fn eject(project_dir: &Path, artifacts: &BuildArtifacts) -> Result<(), EjectError> {
    let parseo_dir = project_dir.join(".parseo");
    std::fs::create_dir_all(&parseo_dir).map_err(|e| EjectError::CreateDir {
        path: parseo_dir.clone(),
        source: e,
    })?;

    for file in ARTIFACT_FILES {
        let path = parseo_dir.join(file);
        if path.exists() {
            return Err(EjectError::AlreadyEjected(path));
        }
    }

    for (file, content) in [
        ("Dockerfile.api", &artifacts.dockerfile_api),
        ("Dockerfile.analyzer", &artifacts.dockerfile_analyzer),
        ("Dockerfile.stack", &artifacts.dockerfile_stack),
        ("cloudbuild.yaml", &artifacts.cloudbuild),
    ] {
        let path = parseo_dir.join(file);
        std::fs::write(&path, content).map_err(|e| EjectError::Write { path, source: e })?;
    }

    Ok(())
}

/// Check if the project has ejected build artifacts.
pub fn is_ejected(project_dir: &Path) -> bool {
    ARTIFACT_FILES
        .iter()
        .any(|file| project_dir.join(".parseo").join(file).exists())
}

/// Load the ejected artifacts. Every file must be present; a partial
/// eject is reported against the first missing file.
pub fn load_ejected(project_dir: &Path) -> Result<BuildArtifacts, EjectError> {
    let read = |file: &str| -> Result<String, EjectError> {
        let path = project_dir.join(".parseo").join(file);
        std::fs::read_to_string(&path).map_err(|e| EjectError::Read { path, source: e })
    };

    Ok(BuildArtifacts {
        dockerfile_api: read("Dockerfile.api")?,
        dockerfile_analyzer: read("Dockerfile.analyzer")?,
        dockerfile_stack: read("Dockerfile.stack")?,
        cloudbuild: read("cloudbuild.yaml")?,
    })
}

/// Where an ejected artifact lives, for user-facing messages.
pub fn artifact_path(project_dir: &Path, file: &str) -> PathBuf {
    project_dir.join(".parseo").join(file)
}

#[derive(Debug, thiserror::Error)]
pub enum EjectError {
    #[error("failed to create .parseo directory at {path}")]
    CreateDir {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("build artifacts already ejected at {0}; edit directly or delete to re-eject")]
    AlreadyEjected(std::path::PathBuf),
    #[error("failed to write {path}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read ejected artifact at {path}")]
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}
