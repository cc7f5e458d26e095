use std::path::{Path, PathBuf};
use std::process::Command;

/// Files/directories that parseo always excludes from bundles,
/// regardless of .gitignore content.
const PARSEO_EXCLUDES: &[&str] = &[".parseo-bundle", ".parseo", ".git"];

/// Bundles project files for Cloud Build submission.
///
/// Uses `git ls-files` to respect `.gitignore`, then copies all tracked
/// and untracked-but-not-ignored files into `.parseo-bundle/`.
/// The image recipe and the pipeline config are written into the bundle,
/// so the submitted context is self-contained.
pub fn create_bundle(
    project_dir: &Path,
    dockerfile_content: &str,
    pipeline_content: &str,
) -> Result<PathBuf, BundleError> {
    let bundle_dir = project_dir.join(".parseo-bundle");

    // A bundle left over from an earlier deploy is replaced wholesale.
    if bundle_dir.exists() {
        std::fs::remove_dir_all(&bundle_dir).map_err(|e| BundleError::Cleanup {
            path: bundle_dir.clone(),
            source: e,
        })?;
    }
    std::fs::create_dir_all(&bundle_dir).map_err(|e| BundleError::Create {
        path: bundle_dir.clone(),
        source: e,
    })?;

    let mut copied = 0usize;
    for relative_path in git_ls_files(project_dir)? {
        // Never ship parseo's own state directories.
        if PARSEO_EXCLUDES
            .iter()
            .any(|ex| relative_path.starts_with(ex))
        {
            continue;
        }

        let src = project_dir.join(&relative_path);
        let dst = bundle_dir.join(&relative_path);

        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent).map_err(|e| BundleError::Create {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::copy(&src, &dst).map_err(|e| BundleError::CopyFile {
            path: src,
            source: e,
        })?;
        copied += 1;
    }
    tracing::debug!(files = copied, bundle = %bundle_dir.display(), "bundle assembled");

    let artifacts = [
        ("Dockerfile", dockerfile_content),
        ("cloudbuild.yaml", pipeline_content),
    ];
    for (name, content) in artifacts {
        let path = bundle_dir.join(name);
        std::fs::write(&path, content).map_err(|e| BundleError::WriteArtifact {
            path: path.clone(),
            source: e,
        })?;
    }

    Ok(bundle_dir)
}

/// Returns the list of files git considers part of the project:
/// tracked files + untracked files that are not .gitignored.
fn git_ls_files(project_dir: &Path) -> Result<Vec<PathBuf>, BundleError> {
    let stdout = run_git(
        project_dir,
        &["ls-files", "--cached", "--others", "--exclude-standard"],
    )?;
    Ok(String::from_utf8_lossy(&stdout)
        .lines()
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

/// Checks whether the git working tree has uncommitted changes.
pub fn is_dirty(project_dir: &Path) -> Result<bool, BundleError> {
    let stdout = run_git(project_dir, &["status", "--porcelain"])?;
    Ok(!stdout.is_empty())
}

/// The commit SHA of HEAD, used as the image tag substitution.
pub fn head_commit(project_dir: &Path) -> Result<String, BundleError> {
    let stdout = run_git(project_dir, &["rev-parse", "HEAD"])?;
    let sha = String::from_utf8_lossy(&stdout).trim().to_owned();
    if sha.is_empty() {
        return Err(BundleError::GitFailed {
            detail: "git rev-parse HEAD produced no output".to_owned(),
        });
    }
    Ok(sha)
}

/// Run one git subcommand in the project directory and hand back stdout.
fn run_git(project_dir: &Path, git_args: &[&str]) -> Result<Vec<u8>, BundleError> {
    let output = Command::new("git")
        .args(git_args)
        .current_dir(project_dir)
        .output()
        .map_err(|e| BundleError::GitCommand {
            detail: format!("failed to execute git {}", git_args.join(" ")),
            source: e,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BundleError::GitFailed {
            detail: format!(
                "git {} exited with {}: {}",
                git_args.join(" "),
                output.status,
                stderr.trim()
            ),
        });
    }

    Ok(output.stdout)
}

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("failed to clean up bundle directory {path}")]
    Cleanup {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create directory {path}")]
    Create {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to copy file {path}")]
    CopyFile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write bundle artifact at {path}")]
    WriteArtifact {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("git command failed: {detail}")]
    GitCommand {
        detail: String,
        source: std::io::Error,
    },
    #[error("git failed: {detail}")]
    GitFailed { detail: String },
}
