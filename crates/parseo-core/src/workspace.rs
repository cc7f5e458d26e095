//! Workspace discovery via `cargo metadata`.
//!
//! Replaces manual `Cargo.toml` TOML parsing with the official metadata
//! protocol, correctly handling:
//!
//! - Workspace `version.workspace = true` inheritance
//! - Binary targets spread across workspace members
//! - Accurate manifest and directory paths

use cargo_metadata::{MetadataCommand, TargetKind};
use std::path::{Path, PathBuf};

/// A binary target in the workspace.
///
/// # Examples
///
/// ```
/// use parseo_core::CargoBinary;
/// use std::path::PathBuf;
///
/// let bin = CargoBinary {
///     name: "parseo-api".to_owned(),
///     package: "parseo-api".to_owned(),
///     src_path: PathBuf::from("src/main.rs"),
/// };
/// assert_eq!(bin.name, "parseo-api");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CargoBinary {
    /// Binary name (used with `cargo build --bin <name>`)
    pub name: String,
    /// Name of the package that owns the target
    pub package: String,
    /// Absolute path to the source file
    pub src_path: PathBuf,
}

/// Workspace metadata, discovered via `cargo metadata --no-deps`.
///
/// The deployable unit is the workspace, not a single package: the image
/// recipes build several binaries from it and the service catalog is
/// checked against the full binary set. All fields are resolved by Cargo
/// itself, so workspace-inherited versions and auto-discovered `src/bin`
/// targets come out right.
///
/// # Examples
///
/// ```no_run
/// use parseo_core::WorkspaceMeta;
/// use std::path::Path;
///
/// let meta = WorkspaceMeta::discover(Path::new(".")).unwrap();
/// println!("workspace at {}", meta.workspace_root.display());
/// for bin in &meta.binaries {
///     println!("  builds {}", bin.name);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct WorkspaceMeta {
    /// Absolute path to the workspace root directory
    pub workspace_root: PathBuf,
    /// All binary targets across workspace members
    pub binaries: Vec<CargoBinary>,
}

impl WorkspaceMeta {
    /// Discover the workspace containing the given directory.
    ///
    /// Runs `cargo metadata --no-deps` against the directory's manifest and
    /// collects every binary target of every workspace member.
    ///
    /// # Errors
    ///
    /// - [`Error::CargoMetadata`](crate::Error::CargoMetadata) if `cargo metadata`
    ///   fails (e.g. cargo not installed, no manifest)
    /// - [`Error::WorkspaceDirResolve`](crate::Error::WorkspaceDirResolve) if the
    ///   directory cannot be canonicalized
    pub fn discover(project_dir: &Path) -> crate::Result<Self> {
        let manifest_path = project_dir.join("Cargo.toml");
        tracing::debug!(path = %manifest_path.display(), "running cargo metadata");

        // Canonicalize early so the error names the directory the caller gave us
        project_dir
            .canonicalize()
            .map_err(|e| crate::Error::WorkspaceDirResolve {
                path: project_dir.to_path_buf(),
                source: e,
            })?;

        let metadata = MetadataCommand::new()
            .manifest_path(&manifest_path)
            .no_deps()
            .exec()
            .map_err(|e| crate::Error::CargoMetadata {
                manifest_path: manifest_path.clone(),
                detail: e.to_string(),
            })?;

        let workspace_root = PathBuf::from(metadata.workspace_root.as_std_path());

        let binaries: Vec<CargoBinary> = metadata
            .packages
            .iter()
            .filter(|p| metadata.workspace_members.contains(&p.id))
            .flat_map(|p| {
                p.targets
                    .iter()
                    .filter(|t| t.kind.contains(&TargetKind::Bin))
                    .map(|t| CargoBinary {
                        name: t.name.clone(),
                        package: p.name.clone(),
                        src_path: PathBuf::from(t.src_path.as_std_path()),
                    })
            })
            .collect();

        tracing::debug!(
            binaries = binaries.len(),
            workspace_root = %workspace_root.display(),
            "workspace discovered"
        );

        Ok(Self {
            workspace_root,
            binaries,
        })
    }

    /// Whether some workspace member builds a binary with this name.
    pub fn has_binary(&self, name: &str) -> bool {
        self.binaries.iter().any(|b| b.name == name)
    }
}
