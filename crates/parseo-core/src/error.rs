use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Service catalog ──
    #[error("services '{left}' and '{right}' both listen on port {port}")]
    DuplicateServicePort {
        left: String,
        right: String,
        port: u16,
    },

    #[error("services '{left}' and '{right}' both run binary '{binary}'")]
    DuplicateServiceBinary {
        left: String,
        right: String,
        binary: String,
    },

    #[error(
        "service '{service}' wants binary '{binary}' but the workspace only builds: {}",
        format_names(available)
    )]
    MissingServiceBinary {
        service: String,
        binary: String,
        available: Vec<String>,
    },

    // ── Workspace discovery ──
    #[error("cargo metadata failed for {manifest_path}: {detail}")]
    CargoMetadata {
        manifest_path: PathBuf,
        detail: String,
    },

    #[error("failed to resolve workspace directory {path}")]
    WorkspaceDirResolve {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn format_names(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_owned()
    } else {
        names.join(", ")
    }
}
