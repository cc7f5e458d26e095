mod check;
mod deploy;
mod destroy;
mod doctor;
mod eject;
mod init;
mod logs;
mod status;

pub use check::check;
pub use deploy::deploy;
pub use destroy::destroy;
pub use doctor::doctor;
pub use eject::eject;
pub use init::init_project;
pub use logs::logs;
pub use status::status;

/// The GCP project id, which cloud commands cannot default.
pub(crate) fn require_project_id(config: &parseo_core::ParseoConfig) -> anyhow::Result<&str> {
    config.project.gcp_project_id.as_deref().ok_or_else(|| {
        anyhow::anyhow!("gcp_project_id not set in parseo.toml; set [project].gcp_project_id")
    })
}
