use std::path::PathBuf;

use parseo_build::eject::{ARTIFACT_FILES, artifact_path};
use parseo_build::render_artifacts;
use parseo_core::ParseoConfig;

pub async fn eject() -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let config = ParseoConfig::load(&project_dir)?;

    let artifacts = render_artifacts(&config)?;
    parseo_build::eject::eject(&project_dir, &artifacts)?;

    println!("Ejected build artifacts:");
    for file in ARTIFACT_FILES {
        println!("  {}", artifact_path(&project_dir, file).display());
    }
    println!();
    println!("Edit them directly. parseo deploy and parseo check use these files.");
    Ok(())
}
