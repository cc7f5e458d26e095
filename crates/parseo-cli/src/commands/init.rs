use std::path::Path;

/// Initialize parseo in an existing Rust workspace.
pub async fn init_project() -> anyhow::Result<()> {
    // Must be inside a Cargo project
    if !Path::new("Cargo.toml").exists() {
        anyhow::bail!("Cargo.toml not found. Run this command from a Rust project root.");
    }

    let parseo_toml_path = Path::new("parseo.toml");
    if parseo_toml_path.exists() {
        println!("parseo.toml already exists; nothing to create.");
    } else {
        let parseo_toml = r#"[project]
# service = "seo-analysis-api"
# region = "us-central1"
# gcp_project_id = "your-project-id"

[services.api]
# binary = "parseo-api"
# port = 8080

[services.analyzer]
# binary = "parseo-analyzer"
# port = 5000

[build]
# extra_packages = []

[pipeline]
# image = "gcr.io/parseopy/parseo-app/parseo-seo"
# target = "api"          # api | analyzer | stack
# timeout_secs = 1800

[cloud_run]
# memory = "512Mi"
# cpu = 1
# max_instances = 10
"#;
        std::fs::write(parseo_toml_path, parseo_toml)?;
        println!("Created parseo.toml");
    }

    println!();
    println!("Next steps:");
    println!();
    println!("  1. Set your GCP project:");
    println!("     edit parseo.toml → [project].gcp_project_id");
    println!();
    println!("  2. Audit the build artifacts:");
    println!("     parseo check");
    println!();
    println!("  3. Deploy:");
    println!("     parseo deploy");

    Ok(())
}
