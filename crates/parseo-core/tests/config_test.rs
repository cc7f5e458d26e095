use parseo_core::{DeployTarget, ParseoConfig};
use tempfile::TempDir;

#[test]
fn load_returns_defaults_when_no_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = ParseoConfig::load(tmp.path()).unwrap();

    assert_eq!(config.project.service, "seo-analysis-api");
    assert_eq!(config.project.region, "us-central1");
    assert!(config.project.gcp_project_id.is_none());
    assert_eq!(config.services.api.binary, "parseo-api");
    assert_eq!(config.services.api.port, 8080);
    assert_eq!(config.services.analyzer.binary, "parseo-analyzer");
    assert_eq!(config.services.analyzer.port, 5000);
    assert_eq!(config.build.base_image, "rust:1.84-bookworm");
    assert_eq!(config.build.runtime_image, "gcr.io/distroless/cc-debian12");
    assert!(config.build.extra_packages.is_empty());
    assert_eq!(config.pipeline.image, "gcr.io/parseopy/parseo-app/parseo-seo");
    assert_eq!(config.pipeline.target, DeployTarget::Api);
    assert_eq!(config.pipeline.timeout_secs, 1800);
    assert_eq!(
        config.pipeline.service_account,
        "projects/parseopy/serviceAccounts/parseo-app@parseopy.iam.gserviceaccount.com"
    );
    assert_eq!(config.pipeline.logs_bucket, "gs://parseopy-build-logs");
    assert_eq!(config.cloud_run.memory, "512Mi");
    assert_eq!(config.cloud_run.cpu, 1);
    assert_eq!(config.cloud_run.min_instances, 0);
    assert_eq!(config.cloud_run.max_instances, 10);
    assert_eq!(config.cloud_run.concurrency, 80);
}

#[test]
fn load_parses_full_config() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[project]
service = "staging-seo-api"
region = "asia-northeast1"
gcp_project_id = "my-gcp-project"

[services.api]
binary = "edge-api"
port = 3000

[services.analyzer]
binary = "edge-analyzer"
port = 3001

[build]
base_image = "rust:1.82-slim"
runtime_image = "debian:bookworm-slim"
extra_packages = ["libssl-dev", "pkg-config"]
cargo_chef_version = "0.1.70"

[pipeline]
image = "gcr.io/my-gcp-project/edge/edge-seo"
target = "stack"
timeout_secs = 900
service_account = "projects/my-gcp-project/serviceAccounts/ci@my-gcp-project.iam.gserviceaccount.com"
logs_bucket = "gs://my-build-logs"

[cloud_run]
memory = "1Gi"
cpu = 2
min_instances = 1
max_instances = 50
concurrency = 200
"#;
    std::fs::write(tmp.path().join("parseo.toml"), toml).unwrap();

    let config = ParseoConfig::load(tmp.path()).unwrap();

    assert_eq!(config.project.service, "staging-seo-api");
    assert_eq!(config.project.region, "asia-northeast1");
    assert_eq!(
        config.project.gcp_project_id.as_deref(),
        Some("my-gcp-project")
    );
    assert_eq!(config.services.api.binary, "edge-api");
    assert_eq!(config.services.api.port, 3000);
    assert_eq!(config.services.analyzer.port, 3001);
    assert_eq!(config.build.base_image, "rust:1.82-slim");
    assert_eq!(config.build.runtime_image, "debian:bookworm-slim");
    assert_eq!(
        config.build.extra_packages,
        vec!["libssl-dev", "pkg-config"]
    );
    assert_eq!(config.build.cargo_chef_version, "0.1.70");
    assert_eq!(config.pipeline.image, "gcr.io/my-gcp-project/edge/edge-seo");
    assert_eq!(config.pipeline.target, DeployTarget::Stack);
    assert_eq!(config.pipeline.timeout_secs, 900);
    assert_eq!(config.pipeline.logs_bucket, "gs://my-build-logs");
    assert_eq!(config.cloud_run.memory, "1Gi");
    assert_eq!(config.cloud_run.cpu, 2);
    assert_eq!(config.cloud_run.min_instances, 1);
    assert_eq!(config.cloud_run.max_instances, 50);
    assert_eq!(config.cloud_run.concurrency, 200);
}

#[test]
fn load_partial_config_fills_defaults() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[project]
gcp_project_id = "partial-project"

[services.api]
binary = "custom-api"
port = 9000
"#;
    std::fs::write(tmp.path().join("parseo.toml"), toml).unwrap();

    let config = ParseoConfig::load(tmp.path()).unwrap();

    assert_eq!(
        config.project.gcp_project_id.as_deref(),
        Some("partial-project")
    );
    assert_eq!(config.services.api.binary, "custom-api");
    // Defaults preserved
    assert_eq!(config.project.service, "seo-analysis-api");
    assert_eq!(config.project.region, "us-central1");
    assert_eq!(config.services.analyzer.port, 5000);
    assert_eq!(config.pipeline.timeout_secs, 1800);
    assert_eq!(config.cloud_run.memory, "512Mi");
    assert_eq!(config.build.base_image, "rust:1.84-bookworm");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("parseo.toml"), "not valid {{{{ toml").unwrap();

    let result = ParseoConfig::load(tmp.path());
    assert!(result.is_err());

    let err = result.unwrap_err().to_string();
    assert!(err.contains("parse"));
}

#[test]
fn load_empty_config_returns_defaults() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("parseo.toml"), "").unwrap();

    let config = ParseoConfig::load(tmp.path()).unwrap();
    assert_eq!(config.project.region, "us-central1");
}

#[test]
fn load_rejects_port_clash() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[services.api]
binary = "parseo-api"
port = 5000
"#;
    std::fs::write(tmp.path().join("parseo.toml"), toml).unwrap();

    let result = ParseoConfig::load(tmp.path());
    assert!(result.is_err());
    let err = result.unwrap_err().to_string();
    assert!(err.contains("5000"), "got: {err}");
}

#[test]
fn deploy_port_follows_target() {
    let tmp = TempDir::new().unwrap();
    let config = ParseoConfig::load(tmp.path()).unwrap();
    assert_eq!(config.deploy_port(), 8080);

    std::fs::write(
        tmp.path().join("parseo.toml"),
        "[pipeline]\ntarget = \"analyzer\"\n",
    )
    .unwrap();
    let config = ParseoConfig::load(tmp.path()).unwrap();
    assert_eq!(config.deploy_port(), 5000);

    std::fs::write(
        tmp.path().join("parseo.toml"),
        "[pipeline]\ntarget = \"stack\"\n",
    )
    .unwrap();
    let config = ParseoConfig::load(tmp.path()).unwrap();
    assert_eq!(config.deploy_port(), 8080);
}

// ── include / env Tests ──

#[test]
fn load_defaults_include_is_none() {
    let tmp = TempDir::new().unwrap();
    let config = ParseoConfig::load(tmp.path()).unwrap();

    assert!(config.build.include.is_none());
    assert!(config.build.env.is_empty());
}

#[test]
fn load_include_paths() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[build]
include = ["stopwords/", "templates/"]
"#;
    std::fs::write(tmp.path().join("parseo.toml"), toml).unwrap();

    let config = ParseoConfig::load(tmp.path()).unwrap();

    let include = config.build.include.unwrap();
    assert_eq!(include, vec!["stopwords/", "templates/"]);
}

#[test]
fn load_build_env() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[build.env]
REPORT_DIR = "/app/reports"
RUST_LOG = "info"
"#;
    std::fs::write(tmp.path().join("parseo.toml"), toml).unwrap();

    let config = ParseoConfig::load(tmp.path()).unwrap();

    assert_eq!(config.build.env.len(), 2);
    assert_eq!(config.build.env["REPORT_DIR"], "/app/reports");
    assert_eq!(config.build.env["RUST_LOG"], "info");
}
