use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::service::ServicePair;

/// parseo.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseoConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub services: ServicePair,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub cloud_run: CloudRunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Cloud Run service name
    #[serde(default = "default_service_name")]
    pub service: String,
    /// GCP region (defaults to us-central1)
    #[serde(default = "default_region")]
    pub region: String,
    /// GCP project ID
    pub gcp_project_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Rust builder image
    #[serde(default = "default_builder_image")]
    pub base_image: String,
    /// Runtime base image
    #[serde(default = "default_runtime_image")]
    pub runtime_image: String,
    /// Additional system packages to install via apt-get
    #[serde(default)]
    pub extra_packages: Vec<String>,
    /// Cargo Chef version
    #[serde(default = "default_cargo_chef_version")]
    pub cargo_chef_version: String,
    /// Files/directories to include in the runtime image.
    /// When None, nothing beyond the binaries is copied.
    #[serde(default)]
    pub include: Option<Vec<String>>,
    /// Static environment variables baked into the container image.
    /// These become ENV directives in the Dockerfile.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// Which image recipe the Cloud Build pipeline builds and ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployTarget {
    /// The public API service image.
    #[default]
    Api,
    /// The analyzer service image.
    Analyzer,
    /// Both services plus the supervisor in one image.
    Stack,
}

impl DeployTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Analyzer => "analyzer",
            Self::Stack => "stack",
        }
    }
}

impl std::fmt::Display for DeployTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Registry path the pipeline tags and pushes, without the tag part.
    #[serde(default = "default_image")]
    pub image: String,
    /// Which recipe the pipeline builds.
    #[serde(default)]
    pub target: DeployTarget,
    /// Total pipeline timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Service account the build runs as (projects/…/serviceAccounts/… form).
    #[serde(default = "default_service_account")]
    pub service_account: String,
    /// GCS bucket receiving build logs.
    #[serde(default = "default_logs_bucket")]
    pub logs_bucket: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudRunConfig {
    /// Memory allocation
    #[serde(default = "default_memory")]
    pub memory: String,
    /// CPU count
    #[serde(default = "default_cpu")]
    pub cpu: u32,
    /// Minimum instances
    #[serde(default)]
    pub min_instances: u32,
    /// Maximum instances
    #[serde(default = "default_max_instances")]
    pub max_instances: u32,
    /// Max concurrent requests per instance
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            service: default_service_name(),
            region: default_region(),
            gcp_project_id: None,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            base_image: default_builder_image(),
            runtime_image: default_runtime_image(),
            extra_packages: Vec::new(),
            cargo_chef_version: default_cargo_chef_version(),
            include: None,
            env: HashMap::new(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            image: default_image(),
            target: DeployTarget::default(),
            timeout_secs: default_timeout_secs(),
            service_account: default_service_account(),
            logs_bucket: default_logs_bucket(),
        }
    }
}

impl Default for CloudRunConfig {
    fn default() -> Self {
        Self {
            memory: default_memory(),
            cpu: default_cpu(),
            min_instances: 0,
            max_instances: default_max_instances(),
            concurrency: default_concurrency(),
        }
    }
}

impl ParseoConfig {
    /// Load from parseo.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &std::path::Path) -> crate::Result<Self> {
        let config_path = project_dir.join("parseo.toml");
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            let config: Self =
                toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                    path: config_path,
                    source: e,
                })?;
            config.services.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// The port the deployed revision serves on, derived from the target recipe.
    ///
    /// The stack image fronts with the API service, so it shares the API port.
    pub fn deploy_port(&self) -> u16 {
        match self.pipeline.target {
            DeployTarget::Api | DeployTarget::Stack => self.services.api.port,
            DeployTarget::Analyzer => self.services.analyzer.port,
        }
    }
}

fn default_service_name() -> String {
    "seo-analysis-api".to_owned()
}

fn default_region() -> String {
    "us-central1".to_owned()
}

fn default_builder_image() -> String {
    "rust:1.84-bookworm".to_owned()
}

fn default_runtime_image() -> String {
    "gcr.io/distroless/cc-debian12".to_owned()
}

fn default_cargo_chef_version() -> String {
    "0.1.68".to_owned()
}

fn default_image() -> String {
    "gcr.io/parseopy/parseo-app/parseo-seo".to_owned()
}

fn default_timeout_secs() -> u64 {
    1800
}

fn default_service_account() -> String {
    "projects/parseopy/serviceAccounts/parseo-app@parseopy.iam.gserviceaccount.com".to_owned()
}

fn default_logs_bucket() -> String {
    "gs://parseopy-build-logs".to_owned()
}

fn default_memory() -> String {
    "512Mi".to_owned()
}

fn default_cpu() -> u32 {
    1
}

fn default_max_instances() -> u32 {
    10
}

fn default_concurrency() -> u32 {
    80
}
