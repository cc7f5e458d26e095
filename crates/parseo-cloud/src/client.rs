use crate::executor::{GcloudExecutor, RealExecutor};
use crate::gcloud::GcloudError;
use std::fmt;
use std::path::Path;

/// APIs every deploy touches: Cloud Build executes the pipeline, Cloud Run
/// hosts the result.
const REQUIRED_APIS: &[RequiredApi] = &[
    RequiredApi {
        label: "Cloud Build",
        service: "cloudbuild.googleapis.com",
    },
    RequiredApi {
        label: "Cloud Run",
        service: "run.googleapis.com",
    },
];

struct RequiredApi {
    label: &'static str,
    service: &'static str,
}

/// Typed front door to the `gcloud` CLI, generic over the executor so tests
/// can drive it with a mock.
///
/// The deploy itself happens inside Cloud Build (the third pipeline step runs
/// `gcloud run deploy`); this client submits the build, inspects the deployed
/// service, and tears it down.
pub struct GcloudClient<E: GcloudExecutor = RealExecutor> {
    executor: E,
}

impl GcloudClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor,
        }
    }
}

impl Default for GcloudClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: GcloudExecutor> GcloudClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── Probes ──
    //
    // Single-question gcloud queries shared by preflight and doctor.

    /// First line of `gcloud version`, with the "Google Cloud SDK" banner
    /// prefix removed.
    async fn sdk_version(&self) -> Result<String, GcloudError> {
        let banner = self.executor.exec(&args(["version"])).await?;
        let line = banner.lines().next().unwrap_or("");
        Ok(line
            .strip_prefix("Google Cloud SDK ")
            .unwrap_or(line)
            .trim()
            .to_owned())
    }

    /// Display name of the project, which doubles as an access probe.
    async fn project_name(&self, project_id: &str) -> Result<String, GcloudError> {
        let name = self
            .executor
            .exec(&args([
                "projects",
                "describe",
                project_id,
                "--format",
                "value(name)",
            ]))
            .await?;
        Ok(name.trim().to_owned())
    }

    async fn api_enabled(&self, project_id: &str, service: &str) -> bool {
        self.executor
            .exec(&args([
                "services",
                "list",
                "--project",
                project_id,
                "--filter",
                &format!("config.name={service}"),
                "--format",
                "value(config.name)",
            ]))
            .await
            .map(|out| !out.trim().is_empty())
            .unwrap_or(false)
    }

    // ── Preflight ──

    /// Fail-fast environment check run before a deploy spends minutes in
    /// Cloud Build. The first broken prerequisite aborts with a specific
    /// error; disabled APIs are gathered into the report instead so the
    /// caller can list all of them at once.
    pub async fn check_prerequisites(
        &self,
        project_id: &str,
    ) -> Result<PreflightReport, PreflightError> {
        let gcloud_version = self
            .sdk_version()
            .await
            .map_err(|_| PreflightError::GcloudNotInstalled)?;

        self.executor
            .exec(&args(["auth", "print-access-token", "--quiet"]))
            .await
            .map_err(|_| PreflightError::NotAuthenticated)?;

        let project_name = self
            .project_name(project_id)
            .await
            .map_err(|_| PreflightError::ProjectNotAccessible(project_id.to_owned()))?;

        let mut disabled_apis = Vec::new();
        for api in REQUIRED_APIS {
            if !self.api_enabled(project_id, api.service).await {
                disabled_apis.push(api.service.to_owned());
            }
        }

        Ok(PreflightReport {
            gcloud_version: Some(gcloud_version),
            authenticated: true,
            project_name: Some(project_name),
            disabled_apis,
        })
    }

    // ── Doctor ──

    /// Walk every environment check and record pass/fail for each, never
    /// stopping early the way preflight does. The config file row is left
    /// for the caller, who knows where it looked.
    pub async fn doctor(&self, project_id: Option<&str>) -> DoctorReport {
        let mut report = DoctorReport::default();

        report.gcloud = match self.sdk_version().await {
            Ok(version) => CheckResult::ok(version),
            Err(error) => CheckResult::fail(error.to_string()),
        };

        report.account = match self
            .executor
            .exec(&args(["config", "get-value", "account"]))
            .await
        {
            Ok(account) if !account.trim().is_empty() => CheckResult::ok(account.trim()),
            _ => CheckResult::fail("no active account"),
        };

        // The remaining checks all need a project to ask about.
        let Some(pid) = project_id else {
            report.project = CheckResult::fail("gcp_project_id not set in parseo.toml");
            return report;
        };

        match self.project_name(pid).await {
            Ok(name) => report.project = CheckResult::ok(format!("{pid} ({name})")),
            Err(_) => {
                report.project = CheckResult::fail(format!("{pid} is not accessible"));
                return report;
            }
        }

        let billing_enabled = self
            .executor
            .exec(&args([
                "billing",
                "projects",
                "describe",
                pid,
                "--format",
                "value(billingEnabled)",
            ]))
            .await
            .map(|out| out.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        report.billing = if billing_enabled {
            CheckResult::ok("Enabled")
        } else {
            CheckResult::fail("Billing not enabled")
        };

        for api in REQUIRED_APIS {
            let result = if self.api_enabled(pid, api.service).await {
                CheckResult::ok("Enabled")
            } else {
                CheckResult::fail("Not enabled")
            };
            report.apis.push(ApiCheck {
                name: api.label.to_owned(),
                result,
            });
        }

        report
    }

    // ── Cloud Build ──

    /// Submit the bundle to Cloud Build using its bundled `cloudbuild.yaml`.
    ///
    /// `COMMIT_SHA` is bound via `--substitutions` so a manually submitted
    /// build tags images exactly like a trigger-driven one.
    pub async fn submit_build(
        &self,
        bundle_dir: &Path,
        project_id: &str,
        commit_sha: &str,
    ) -> Result<(), CloudBuildError> {
        let bundle_str = bundle_dir
            .to_str()
            .ok_or_else(|| CloudBuildError::InvalidPath(bundle_dir.to_path_buf()))?;
        let config_path = bundle_dir.join("cloudbuild.yaml");
        let config_str = config_path
            .to_str()
            .ok_or_else(|| CloudBuildError::InvalidPath(config_path.clone()))?;

        self.executor
            .exec_streaming(&args([
                "builds",
                "submit",
                bundle_str,
                "--config",
                config_str,
                "--project",
                project_id,
                "--substitutions",
                &format!("COMMIT_SHA={commit_sha}"),
                "--quiet",
            ]))
            .await
            .map_err(|e| CloudBuildError::Submit { source: e })
    }

    // ── Cloud Run ──

    pub async fn describe_service(
        &self,
        service_name: &str,
        project_id: &str,
        region: &str,
    ) -> Result<String, DeployError> {
        self.executor
            .exec(&args([
                "run",
                "services",
                "describe",
                service_name,
                "--project",
                project_id,
                "--region",
                region,
                "--format",
                "yaml(status)",
            ]))
            .await
            .map_err(|e| DeployError::Describe { source: e })
    }

    pub async fn delete_service(
        &self,
        service_name: &str,
        project_id: &str,
        region: &str,
    ) -> Result<(), DeployError> {
        self.executor
            .exec(&args([
                "run",
                "services",
                "delete",
                service_name,
                "--project",
                project_id,
                "--region",
                region,
                "--quiet",
            ]))
            .await
            .map_err(|e| DeployError::Delete { source: e })?;

        Ok(())
    }

    pub async fn read_logs(
        &self,
        service_name: &str,
        project_id: &str,
        region: &str,
        limit: u32,
    ) -> Result<(), DeployError> {
        self.executor
            .exec_streaming(&args([
                "run",
                "services",
                "logs",
                "read",
                service_name,
                "--project",
                project_id,
                "--region",
                region,
                "--limit",
                &limit.to_string(),
            ]))
            .await
            .map_err(|e| DeployError::Logs { source: e })
    }

    // ── Container Registry ──

    /// Delete a commit-tagged image from Container Registry.
    ///
    /// The image reference carries the registry host and project, so no
    /// `--project` flag is needed.
    pub async fn delete_image(&self, image_tag: &str) -> Result<(), DeployError> {
        self.executor
            .exec(&args([
                "container",
                "images",
                "delete",
                image_tag,
                "--force-delete-tags",
                "--quiet",
            ]))
            .await
            .map_err(|e| DeployError::DeleteImage { source: e })?;

        Ok(())
    }
}

// ── Helper ──

fn args<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.into_iter().map(str::to_owned).collect()
}

// ── Preflight types ──

/// What preflight learned about the environment before a deploy.
#[derive(Debug, Default)]
pub struct PreflightReport {
    pub gcloud_version: Option<String>,
    pub authenticated: bool,
    pub project_name: Option<String>,
    pub disabled_apis: Vec<String>,
}

impl PreflightReport {
    pub fn has_warnings(&self) -> bool {
        !self.disabled_apis.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PreflightError {
    #[error("gcloud CLI not found on PATH; install the Cloud SDK: https://cloud.google.com/sdk/docs/install")]
    GcloudNotInstalled,

    #[error("no active gcloud credentials; run `gcloud auth login` first")]
    NotAuthenticated,

    #[error("GCP project '{0}' could not be read; check the project ID and your permissions")]
    ProjectNotAccessible(String),
}

// ── Doctor types ──

/// One row per environment check, rendered as an aligned status table.
#[derive(Debug, Default)]
pub struct DoctorReport {
    pub gcloud: CheckResult,
    pub account: CheckResult,
    pub project: CheckResult,
    pub billing: CheckResult,
    pub apis: Vec<ApiCheck>,
    pub config_file: CheckResult,
}

impl DoctorReport {
    pub fn all_passed(&self) -> bool {
        self.rows().iter().all(|(_, check)| check.passed)
    }

    fn rows(&self) -> Vec<(String, &CheckResult)> {
        let mut rows = vec![
            ("gcloud CLI".to_owned(), &self.gcloud),
            ("Account".to_owned(), &self.account),
            ("Project".to_owned(), &self.project),
            ("Billing".to_owned(), &self.billing),
        ];
        rows.extend(
            self.apis
                .iter()
                .map(|api| (format!("{} API", api.name), &api.result)),
        );
        rows.push(("Config file".to_owned(), &self.config_file));
        rows
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .rows()
            .into_iter()
            .map(|(label, check)| format!("[{}] {:<14} {}", check.icon(), label, check.detail))
            .collect();
        f.write_str(&lines.join("\n"))
    }
}

#[derive(Debug, Default, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    pub fn ok(detail: impl Into<String>) -> Self {
        Self {
            passed: true,
            detail: detail.into(),
        }
    }

    pub fn fail(detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            detail: detail.into(),
        }
    }

    /// Two-letter status shown in the `[OK]`/`[NG]` column.
    pub fn icon(&self) -> &'static str {
        if self.passed { "OK" } else { "NG" }
    }
}

#[derive(Debug, Clone)]
pub struct ApiCheck {
    pub name: String,
    pub result: CheckResult,
}

// ── Error types ──

#[derive(Debug, thiserror::Error)]
pub enum CloudBuildError {
    #[error("bundle path is not valid UTF-8: {0}")]
    InvalidPath(std::path::PathBuf),

    #[error("cloud build submission failed")]
    Submit { source: GcloudError },
}

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("failed to read service status")]
    Describe { source: GcloudError },

    #[error("failed to delete service")]
    Delete { source: GcloudError },

    #[error("failed to read service logs")]
    Logs { source: GcloudError },

    #[error("failed to delete container image")]
    DeleteImage { source: GcloudError },
}
