//! Cloud Build pipeline config: render, parse, audit.
//!
//! The pipeline is three steps in a fixed order (build the image tagged by
//! commit SHA, push it, deploy it to Cloud Run) bounded by a total timeout.
//! [`render`] produces the canonical config from `parseo.toml`;
//! [`PipelineSpec::audit`] checks any config (typically an ejected, hand-edited
//! one) against the same contract.

use parseo_core::ParseoConfig;
use serde::{Deserialize, Serialize};

/// Tag placeholder substituted by Cloud Build at submit time.
pub const COMMIT_SHA_PLACEHOLDER: &str = "$COMMIT_SHA";

/// Builder image for the docker build/push steps.
pub const DOCKER_BUILDER: &str = "gcr.io/cloud-builders/docker";

/// Builder image for the deploy step.
pub const CLOUD_SDK_BUILDER: &str = "gcr.io/google.com/cloudsdktool/cloud-sdk";

/// One pipeline step: a builder image and the args it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStep {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

/// A cloudbuild.yaml document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSpec {
    pub steps: Vec<BuildStep>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    pub timeout: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs_bucket: Option<String>,
}

impl PipelineSpec {
    pub fn from_yaml(text: &str) -> Result<Self, PipelineError> {
        serde_yaml::from_str(text).map_err(|e| PipelineError::Parse { source: e })
    }

    pub fn to_yaml(&self) -> Result<String, PipelineError> {
        serde_yaml::to_string(self).map_err(|e| PipelineError::Render { source: e })
    }

    /// Check the config against the pipeline contract.
    ///
    /// Verified: exactly three steps ordered build → push → deploy; one
    /// commit-tagged image reference used consistently by every step and the
    /// `images` list; deploy flags pinning service, platform, region, and
    /// public access; a timeout equal to the configured bound.
    pub fn audit(&self, config: &ParseoConfig) -> Vec<PipelineIssue> {
        let mut issues = Vec::new();

        match parse_timeout(&self.timeout) {
            Ok(secs) if secs == config.pipeline.timeout_secs => {}
            Ok(secs) => issues.push(PipelineIssue::TimeoutMismatch {
                expected_secs: config.pipeline.timeout_secs,
                found_secs: secs,
            }),
            Err(_) => issues.push(PipelineIssue::TimeoutUnparsable {
                raw: self.timeout.clone(),
            }),
        }

        if self.steps.len() != 3 {
            issues.push(PipelineIssue::StepCount {
                found: self.steps.len(),
            });
            return issues;
        }

        let mut image_refs: Vec<(String, String)> = Vec::new();

        // Step 1: docker build -t <image> <context>
        let build = &self.steps[0];
        if !build.name.contains("cloud-builders/docker") {
            issues.push(PipelineIssue::WrongBuilder {
                step: "build",
                expected: DOCKER_BUILDER,
                found: build.name.clone(),
            });
        }
        if build.args.first().map(String::as_str) != Some("build") {
            issues.push(PipelineIssue::WrongStepCommand {
                step: "build",
                expected: "build".to_owned(),
                found: build.args.first().cloned().unwrap_or_default(),
            });
        }
        match tag_argument(&build.args) {
            Some(image) => image_refs.push(("build -t".to_owned(), image.to_owned())),
            None => issues.push(PipelineIssue::MissingBuildTag),
        }

        // Step 2: docker push <image>
        let push = &self.steps[1];
        if !push.name.contains("cloud-builders/docker") {
            issues.push(PipelineIssue::WrongBuilder {
                step: "push",
                expected: DOCKER_BUILDER,
                found: push.name.clone(),
            });
        }
        match push.args.split_first() {
            Some((cmd, rest)) if cmd == "push" => {
                if let Some(image) = rest.first() {
                    image_refs.push(("push".to_owned(), image.clone()));
                } else {
                    issues.push(PipelineIssue::MissingPushImage);
                }
            }
            _ => issues.push(PipelineIssue::WrongStepCommand {
                step: "push",
                expected: "push".to_owned(),
                found: push.args.first().cloned().unwrap_or_default(),
            }),
        }

        // Step 3: gcloud run deploy <service> --image … --platform managed …
        let deploy = &self.steps[2];
        let runs_gcloud = deploy.entrypoint.as_deref() == Some("gcloud")
            || deploy.name.contains("cloud-builders/gcloud");
        if !runs_gcloud {
            issues.push(PipelineIssue::WrongBuilder {
                step: "deploy",
                expected: CLOUD_SDK_BUILDER,
                found: deploy.name.clone(),
            });
        }
        if deploy.args.len() < 3 || deploy.args[0] != "run" || deploy.args[1] != "deploy" {
            issues.push(PipelineIssue::WrongStepCommand {
                step: "deploy",
                expected: "run deploy".to_owned(),
                found: deploy.args.iter().take(2).cloned().collect::<Vec<_>>().join(" "),
            });
        } else if deploy.args[2] != config.project.service {
            issues.push(PipelineIssue::WrongService {
                expected: config.project.service.clone(),
                found: deploy.args[2].clone(),
            });
        }
        match flag_value(&deploy.args, "--image") {
            Some(image) => image_refs.push(("deploy --image".to_owned(), image.to_owned())),
            None => issues.push(PipelineIssue::MissingDeployFlag { flag: "--image" }),
        }
        check_flag(&mut issues, &deploy.args, "--platform", "managed");
        check_flag(&mut issues, &deploy.args, "--region", &config.project.region);
        if !deploy.args.iter().any(|a| a == "--allow-unauthenticated") {
            issues.push(PipelineIssue::MissingDeployFlag {
                flag: "--allow-unauthenticated",
            });
        }

        // Every reference must be the configured image, commit-tagged
        let expected_ref = commit_image_ref(config);
        for (site, image) in &image_refs {
            if !image.ends_with(&format!(":{COMMIT_SHA_PLACEHOLDER}")) {
                issues.push(PipelineIssue::CommitTagMissing {
                    site: site.clone(),
                    image: image.clone(),
                });
            }
        }
        let distinct: std::collections::BTreeSet<&String> =
            image_refs.iter().map(|(_, image)| image).collect();
        if distinct.len() > 1 {
            issues.push(PipelineIssue::InconsistentImageRefs {
                refs: image_refs.iter().map(|(_, i)| i.clone()).collect(),
            });
        } else if let Some(only) = distinct.into_iter().next()
            && *only != expected_ref
        {
            issues.push(PipelineIssue::UnexpectedImage {
                expected: expected_ref.clone(),
                found: only.clone(),
            });
        }
        if !self.images.contains(&expected_ref) {
            issues.push(PipelineIssue::ImageNotListed {
                image: expected_ref,
            });
        }

        issues
    }
}

/// The commit-tagged reference the pipeline builds, pushes, and deploys.
pub fn commit_image_ref(config: &ParseoConfig) -> String {
    format!("{}:{COMMIT_SHA_PLACEHOLDER}", config.pipeline.image)
}

/// Render the canonical three-step pipeline for this config.
///
/// The deploy step carries the pinned flags the audit checks plus the
/// `[cloud_run]` tuning flags, so one revision gets the full service shape.
pub fn render(config: &ParseoConfig) -> PipelineSpec {
    let image = commit_image_ref(config);
    let run = &config.cloud_run;

    let deploy_args: Vec<String> = [
        "run",
        "deploy",
        &config.project.service,
        "--image",
        &image,
        "--platform",
        "managed",
        "--region",
        &config.project.region,
        "--allow-unauthenticated",
        "--port",
        &config.deploy_port().to_string(),
        "--memory",
        &run.memory,
        "--cpu",
        &run.cpu.to_string(),
        "--min-instances",
        &run.min_instances.to_string(),
        "--max-instances",
        &run.max_instances.to_string(),
        "--concurrency",
        &run.concurrency.to_string(),
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    PipelineSpec {
        steps: vec![
            BuildStep {
                name: DOCKER_BUILDER.to_owned(),
                entrypoint: None,
                args: vec!["build".into(), "-t".into(), image.clone(), ".".into()],
            },
            BuildStep {
                name: DOCKER_BUILDER.to_owned(),
                entrypoint: None,
                args: vec!["push".into(), image.clone()],
            },
            BuildStep {
                name: CLOUD_SDK_BUILDER.to_owned(),
                entrypoint: Some("gcloud".to_owned()),
                args: deploy_args,
            },
        ],
        images: vec![image],
        timeout: format!("{}s", config.pipeline.timeout_secs),
        service_account: non_empty(&config.pipeline.service_account),
        logs_bucket: non_empty(&config.pipeline.logs_bucket),
    }
}

/// Parse a Cloud Build duration: digits with an optional trailing `s`.
pub fn parse_timeout(raw: &str) -> Result<u64, PipelineError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix('s').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PipelineError::BadTimeout {
            raw: raw.to_owned(),
        });
    }
    digits.parse().map_err(|_| PipelineError::BadTimeout {
        raw: raw.to_owned(),
    })
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

/// The image following `-t`/`--tag`, in split or `=` form.
fn tag_argument(args: &[String]) -> Option<&str> {
    for (i, arg) in args.iter().enumerate() {
        if arg == "-t" || arg == "--tag" {
            return args.get(i + 1).map(String::as_str);
        }
        if let Some(value) = arg.strip_prefix("--tag=") {
            return Some(value);
        }
    }
    None
}

/// The value of `--flag value` or `--flag=value`.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for (i, arg) in args.iter().enumerate() {
        if arg == flag {
            return args.get(i + 1).map(String::as_str);
        }
        if let Some(value) = arg.strip_prefix(flag)
            && let Some(value) = value.strip_prefix('=')
        {
            return Some(value);
        }
    }
    None
}

fn check_flag(issues: &mut Vec<PipelineIssue>, args: &[String], flag: &'static str, expected: &str) {
    match flag_value(args, flag) {
        Some(found) if found == expected => {}
        Some(found) => issues.push(PipelineIssue::WrongDeployFlag {
            flag,
            expected: expected.to_owned(),
            found: found.to_owned(),
        }),
        None => issues.push(PipelineIssue::MissingDeployFlag { flag }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to parse cloudbuild config")]
    Parse { source: serde_yaml::Error },

    #[error("failed to render cloudbuild config")]
    Render { source: serde_yaml::Error },

    #[error("timeout {raw:?} is not a duration in seconds")]
    BadTimeout { raw: String },
}

/// A way a pipeline config deviates from the contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineIssue {
    #[error("expected exactly 3 steps (build, push, deploy), found {found}")]
    StepCount { found: usize },

    #[error("{step} step runs builder '{found}', expected '{expected}'")]
    WrongBuilder {
        step: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("{step} step runs '{found}', expected '{expected}'")]
    WrongStepCommand {
        step: &'static str,
        expected: String,
        found: String,
    },

    #[error("build step has no -t/--tag image argument")]
    MissingBuildTag,

    #[error("push step names no image")]
    MissingPushImage,

    #[error("deploy step targets service '{found}', expected '{expected}'")]
    WrongService { expected: String, found: String },

    #[error("deploy step is missing {flag}")]
    MissingDeployFlag { flag: &'static str },

    #[error("deploy step has {flag} {found}, expected {expected}")]
    WrongDeployFlag {
        flag: &'static str,
        expected: String,
        found: String,
    },

    #[error("{site} references '{image}' without the :{} tag", COMMIT_SHA_PLACEHOLDER)]
    CommitTagMissing { site: String, image: String },

    #[error("steps reference different images: {refs:?}")]
    InconsistentImageRefs { refs: Vec<String> },

    #[error("pipeline references '{found}', expected '{expected}'")]
    UnexpectedImage { expected: String, found: String },

    #[error("images list does not record '{image}'")]
    ImageNotListed { image: String },

    #[error("timeout is {found_secs}s, expected {expected_secs}s")]
    TimeoutMismatch {
        expected_secs: u64,
        found_secs: u64,
    },

    #[error("timeout {raw:?} does not parse")]
    TimeoutUnparsable { raw: String },
}
