pub mod client;
pub mod executor;
pub mod gcloud;

pub use client::{
    ApiCheck, CheckResult, CloudBuildError, DeployError, DoctorReport, GcloudClient,
    PreflightError, PreflightReport,
};
pub use executor::{GcloudExecutor, RealExecutor};
