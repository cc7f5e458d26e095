//! Core types and configuration for parseo.
//!
//! This crate defines the `parseo.toml` schema ([`ParseoConfig`]), the
//! api/analyzer service catalog ([`ServicePair`]), workspace discovery
//! ([`WorkspaceMeta`]), and shared error types.

pub mod config;
pub mod error;
pub mod service;
pub mod workspace;

pub use config::{
    BuildConfig, CloudRunConfig, DeployTarget, ParseoConfig, PipelineConfig, ProjectConfig,
};
pub use error::{Error, Result};
pub use service::{ServicePair, ServiceSpec};
pub use workspace::{CargoBinary, WorkspaceMeta};
