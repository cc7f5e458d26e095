//! `parseo-run`, the container entrypoint for the stack image.
//!
//! Reads the service catalog (parseo.toml in the working directory, or the
//! shipped defaults when absent), launches both services with their
//! catalog port in `PORT`, and exits with the first-stopped service's code.
//! Container teardown takes the survivor down with this process.

use std::path::Path;
use std::process::ExitCode;

use parseo_core::ParseoConfig;
use parseo_supervisor::{ServiceCommand, Supervisor};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match ParseoConfig::load(Path::new(".")) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "failed to load service catalog");
            return ExitCode::FAILURE;
        }
    };

    let commands = config
        .services
        .iter()
        .map(|(name, spec)| {
            ServiceCommand::new(name, spec.binary.as_str()).env("PORT", spec.port.to_string())
        })
        .collect();

    let exit = match Supervisor::new(commands).run().await {
        Ok(exit) => exit,
        Err(error) => {
            tracing::error!(%error, "supervision failed");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        service = %exit.service,
        code = exit.status.code(),
        "first exit decides; shutting down"
    );
    // Shells report exit codes mod 256; keep the same view.
    ExitCode::from((exit.status.code() & 0xff) as u8)
}
