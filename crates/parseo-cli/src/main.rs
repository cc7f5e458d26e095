mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "parseo", about = "Build, audit, and deploy the Parseo SEO analysis stack")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add parseo to an existing Rust workspace
    Init,
    /// Audit image recipes and pipeline config against the service catalog
    Check,
    /// Eject build artifacts for manual customization
    Eject,
    /// Deploy to Google Cloud Run via Cloud Build
    Deploy {
        /// Allow deploying with uncommitted changes
        #[arg(long)]
        allow_dirty: bool,
    },
    /// Check GCP setup and readiness
    Doctor,
    /// Show Cloud Run service status
    Status,
    /// Read Cloud Run service logs
    Logs {
        /// Number of log entries to show
        #[arg(long, short = 'n', default_value_t = 100)]
        tail: u32,
    },
    /// Delete the Cloud Run service, its image, and the local bundle
    Destroy {
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init_project().await?,
        Commands::Check => commands::check().await?,
        Commands::Eject => commands::eject().await?,
        Commands::Deploy { allow_dirty } => commands::deploy(allow_dirty).await?,
        Commands::Doctor => commands::doctor().await?,
        Commands::Status => commands::status().await?,
        Commands::Logs { tail } => commands::logs(tail).await?,
        Commands::Destroy { yes } => commands::destroy(yes).await?,
    }

    Ok(())
}
