//! Launching the service pair and awaiting the first completion.

use std::path::PathBuf;

use tokio::process::Command;
use tokio::sync::mpsc;

use crate::{ExitDisposition, ServiceExit};

/// One long-running program to launch and watch.
#[derive(Debug, Clone)]
pub struct ServiceCommand {
    /// Catalog name, carried into the exit report.
    pub name: String,
    /// Program to execute, resolved via PATH when not absolute.
    pub program: String,
    pub args: Vec<String>,
    /// Extra environment variables for this child only.
    pub envs: Vec<(String, String)>,
    /// Working directory; inherited when unset.
    pub current_dir: Option<PathBuf>,
}

impl ServiceCommand {
    pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    #[error("no services to supervise")]
    NoServices,

    #[error("every watcher stopped without reporting an exit")]
    WatchersLost,
}

/// Launches a set of commands and reports the first one to stop.
pub struct Supervisor {
    commands: Vec<ServiceCommand>,
}

impl Supervisor {
    pub fn new(commands: Vec<ServiceCommand>) -> Self {
        Self { commands }
    }

    /// Spawn every command and wait for the first completion.
    ///
    /// Each child is owned by an independent watcher task; every watcher
    /// sends exactly one [`ServiceExit`] into a shared channel, and this
    /// method receives exactly once. When two children stop in the same
    /// instant, the winner is whichever watcher enqueues first; the
    /// channel serializes the race. A child that cannot be spawned
    /// completes immediately with [`ExitDisposition::SpawnFailed`], so one
    /// broken command never hangs the pair. Survivors hold `kill_on_drop`
    /// handles and die with their watcher tasks when the supervising
    /// process winds down.
    pub async fn run(self) -> Result<ServiceExit, SupervisorError> {
        if self.commands.is_empty() {
            return Err(SupervisorError::NoServices);
        }

        // Capacity covers one report per watcher, so sends never block
        // even though only the first report is consumed.
        let (tx, mut rx) = mpsc::channel(self.commands.len());
        for command in self.commands {
            tokio::spawn(watch(command, tx.clone()));
        }
        drop(tx);

        rx.recv().await.ok_or(SupervisorError::WatchersLost)
    }
}

/// Run one child to completion and report how it stopped.
async fn watch(command: ServiceCommand, tx: mpsc::Sender<ServiceExit>) {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .envs(command.envs.iter().map(|(k, v)| (k, v)))
        .kill_on_drop(true);
    if let Some(dir) = &command.current_dir {
        cmd.current_dir(dir);
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(error) => {
            tracing::error!(
                service = %command.name,
                program = %command.program,
                %error,
                "failed to spawn service"
            );
            report(
                &tx,
                ServiceExit {
                    service: command.name,
                    status: ExitDisposition::SpawnFailed,
                },
            )
            .await;
            return;
        }
    };

    tracing::info!(service = %command.name, pid = child.id(), "service started");

    let status = match child.wait().await {
        Ok(status) => ExitDisposition::from(status),
        Err(error) => {
            tracing::error!(service = %command.name, %error, "lost track of service");
            ExitDisposition::Exited(1)
        }
    };

    tracing::info!(service = %command.name, code = status.code(), "service stopped");
    report(
        &tx,
        ServiceExit {
            service: command.name,
            status,
        },
    )
    .await;
}

/// Deliver an exit report; the receiver is gone once the race is decided.
async fn report(tx: &mpsc::Sender<ServiceExit>, exit: ServiceExit) {
    if let Err(error) = tx.send(exit).await {
        tracing::debug!(service = %error.0.service, "exit report after the first exit already won");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_args_and_envs() {
        let command = ServiceCommand::new("api", "parseo-api")
            .arg("--verbose")
            .env("PORT", "8080")
            .current_dir("/app");

        assert_eq!(command.name, "api");
        assert_eq!(command.program, "parseo-api");
        assert_eq!(command.args, vec!["--verbose".to_owned()]);
        assert_eq!(command.envs, vec![("PORT".to_owned(), "8080".to_owned())]);
        assert_eq!(command.current_dir, Some(PathBuf::from("/app")));
    }
}
