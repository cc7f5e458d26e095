//! Exit reporting: how a supervised service stopped and what code the
//! supervising process should propagate for it.

use std::process::ExitStatus;

/// How a supervised service came to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDisposition {
    /// The process exited on its own with a status code.
    Exited(i32),
    /// The process was killed by a signal.
    Signaled(i32),
    /// The process never started.
    SpawnFailed,
}

impl ExitDisposition {
    /// The code to exit with, following shell convention: exit codes pass
    /// through unchanged, a signal death becomes `128 + signal`, and a
    /// service that could not start becomes 127.
    pub fn code(self) -> i32 {
        match self {
            Self::Exited(code) => code,
            Self::Signaled(signal) => 128 + signal,
            Self::SpawnFailed => 127,
        }
    }
}

impl From<ExitStatus> for ExitDisposition {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Exited(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::Signaled(signal);
            }
        }
        Self::Exited(1)
    }
}

/// A watcher task's report: which service stopped, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceExit {
    /// Catalog name of the service that stopped.
    pub service: String,
    pub status: ExitDisposition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_pass_through() {
        assert_eq!(ExitDisposition::Exited(0).code(), 0);
        assert_eq!(ExitDisposition::Exited(7).code(), 7);
        assert_eq!(ExitDisposition::Exited(255).code(), 255);
    }

    #[test]
    fn signal_deaths_follow_shell_convention() {
        assert_eq!(ExitDisposition::Signaled(15).code(), 143);
        assert_eq!(ExitDisposition::Signaled(9).code(), 137);
    }

    #[test]
    fn spawn_failure_reads_as_command_not_found() {
        assert_eq!(ExitDisposition::SpawnFailed.code(), 127);
    }
}
