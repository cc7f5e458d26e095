//! First-exit-wins supervision for the Parseo service pair.
//!
//! One container runs two long-running services: the public API and the
//! analyzer engine. [`Supervisor::run`] launches both, watches each with an
//! independent task, and resolves as soon as either stops. The survivor is
//! not stopped by any logic here; it dies with the supervising process,
//! through `kill_on_drop` child handles and the container teardown that
//! follows. The `parseo-run` binary wraps this as the container entrypoint
//! and exits with the first-stopped service's code.

pub mod exit;
pub mod supervisor;

pub use exit::{ExitDisposition, ServiceExit};
pub use supervisor::{ServiceCommand, Supervisor, SupervisorError};
