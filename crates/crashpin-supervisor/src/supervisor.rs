// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! ProcessSupervisor - Spawn, wait, forward SIGTERM, classify, quiesce.

use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Command;
use tokio::runtime::{Builder, Runtime};
use tokio::signal::unix::{Signal, SignalKind, signal};
use tracing::{debug, error, info, warn};

use crashpin_config::{Configuration, TargetCommand};

use crate::error::SupervisorError;
use crate::outcome::{ChildOutcome, Termination};
use crate::signal::TerminationSignal;

/// Runs one child process to completion.
///
/// Owns a current-thread runtime that drives the child wait, the SIGTERM
/// stream and the quiesce timer.
pub struct ProcessSupervisor {
    runtime: Runtime,
    terminate: Signal,
    command: TargetCommand,
    quiesce: Duration,
    signal: TerminationSignal,
}

impl ProcessSupervisor {
    /// Builds the runtime and registers the SIGTERM handler.
    ///
    /// The child is not started until [`run`](Self::run).
    pub fn new(command: &TargetCommand, quiesce: Duration) -> Result<Self, SupervisorError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SupervisorError::SignalInit)?;

        let terminate = {
            let _context = runtime.enter();
            signal(SignalKind::terminate()).map_err(SupervisorError::SignalInit)?
        };

        debug!("SIGTERM handler registered");

        Ok(Self {
            runtime,
            terminate,
            command: command.clone(),
            quiesce,
            signal: TerminationSignal::new(),
        })
    }

    /// Same as [`new`](Self::new), taking the command and quiesce period from
    /// `config`.
    pub fn from_configuration(config: &Configuration) -> Result<Self, SupervisorError> {
        let command = config.command().ok_or(SupervisorError::NoCommand)?;
        Self::new(command, config.quiesce())
    }

    /// What was recorded about a delivered SIGTERM.
    pub fn signal(&self) -> &TerminationSignal {
        &self.signal
    }

    /// Starts the child and waits for it.
    ///
    /// A SIGTERM received while waiting is forwarded to the child once; the
    /// supervisor then keeps waiting for the child to end. A second SIGTERM
    /// stops that wait and the outcome becomes [`ChildOutcome::Unknown`].
    /// After an abnormal end it sleeps for the quiesce period before
    /// returning.
    pub fn run(&mut self) -> Result<Termination, SupervisorError> {
        let Self {
            runtime,
            terminate,
            command,
            quiesce,
            signal,
        } = self;

        let program = command.program().to_string_lossy().into_owned();

        runtime.block_on(async {
            let mut child = Command::new(command.program())
                .args(command.args())
                .spawn()
                .map_err(|source| {
                    error!(program = %program, error = %source, "Failed to start child");
                    SupervisorError::Exec {
                        program: program.clone(),
                        source,
                    }
                })?;

            let pid = child.id();
            info!(program = %program, pid, "Child started");

            let mut forwarded = None;

            let outcome = tokio::select! {
                status = child.wait() => outcome_of(pid, status),
                Some(()) = terminate.recv() => {
                    signal.record(libc::SIGTERM);
                    forwarded = Some(libc::SIGTERM);
                    warn!(pid, signal = libc::SIGTERM, "Termination signal received, forwarding");
                    forward(pid, libc::SIGTERM);

                    tokio::select! {
                        status = child.wait() => outcome_of(pid, status),
                        Some(()) = terminate.recv() => {
                            warn!(pid, "Second termination signal, no longer waiting");
                            ChildOutcome::Unknown
                        }
                    }
                }
            };

            let termination = Termination::new(outcome, forwarded);

            if termination.is_abnormal() {
                warn!(pid, outcome = ?outcome, "Child terminated abnormally");

                if !quiesce.is_zero() {
                    info!(seconds = quiesce.as_secs_f64(), "Quiescing before upload");
                    tokio::time::sleep(*quiesce).await;
                }
            } else {
                info!(pid, "Child exited normally");
            }

            Ok::<_, SupervisorError>(termination)
        })
    }
}

fn outcome_of(pid: Option<u32>, status: std::io::Result<ExitStatus>) -> ChildOutcome {
    match status {
        Ok(status) => ChildOutcome::from_status(status),
        Err(error) => {
            error!(pid, error = %error, "Failed to wait for child");
            ChildOutcome::Unknown
        }
    }
}

fn forward(pid: Option<u32>, signum: i32) {
    let Some(pid) = pid else {
        debug!("Child already reaped, nothing to signal");
        return;
    };

    if unsafe { libc::kill(pid as libc::pid_t, signum) } == 0 {
        debug!(pid, signal = signum, "Signal forwarded");
        return;
    }

    let error = std::io::Error::last_os_error();
    if error.raw_os_error() == Some(libc::ESRCH) {
        debug!(pid, "Child already exited");
    } else {
        warn!(pid, error = %error, "Failed to forward signal");
    }
}
