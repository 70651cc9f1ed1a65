// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! UploadEngine - Sequential per-file upload with bounded retries.

use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::error::{Recovery, UploadError};
use crate::task::{UploadOutcome, UploadTask};
use crate::transport::{Transport, UploadSource};

/// Drives a list of [`UploadTask`]s through a [`Transport`].
pub struct UploadEngine<T> {
    transport: T,
    max_attempts: u32,
}

impl<T: Transport> UploadEngine<T> {
    /// `max_attempts` is clamped to at least 1.
    pub fn new(transport: T, max_attempts: u32) -> Self {
        Self {
            transport,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Attempt ceiling per file.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// The wrapped transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Gives the transport back.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Scans `tasks` until every one is done and returns how many succeeded.
    ///
    /// Each pass makes one attempt per unfinished task, in order. Already
    /// finished tasks are left untouched.
    pub fn upload_all(&mut self, tasks: &mut [UploadTask]) -> usize {
        let mut pass = 0;

        while tasks.iter().any(|task| !task.is_done()) {
            pass += 1;
            debug!(
                pass,
                done = tasks.iter().filter(|task| task.is_done()).count(),
                total = tasks.len(),
                "Upload pass"
            );

            for task in tasks.iter_mut().filter(|task| !task.is_done()) {
                self.step(task);
            }
        }

        let succeeded = tasks.iter().filter(|task| task.succeeded()).count();
        info!(succeeded, total = tasks.len(), "Uploads finished");

        succeeded
    }

    fn step(&mut self, task: &mut UploadTask) {
        let attempt = task.begin_attempt();
        let file = task.path().display().to_string();

        info!(
            file = %file,
            attempt,
            max_attempts = self.max_attempts,
            "Uploading"
        );

        let error = match self.attempt(task.path()) {
            Ok(bytes) => {
                info!(file = %file, bytes, "Upload succeeded");
                task.finish(UploadOutcome::Succeeded);
                return;
            }
            Err(error) => error,
        };

        match error.recovery() {
            Recovery::Recoverable if attempt < self.max_attempts => {
                warn!(file = %file, attempt, error = %error, "Upload failed, will retry");
            }
            Recovery::Recoverable => {
                error!(file = %file, attempt, error = %error, "Upload failed, attempts exhausted");
                task.finish(UploadOutcome::Failed);
            }
            Recovery::Unrecoverable => {
                error!(file = %file, attempt, error = %error, "Unrecoverable upload failure");
                task.finish(UploadOutcome::Failed);
            }
        }
    }

    fn attempt(&mut self, path: &Path) -> Result<usize, UploadError> {
        let source = UploadSource::open(path)?;
        self.transport.admit(source.file_name(), source.size())?;

        let request = source.read()?;
        let bytes = request.body.len();

        self.transport.send(request)?;

        Ok(bytes)
    }
}
