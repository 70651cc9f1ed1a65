// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::path::{Path, PathBuf};

/// Final state of an upload task.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum UploadOutcome {
    /// Not finished yet.
    Pending,
    /// Uploaded.
    Succeeded,
    /// Abandoned.
    Failed,
}

/// Upload state for one file.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UploadTask {
    path: PathBuf,
    attempts: u32,
    done: bool,
    outcome: UploadOutcome,
}

impl UploadTask {
    /// A pending task with no attempts.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            attempts: 0,
            done: false,
            outcome: UploadOutcome::Pending,
        }
    }

    /// One task per path, in order.
    pub fn from_paths<I, P>(paths: I) -> Vec<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths.into_iter().map(Self::new).collect()
    }

    /// File to upload.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Attempts made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// True once the task will not be attempted again.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Current outcome.
    pub fn outcome(&self) -> UploadOutcome {
        self.outcome
    }

    /// True if the upload went through.
    pub fn succeeded(&self) -> bool {
        self.outcome == UploadOutcome::Succeeded
    }

    pub(crate) fn begin_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    pub(crate) fn finish(&mut self, outcome: UploadOutcome) {
        self.done = true;
        self.outcome = outcome;
    }
}
