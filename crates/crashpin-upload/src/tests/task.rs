// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::path::Path;

use crate::task::{UploadOutcome, UploadTask};

#[test]
fn test_new_task_is_pending() {
    let task = UploadTask::new("/tmp/core");

    assert_eq!(task.path(), Path::new("/tmp/core"));
    assert_eq!(task.attempts(), 0);
    assert!(!task.is_done());
    assert_eq!(task.outcome(), UploadOutcome::Pending);
    assert!(!task.succeeded());
}

#[test]
fn test_from_paths_keeps_order() {
    let tasks = UploadTask::from_paths(["/a", "/b", "/c"]);

    let paths: Vec<&Path> = tasks.iter().map(UploadTask::path).collect();
    assert_eq!(paths, [Path::new("/a"), Path::new("/b"), Path::new("/c")]);
}

#[test]
fn test_attempt_then_finish() {
    let mut task = UploadTask::new("/tmp/core");

    assert_eq!(task.begin_attempt(), 1);
    assert_eq!(task.begin_attempt(), 2);
    task.finish(UploadOutcome::Succeeded);

    assert!(task.is_done());
    assert!(task.succeeded());
    assert_eq!(task.attempts(), 2);
}
