// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Crash artifact upload.
//!
//! - [`UploadTask`]: one per file, tracks attempts and the final outcome
//! - [`UploadEngine`]: scans the task list until every task is done,
//!   retrying recoverable failures up to the attempt ceiling
//! - [`Transport`]: the seam between the engine and the wire
//! - [`HttpTransport`]: reqwest over rustls, run on a worker thread inside a
//!   pinned allocation scope so TLS state and credentials stay in locked
//!   memory; the worker is joined when the transport is dropped
//!
//! Uploads are strictly sequential.

#![warn(missing_docs)]

#[cfg(test)]
mod tests;

mod engine;
mod error;
#[cfg(unix)]
mod http_transport;
mod task;
mod transport;

pub use engine::UploadEngine;
pub use error::{Recovery, TransportError, UploadError};
#[cfg(unix)]
pub use http_transport::{HttpTransport, MAX_URL_LENGTH, TRANSPORT_HEADROOM};
pub use task::{UploadOutcome, UploadTask};
pub use transport::{Transport, UploadRequest, UploadSource};
