// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for crashpin-upload.
use std::path::PathBuf;

use thiserror::Error;

/// Whether a failed attempt is worth repeating.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Recovery {
    /// Transient, retry while attempts remain.
    Recoverable,
    /// Retrying cannot help.
    Unrecoverable,
}

/// Transport failures, at setup time or for a single request.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The base URL does not parse, or the joined URL is too long.
    #[error("malformed URL `{url}`: {reason}")]
    MalformedUrl {
        /// Offending URL.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// Only `http` and `https` are supported.
    #[error("unsupported protocol `{scheme}`")]
    UnsupportedProtocol {
        /// Offending scheme.
        scheme: String,
    },

    /// The server certificate was rejected.
    #[error("TLS trust failure: {0}")]
    Trust(#[source] reqwest::Error),

    /// The pinned arena cannot hold another transfer.
    #[error("pinned arena too small for transfer: {needed} bytes needed, {remaining} remaining")]
    OutOfMemory {
        /// Estimated bytes for the transfer.
        needed: usize,
        /// Bytes left in the arena.
        remaining: usize,
    },

    /// The request or client could not be assembled.
    #[error("transport configuration error: {0}")]
    Configuration(#[source] reqwest::Error),

    /// The server refused the upload (4xx other than 408 and 429).
    #[error("upload rejected with HTTP {0}")]
    Rejected(u16),

    /// The server is temporarily unable to accept the upload (5xx, 408, 429).
    #[error("server unavailable, HTTP {0}")]
    Unavailable(u16),

    /// No connection could be established.
    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    /// The transfer broke off midway.
    #[error("transfer failed: {0}")]
    Transfer(#[source] reqwest::Error),

    /// The transport worker thread or its runtime could not be created.
    #[error("failed to start transport runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// The transport worker thread is gone.
    #[error("transport worker stopped")]
    WorkerStopped,

    /// The pinned certificate file could not be read.
    #[error("failed to read certificate `{}`: {source}", .path.display())]
    CertificateFile {
        /// Certificate path.
        path: PathBuf,
        /// Read error.
        #[source]
        source: std::io::Error,
    },

    /// The pinned certificate is not valid PEM.
    #[error("invalid certificate: {0}")]
    Certificate(#[source] reqwest::Error),
}

impl TransportError {
    /// Classifies this error for the retry policy.
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::Unavailable(_) | Self::Connect(_) | Self::Transfer(_) => Recovery::Recoverable,
            _ => Recovery::Unrecoverable,
        }
    }
}

/// A failed upload attempt.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The path has no final component to name the upload after, or that
    /// component is not valid UTF-8.
    #[error("`{}` has no usable file name", .path.display())]
    NoFileName {
        /// Offending path.
        path: PathBuf,
    },

    /// The file could not be opened.
    #[error("`{}` could not be opened: {source}", .path.display())]
    Open {
        /// File path.
        path: PathBuf,
        /// Open error.
        #[source]
        source: std::io::Error,
    },

    /// The file could not be examined for size.
    #[error("`{}` could not be examined for size: {source}", .path.display())]
    Stat {
        /// File path.
        path: PathBuf,
        /// Stat error.
        #[source]
        source: std::io::Error,
    },

    /// The file could not be read.
    #[error("`{}` could not be read: {source}", .path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Read error.
        #[source]
        source: std::io::Error,
    },

    /// The transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl UploadError {
    /// Local file problems are never retried.
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::Transport(error) => error.recovery(),
            _ => Recovery::Unrecoverable,
        }
    }
}
