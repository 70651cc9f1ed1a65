// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for crashpin-config.
use thiserror::Error;

/// Validation failures, reported one at a time in a fixed check order.
///
/// Header errors carry the header's position, never its value, since headers
/// routinely hold credentials.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ConfigError {
    /// No upload URL was given.
    #[error("an upload URL is required")]
    EmptyUrl,

    /// The HTTP method is not a valid token.
    #[error("invalid HTTP method `{method}`")]
    InvalidMethod {
        /// The rejected method.
        method: String,
    },

    /// No artifact file was given.
    #[error("at least one file is required")]
    NoFiles,

    /// More files than the configured maximum.
    #[error("too many files (limit {limit})")]
    TooManyFiles {
        /// The file limit.
        limit: usize,
    },

    /// More headers than the configured maximum.
    #[error("too many headers (limit {limit})")]
    TooManyHeaders {
        /// The header limit.
        limit: usize,
    },

    /// A header is not of the form `Name: value` or has invalid characters.
    #[error("header #{index} is not a valid `Name: value` pair")]
    InvalidHeader {
        /// Zero-based position of the header on the command line.
        index: usize,
    },

    /// The maximum number of attempts per file is zero.
    #[error("max attempts must be at least 1")]
    InvalidMaxAttempts,

    /// The arena is below the floor.
    #[error("arena size {requested} is below the minimum of {min} bytes")]
    ArenaTooSmall {
        /// The floor.
        min: usize,
        /// The requested size.
        requested: usize,
    },

    /// A target program is required but missing.
    #[error("a program to supervise is required")]
    NoProgram,

    /// More program arguments than the configured maximum.
    #[error("too many program arguments (limit {limit})")]
    TooManyArgs {
        /// The argument limit.
        limit: usize,
    },
}
