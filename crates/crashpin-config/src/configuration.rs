// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! The validated configuration and its value types.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;

use http::{HeaderName, HeaderValue, Method};

use crate::builder::ConfigurationBuilder;

/// Default HTTP method.
pub const DEFAULT_METHOD: Method = Method::PUT;
/// Default number of attempts per file.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default pause after an abnormal exit, before uploading.
pub const DEFAULT_QUIESCE: Duration = Duration::from_secs(10);
/// Default pinned arena size (10 MiB).
pub const DEFAULT_ARENA_SIZE: usize = 10 * 1024 * 1024;
/// Smallest accepted pinned arena size (1 MiB).
pub const MIN_ARENA_SIZE: usize = 1024 * 1024;
/// Default bound for files, headers and program arguments.
pub const DEFAULT_LIMIT: usize = 128;

/// Upper bounds on list-shaped options.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Limits {
    /// Maximum number of files.
    pub files: usize,
    /// Maximum number of headers.
    pub headers: usize,
    /// Maximum number of program arguments (the program itself excluded).
    pub args: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            files: DEFAULT_LIMIT,
            headers: DEFAULT_LIMIT,
            args: DEFAULT_LIMIT,
        }
    }
}

/// Where the pinned server certificate comes from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CertificateSource {
    /// PEM text given inline.
    Pem(String),
    /// Path to a PEM file.
    File(PathBuf),
}

impl CertificateSource {
    /// Inline PEM if `value` starts with a PEM armour line, a path otherwise.
    pub fn parse(value: &str) -> Self {
        if value.trim_start().starts_with("-----BEGIN") {
            Self::Pem(value.to_owned())
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

/// The program to supervise and its arguments.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TargetCommand {
    pub(crate) program: OsString,
    pub(crate) args: Vec<OsString>,
}

impl TargetCommand {
    /// Builds a command from an explicit program and argument list.
    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<OsString>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Program path or name (searched in `PATH` when it has no slash).
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Arguments after the program.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }
}

/// Validated configuration. Immutable once built.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub(crate) command: Option<TargetCommand>,
    pub(crate) url: String,
    pub(crate) method: Method,
    pub(crate) certificate: Option<CertificateSource>,
    pub(crate) headers: Vec<(HeaderName, HeaderValue)>,
    pub(crate) files: Vec<PathBuf>,
    pub(crate) max_attempts: u32,
    pub(crate) quiesce: Duration,
    pub(crate) arena_size: usize,
}

impl Configuration {
    /// Starts a builder with every default applied.
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// The supervised command, absent for the daemon.
    pub fn command(&self) -> Option<&TargetCommand> {
        self.command.as_ref()
    }

    /// Base URL; each file is uploaded to `url/<file name>`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// HTTP method.
    pub fn method(&self) -> Method {
        self.method.clone()
    }

    /// Optional pinned certificate.
    pub fn certificate(&self) -> Option<&CertificateSource> {
        self.certificate.as_ref()
    }

    /// Extra request headers, in command-line order.
    pub fn headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.headers
    }

    /// Artifact files, in command-line order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Files as borrowed paths.
    pub fn file_paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    /// Attempts per file, at least 1.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Pause after an abnormal exit.
    pub fn quiesce(&self) -> Duration {
        self.quiesce
    }

    /// Pinned arena size in bytes.
    pub fn arena_size(&self) -> usize {
        self.arena_size
    }
}
