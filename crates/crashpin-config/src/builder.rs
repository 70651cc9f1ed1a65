// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! ConfigurationBuilder - Collects raw values and validates them at once.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use http::{HeaderName, HeaderValue, Method};

use crate::configuration::{
    CertificateSource, Configuration, DEFAULT_ARENA_SIZE, DEFAULT_MAX_ATTEMPTS, DEFAULT_METHOD,
    DEFAULT_QUIESCE, Limits, MIN_ARENA_SIZE, TargetCommand,
};
use crate::error::ConfigError;

/// Builder for [`Configuration`].
///
/// Setters never fail; every check happens in [`build`](Self::build), in
/// this order: URL, method, files, headers, attempts, arena, program.
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    command: Vec<OsString>,
    program_required: bool,
    url: Option<String>,
    method: Option<String>,
    certificate: Option<String>,
    headers: Vec<String>,
    files: Vec<PathBuf>,
    max_attempts: u32,
    quiesce: Duration,
    arena_size: usize,
    limits: Limits,
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            program_required: false,
            url: None,
            method: None,
            certificate: None,
            headers: Vec::new(),
            files: Vec::new(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            quiesce: DEFAULT_QUIESCE,
            arena_size: DEFAULT_ARENA_SIZE,
            limits: Limits::default(),
        }
    }
}

impl ConfigurationBuilder {
    /// Program followed by its arguments.
    pub fn command<I, A>(mut self, argv: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.command = argv.into_iter().map(Into::into).collect();
        self
    }

    /// Fail with [`ConfigError::NoProgram`] when no command is given.
    pub fn program_required(mut self, required: bool) -> Self {
        self.program_required = required;
        self
    }

    /// Base upload URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// HTTP method name (default `PUT`).
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Inline PEM or path to a PEM file.
    pub fn certificate(mut self, certificate: impl Into<String>) -> Self {
        self.certificate = Some(certificate.into());
        self
    }

    /// Appends a `Name: value` header.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.headers.push(header.into());
        self
    }

    /// Appends several `Name: value` headers.
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers.extend(headers.into_iter().map(Into::into));
        self
    }

    /// Appends an artifact file.
    pub fn file(mut self, file: impl Into<PathBuf>) -> Self {
        self.files.push(file.into());
        self
    }

    /// Appends several artifact files.
    pub fn files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files.extend(files.into_iter().map(Into::into));
        self
    }

    /// Attempts per file.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Pause after an abnormal exit.
    pub fn quiesce(mut self, quiesce: Duration) -> Self {
        self.quiesce = quiesce;
        self
    }

    /// Pinned arena size in bytes.
    pub fn arena_size(mut self, arena_size: usize) -> Self {
        self.arena_size = arena_size;
        self
    }

    /// Overrides the list bounds.
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Validates everything and returns the configuration.
    pub fn build(self) -> Result<Configuration, ConfigError> {
        let url = match self.url {
            Some(url) if !url.trim().is_empty() => url,
            _ => return Err(ConfigError::EmptyUrl),
        };

        let method = match self.method {
            Some(method) => Method::from_bytes(method.as_bytes())
                .map_err(|_| ConfigError::InvalidMethod { method })?,
            None => DEFAULT_METHOD,
        };

        if self.files.is_empty() {
            return Err(ConfigError::NoFiles);
        }
        if self.files.len() > self.limits.files {
            return Err(ConfigError::TooManyFiles {
                limit: self.limits.files,
            });
        }

        if self.headers.len() > self.limits.headers {
            return Err(ConfigError::TooManyHeaders {
                limit: self.limits.headers,
            });
        }
        let headers = self
            .headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                parse_header(header).ok_or(ConfigError::InvalidHeader { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts);
        }

        if self.arena_size < MIN_ARENA_SIZE {
            return Err(ConfigError::ArenaTooSmall {
                min: MIN_ARENA_SIZE,
                requested: self.arena_size,
            });
        }

        let mut argv = self.command.into_iter();
        let command = match argv.next() {
            Some(program) => {
                let args: Vec<OsString> = argv.collect();
                if args.len() > self.limits.args {
                    return Err(ConfigError::TooManyArgs {
                        limit: self.limits.args,
                    });
                }
                Some(TargetCommand { program, args })
            }
            None if self.program_required => return Err(ConfigError::NoProgram),
            None => None,
        };

        Ok(Configuration {
            command,
            url,
            method,
            certificate: self.certificate.as_deref().map(CertificateSource::parse),
            headers,
            files: self.files,
            max_attempts: self.max_attempts,
            quiesce: self.quiesce,
            arena_size: self.arena_size,
        })
    }
}

fn parse_header(raw: &str) -> Option<(HeaderName, HeaderValue)> {
    let (name, value) = raw.split_once(':')?;
    let name = HeaderName::from_bytes(name.trim().as_bytes()).ok()?;
    let mut value = HeaderValue::from_str(value.trim()).ok()?;

    value.set_sensitive(true);

    Some((name, value))
}
