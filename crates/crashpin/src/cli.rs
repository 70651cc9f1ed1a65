// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Command-line options for both binaries.
//!
//! `-h` is taken by `--header`, so help is `--help` only.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser};

use crashpin_config::{
    ConfigError, Configuration, ConfigurationBuilder, DEFAULT_ARENA_SIZE, DEFAULT_MAX_ATTEMPTS,
};

/// Options shared by `crashpin` and `crashpin-daemon`.
#[derive(Debug, Clone, Args)]
pub struct UploadArgs {
    /// URL to upload to; each file goes to URL/<file name>
    #[arg(short = 'u', long = "url", value_name = "URL", required = true)]
    pub url: String,

    /// File to upload (repeatable)
    #[arg(short = 'f', long = "file", value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Max attempts to upload a file
    #[arg(
        short = 'n',
        long = "max-attempts",
        value_name = "MAX_ATTEMPTS",
        default_value_t = DEFAULT_MAX_ATTEMPTS
    )]
    pub max_attempts: u32,

    /// Seconds to wait after abnormal termination before uploading
    #[arg(short = 'q', long = "quiesce", value_name = "QUIESCE_SECS", default_value_t = 10)]
    pub quiesce_secs: u64,

    /// HTTP method to upload with
    #[arg(short = 'm', long = "method", value_name = "METHOD", default_value = "PUT")]
    pub method: String,

    /// Pinned arena size in bytes.
    ///
    /// 256 KiB are reserved for the HTTP client. Over HTTPS every attempt also
    /// consumes about its file size, so the bytes sent across all files and
    /// retries must fit in the rest. Plain HTTP uploads are not bounded by it.
    #[arg(
        short = 's',
        long = "arena-size",
        value_name = "ARENA_SIZE",
        default_value_t = DEFAULT_ARENA_SIZE
    )]
    pub arena_size: usize,

    /// Trusted server certificate: inline PEM or a path to a PEM file
    #[arg(short = 'c', long = "certificate", value_name = "CERTIFICATE")]
    pub certificate: Option<String>,

    /// Header to send with each upload, as "Name: value" (repeatable)
    #[arg(short = 'h', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,
}

impl UploadArgs {
    /// Builder preloaded with these options.
    pub fn builder(&self) -> ConfigurationBuilder {
        let builder = Configuration::builder()
            .url(self.url.clone())
            .files(self.files.iter().cloned())
            .max_attempts(self.max_attempts)
            .quiesce(Duration::from_secs(self.quiesce_secs))
            .method(self.method.clone())
            .arena_size(self.arena_size)
            .headers(self.headers.iter().cloned());

        match &self.certificate {
            Some(certificate) => builder.certificate(certificate.clone()),
            None => builder,
        }
    }
}

/// `crashpin [OPTIONS] PROGRAM [ARG ...]`
#[derive(Debug, Clone, Parser)]
#[command(
    name = "crashpin",
    version,
    about = "Run PROGRAM and upload crash artifacts if it terminates abnormally",
    disable_help_flag = true
)]
pub struct Cli {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub upload: UploadArgs,

    /// Print help
    #[arg(long = "help", action = ArgAction::Help)]
    help: Option<bool>,

    /// Program to execute, followed by its arguments
    #[arg(
        value_name = "PROGRAM",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<OsString>,
}

impl Cli {
    /// Validates the options; a program is mandatory.
    pub fn into_configuration(self) -> Result<Configuration, ConfigError> {
        self.upload
            .builder()
            .command(self.command)
            .program_required(true)
            .build()
    }
}

/// `crashpin-daemon [OPTIONS]`
#[derive(Debug, Clone, Parser)]
#[command(
    name = "crashpin-daemon",
    version,
    about = "Wait for SIGUSR1 to upload crash artifacts, or SIGTERM to exit",
    disable_help_flag = true
)]
pub struct DaemonCli {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub upload: UploadArgs,

    /// Print help
    #[arg(long = "help", action = ArgAction::Help)]
    help: Option<bool>,
}

impl DaemonCli {
    /// Validates the options.
    pub fn into_configuration(self) -> Result<Configuration, ConfigError> {
        self.upload.builder().build()
    }
}
