// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{TransportError, UploadError};

/// One file, ready to send.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UploadRequest {
    /// Last path component; the upload goes to `base_url/<file_name>`.
    pub file_name: String,
    /// Raw file bytes.
    pub body: Vec<u8>,
}

impl UploadRequest {
    /// Opens `path`, checks its size and reads it whole.
    pub fn from_file(path: &Path) -> Result<Self, UploadError> {
        UploadSource::open(path)?.read()
    }
}

/// An opened artifact whose size is known but whose bytes are not read yet.
#[derive(Debug)]
pub struct UploadSource {
    path: PathBuf,
    file_name: String,
    file: File,
    size: u64,
}

impl UploadSource {
    /// Opens `path` and stats it.
    ///
    /// The last path component must be valid UTF-8, it becomes the URL
    /// segment verbatim.
    pub fn open(path: &Path) -> Result<Self, UploadError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| UploadError::NoFileName {
                path: path.to_path_buf(),
            })?
            .to_owned();

        let file = File::open(path).map_err(|source| UploadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let size = file
            .metadata()
            .map_err(|source| UploadError::Stat {
                path: path.to_path_buf(),
                source,
            })?
            .len();

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            file,
            size,
        })
    }

    /// Name the upload goes to.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Size reported by `stat`.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Reads the whole file.
    pub fn read(mut self) -> Result<UploadRequest, UploadError> {
        let mut body = Vec::with_capacity(usize::try_from(self.size).unwrap_or(0));
        self.file
            .read_to_end(&mut body)
            .map_err(|source| UploadError::Read {
                path: self.path.clone(),
                source,
            })?;

        Ok(UploadRequest {
            file_name: self.file_name,
            body,
        })
    }
}

/// Sends one upload request.
pub trait Transport {
    /// Decides from the file name and size alone whether an attempt can
    /// proceed, before the file is read. Accepts everything by default.
    fn admit(&self, file_name: &str, size: u64) -> Result<(), TransportError> {
        let _ = (file_name, size);
        Ok(())
    }

    /// Performs a single attempt. The caller decides about retries from
    /// [`TransportError::recovery`].
    fn send(&mut self, request: UploadRequest) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn admit(&self, file_name: &str, size: u64) -> Result<(), TransportError> {
        (**self).admit(file_name, size)
    }

    fn send(&mut self, request: UploadRequest) -> Result<(), TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn admit(&self, file_name: &str, size: u64) -> Result<(), TransportError> {
        (**self).admit(file_name, size)
    }

    fn send(&mut self, request: UploadRequest) -> Result<(), TransportError> {
        (**self).send(request)
    }
}
