// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! HttpTransport - reqwest over rustls on a pinned worker thread.
//!
//! The runtime, the client (connection pool, TLS configuration, default
//! headers) and every request live on one worker thread that holds a
//! [`PinnedScope`] for its whole life, so their heap state and the thread's
//! own thread-local state are served from the locked arena. Dropping the
//! transport joins the worker, after which nothing it allocated is touched
//! again. File bodies are read by the caller and stay in the regular heap.
//!
//! The worker never logs. No timeouts are configured: a stalled server
//! stalls the upload.

use std::error::Error as StdError;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use crashpin_arena::{PinnedAllocator, PinnedScope};
use crashpin_config::{CertificateSource, Configuration};
use http::{HeaderMap, Method, StatusCode};
use reqwest::{Certificate, Client, Url};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::error::TransportError;
use crate::transport::{Transport, UploadRequest};

/// Arena bytes kept free for the client itself on top of the body size.
///
/// Over HTTPS every attempt also consumes roughly its body size of arena
/// for TLS records, and arena bytes are never reused. Plain HTTP bodies
/// never enter the arena.
pub const TRANSPORT_HEADROOM: usize = 256 * 1024;

/// Longest URL a request may target.
pub const MAX_URL_LENGTH: usize = 2048;

type Reply = Result<(), TransportError>;

struct ClientSetup {
    headers: HeaderMap,
    certificate: Option<Vec<u8>>,
}

struct Job {
    method: Method,
    url: Url,
    body: Vec<u8>,
}

/// Production [`Transport`].
///
/// With a pinned allocator, the transport must be dropped before the arena
/// installed in it is destroyed.
pub struct HttpTransport {
    jobs: Option<Sender<Job>>,
    replies: Receiver<Reply>,
    worker: Option<JoinHandle<()>>,
    base_url: String,
    method: Method,
    tls: bool,
    pin: Option<&'static PinnedAllocator>,
}

impl HttpTransport {
    /// Starts the worker and builds its runtime and client from `config`.
    ///
    /// With `pin` set, the worker runs inside `pin`'s scope; the caller must
    /// have installed an arena.
    pub fn new(
        config: &Configuration,
        pin: Option<&'static PinnedAllocator>,
    ) -> Result<Self, TransportError> {
        let certificate = match config.certificate() {
            Some(CertificateSource::Pem(pem)) => Some(pem.as_bytes().to_vec()),
            Some(CertificateSource::File(path)) => Some(std::fs::read(path).map_err(|source| {
                TransportError::CertificateFile {
                    path: path.clone(),
                    source,
                }
            })?),
            None => None,
        };

        let setup = ClientSetup {
            headers: config.headers().iter().cloned().collect(),
            certificate,
        };

        let (jobs, queue) = mpsc::channel();
        let (reply, replies) = mpsc::channel();

        let worker = thread::Builder::new()
            .name("crashpin-transport".to_owned())
            .spawn(move || serve(setup, pin, queue, reply))
            .map_err(TransportError::Runtime)?;

        let ready = replies.recv().unwrap_or(Err(TransportError::WorkerStopped));

        if let Err(error) = ready {
            drop(jobs);
            let _ = worker.join();
            return Err(error);
        }

        debug!(
            url = config.url(),
            method = %config.method(),
            headers = config.headers().len(),
            pinned_certificate = config.certificate().is_some(),
            "HTTP transport ready"
        );

        Ok(Self {
            jobs: Some(jobs),
            replies,
            worker: Some(worker),
            base_url: config.url().to_owned(),
            method: config.method(),
            tls: Url::parse(config.url()).is_ok_and(|url| url.scheme() == "https"),
            pin,
        })
    }

    /// `base_url` joined with `file_name` as one percent-encoded segment.
    pub fn target_url(&self, file_name: &str) -> Result<Url, TransportError> {
        let malformed = |reason: String| TransportError::MalformedUrl {
            url: self.base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.base_url).map_err(|error| malformed(error.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransportError::UnsupportedProtocol {
                scheme: url.scheme().to_owned(),
            });
        }

        url.path_segments_mut()
            .map_err(|()| malformed("URL cannot be a base".to_owned()))?
            .pop_if_empty()
            .push(file_name);

        if url.as_str().len() > MAX_URL_LENGTH {
            return Err(malformed(format!("longer than {MAX_URL_LENGTH} bytes")));
        }

        Ok(url)
    }

    /// Arena bytes an attempt with a `body_len` body needs.
    pub fn arena_demand(&self, body_len: u64) -> usize {
        if self.tls {
            TRANSPORT_HEADROOM.saturating_add(usize::try_from(body_len).unwrap_or(usize::MAX))
        } else {
            TRANSPORT_HEADROOM
        }
    }

    fn check_headroom(&self, body_len: u64) -> Result<(), TransportError> {
        let Some(pin) = self.pin else {
            return Ok(());
        };

        let needed = self.arena_demand(body_len);
        let remaining = pin.remaining();

        if remaining < needed {
            return Err(TransportError::OutOfMemory { needed, remaining });
        }

        Ok(())
    }

    fn log_arena(&self) {
        if let Some(pin) = self.pin {
            let stats = pin.stats();
            debug!(
                remaining = pin.remaining(),
                allocations = stats.allocations,
                releases = stats.releases,
                exhaustions = stats.exhaustions,
                "Pinned arena after transfer"
            );
        }
    }
}

impl Transport for HttpTransport {
    fn admit(&self, file_name: &str, size: u64) -> Result<(), TransportError> {
        self.target_url(file_name)?;
        self.check_headroom(size)
    }

    fn send(&mut self, request: UploadRequest) -> Result<(), TransportError> {
        let url = self.target_url(&request.file_name)?;
        self.check_headroom(request.body.len() as u64)?;

        debug!(url = %url, bytes = request.body.len(), "Sending");

        let job = Job {
            method: self.method.clone(),
            url,
            body: request.body,
        };

        self.jobs
            .as_ref()
            .ok_or(TransportError::WorkerStopped)?
            .send(job)
            .map_err(|_| TransportError::WorkerStopped)?;

        let result = self
            .replies
            .recv()
            .unwrap_or(Err(TransportError::WorkerStopped));

        self.log_arena();

        result
    }
}

impl Drop for HttpTransport {
    fn drop(&mut self) {
        self.jobs = None;

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn enter(pin: Option<&'static PinnedAllocator>) -> Option<PinnedScope> {
    pin.map(PinnedAllocator::enter)
}

/// Worker body: the first reply reports the client setup, then one reply
/// per job until the job queue closes.
fn serve(
    setup: ClientSetup,
    pin: Option<&'static PinnedAllocator>,
    jobs: Receiver<Job>,
    replies: Sender<Reply>,
) {
    let _scope = enter(pin);

    let (runtime, client) = match build_client(setup) {
        Ok(built) => built,
        Err(error) => {
            let _ = replies.send(Err(error));
            return;
        }
    };

    if replies.send(Ok(())).is_err() {
        return;
    }

    for Job { method, url, body } in jobs {
        let request = client.request(method, url).body(body);

        let result = runtime.block_on(async move {
            let response = request.send().await.map_err(classify)?;
            status_result(response.status())
        });

        if replies.send(result).is_err() {
            break;
        }
    }
}

fn build_client(setup: ClientSetup) -> Result<(Runtime, Client), TransportError> {
    let runtime = Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()
        .map_err(TransportError::Runtime)?;

    let mut builder = Client::builder()
        .use_rustls_tls()
        .default_headers(setup.headers);

    if let Some(pem) = setup.certificate {
        let certificate = Certificate::from_pem(&pem).map_err(TransportError::Certificate)?;
        builder = builder
            .tls_built_in_root_certs(false)
            .add_root_certificate(certificate);
    }

    let client = {
        let _context = runtime.enter();
        builder.build().map_err(TransportError::Configuration)?
    };

    Ok((runtime, client))
}

/// Maps a final HTTP status onto the retry policy.
pub(crate) fn status_result(status: StatusCode) -> Result<(), TransportError> {
    let code = status.as_u16();

    if status.is_success() {
        Ok(())
    } else if status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
    {
        Err(TransportError::Unavailable(code))
    } else {
        Err(TransportError::Rejected(code))
    }
}

pub(crate) fn classify(error: reqwest::Error) -> TransportError {
    if error.is_builder() {
        TransportError::Configuration(error)
    } else if is_trust_failure(&error) {
        TransportError::Trust(error)
    } else if error.is_connect() {
        TransportError::Connect(error)
    } else {
        TransportError::Transfer(error)
    }
}

/// Walks the source chain looking for a certificate rejection.
///
/// tokio-rustls wraps TLS errors in `io::Error`, whose `source()` skips the
/// wrapped value, so io errors are unwrapped through `get_ref()`.
pub(crate) fn is_trust_failure(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);

    while let Some(error) = current {
        if let Some(tls) = error.downcast_ref::<rustls::Error>() {
            return matches!(
                tls,
                rustls::Error::InvalidCertificate(_)
                    | rustls::Error::NoCertificatesPresented
                    | rustls::Error::InvalidCertRevocationList(_)
                    | rustls::Error::PeerIncompatible(_)
            );
        }

        if let Some(inner) = error
            .downcast_ref::<std::io::Error>()
            .and_then(std::io::Error::get_ref)
        {
            current = Some(inner as &(dyn StdError + 'static));
            continue;
        }

        current = error.source();
    }

    false
}
