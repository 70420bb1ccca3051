// src/checker/http.rs
// =============================================================================
// This module decides whether a hostname is reachable over plain HTTP.
//
// Key functionality:
// - Makes a single HTTP GET request to http://<hostname>
// - Only an exact 200 response counts as available
// - Every failure (DNS, refused connection, timeout, 404, 500...) collapses
//   into "not available" - the caller never sees an error
//
// Rust concepts:
// - async/await: For network I/O
// - Traits: Prober lets the service run against a fake in tests
// - Enums: To represent the two link states
// =============================================================================

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use url::Url;

// Represents whether a link answered with 200 OK
//
// The serde names are the strings written to the storage file and returned
// by the API, so they must stay exactly "available" / "not available"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Availability {
    /// The host answered with HTTP 200
    #[serde(rename = "available")]
    Available,
    /// Anything else: no answer, DNS failure, timeout, non-200 status
    #[serde(rename = "not available")]
    Unavailable,
}

impl Availability {
    /// The wire/report spelling of the status
    pub fn as_str(self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::Unavailable => "not available",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Represents the result of checking a single link
//
// Once created it is never modified - it is stored as-is and later
// copied into reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStatus {
    /// The hostname exactly as it was submitted
    pub url: String,
    /// Whether it answered with 200
    pub status: Availability,
}

// Anything that can classify a hostname
//
// The returned future must be Send so the service can run inside axum
// handlers (which are spawned onto the multi-threaded tokio runtime)
pub trait Prober: Send + Sync {
    fn probe(&self, hostname: &str) -> impl Future<Output = Availability> + Send;
}

// The real prober, backed by a reqwest client
//
// We build the client once and reuse it for every probe (connection pooling)
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    /// Creates a prober whose every request gives up after `timeout`
    ///
    /// Redirects follow the reqwest default policy.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client))
    }

    /// Wraps an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Prober for HttpProber {
    async fn probe(&self, hostname: &str) -> Availability {
        // Hostnames are probed over plain HTTP, exactly as submitted
        let Some(url) = probe_url(hostname) else {
            debug!(hostname, "not a valid http URL");
            return Availability::Unavailable;
        };

        match self.client.get(url).send().await {
            Ok(response) => classify(response.status()),
            Err(e) => {
                // Timeouts, DNS errors, refused connections... all the same to us
                debug!(hostname, error = %e, "probe failed");
                Availability::Unavailable
            }
        }
    }
}

// Builds the URL we actually request for a hostname
//
// Returns None for input that can't form a valid URL (empty string, spaces...)
fn probe_url(hostname: &str) -> Option<Url> {
    Url::parse(&format!("http://{}", hostname)).ok()
}

// Maps a response status to availability
//
// Only 200 counts. 201, 204, 3xx that wasn't followed, 404, 500... are all
// "not available"
pub fn classify(status: StatusCode) -> Availability {
    if status == StatusCode::OK {
        Availability::Available
    } else {
        Availability::Unavailable
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is `let ... else`?
//    - It destructures a pattern, and runs the else block if it doesn't match
//    - The else block must leave the function (return, break, panic...)
//    - Great for "bail out early" checks without nesting
//
// 2. Why `impl Future<Output = ...> + Send` in the trait?
//    - Traits can declare async methods, but by default the compiler can't
//      promise the future is safe to move between threads
//    - Spelling out `+ Send` makes that promise part of the contract
//    - Implementations can still just write `async fn`
//
// 3. Why is the result not a Result<T, E>?
//    - Callers only care about two outcomes
//    - Every failure maps to Unavailable, so there is nothing to propagate
// -----------------------------------------------------------------------------
