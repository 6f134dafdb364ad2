// src/checker/probe.rs
// =============================================================================
// This module checks if a single URL is alive by making HTTP GET requests.
//
// Key functionality:
// - Retries a failing link up to `max_retries` times, one attempt at a time
// - Sleeps a jittered backoff between attempts (never before the first)
// - Enforces a deadline on every attempt
// - Always produces exactly one LinkRecord, whatever went wrong
//
// Nothing in here returns an error. Timeouts, refused connections, 5xx
// responses and malformed URLs are all folded into the record so that one
// bad link can never take its siblings down with it.
// =============================================================================

use rand::Rng;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Upper bound (exclusive) of the random jitter added to each backoff.
const MAX_JITTER_MS: u64 = 100;

/// Knobs for one probe. Values are validated by the CLI before they get here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Deadline for each individual attempt
    pub timeout: Duration,
    /// Total number of attempts allowed, at least 1
    pub max_retries: u32,
    pub start_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            max_retries: 1,
            start_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(4),
        }
    }
}

// The outcome of probing one link
//
// Serialized with camelCase keys: location, statusCode, ok, message, attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    /// The destination exactly as written in the document
    pub location: String,
    /// Status of the last response, 0 if none was ever received
    pub status_code: u16,
    /// True iff some attempt got a status below 400
    pub ok: bool,
    pub message: String,
    /// 1-based number of attempts consumed
    pub attempt: u32,
}

// Why the latest attempt did not succeed
enum Failure {
    Timeout,
    Connect(String),
    Transport(String),
    Status(StatusCode),
}

impl Failure {
    fn from_error(error: &reqwest::Error) -> Self {
        // Check timeout first: a connect that runs past the deadline is
        // reported as a timeout, not as a connection failure.
        if error.is_timeout() {
            Failure::Timeout
        } else if error.is_connect() {
            Failure::Connect(error_chain(error))
        } else {
            Failure::Transport(error_chain(error))
        }
    }

    fn into_record(self, location: &str, attempt: u32, timeout: Duration) -> LinkRecord {
        let (status_code, message) = match self {
            Failure::Timeout => (0, format!("Request timed out after {timeout:?}")),
            Failure::Connect(cause) => (0, format!("Connection failed: {cause}")),
            Failure::Transport(cause) => (0, cause),
            Failure::Status(status) => (status.as_u16(), reason_phrase(status)),
        };

        LinkRecord {
            location: location.to_string(),
            status_code,
            ok: false,
            message,
            attempt,
        }
    }
}

// Builds the HTTP client shared by every probe in a run
//
// Redirects follow reqwest's default policy; no per-client timeout is set
// because each attempt carries its own.
pub fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("link-patrol/", env!("CARGO_PKG_VERSION")))
        .build()
}

// Computes the sleep before the next retry
//
// delay = min(start_backoff * 2 + jitter, max_backoff), jitter in [0, 100ms)
//
// The base is always start_backoff, so the delay does not grow from one
// retry to the next.
pub fn backoff_delay<R: Rng>(config: &ProbeConfig, rng: &mut R) -> Duration {
    let jitter = Duration::from_millis(rng.random_range(0..MAX_JITTER_MS));

    config
        .start_backoff
        .saturating_mul(2)
        .saturating_add(jitter)
        .min(config.max_backoff)
}

// Resolves the reachability of one URL
//
// Parameters:
//   client: shared HTTP client
//   location: the destination string from the document
//   config: timeout, retry and backoff settings
//   rng: jitter source, owned by this probe for its whole retry loop
//
// Returns: a LinkRecord describing the last attempt
pub async fn probe<R: Rng>(
    client: &Client,
    location: &str,
    config: &ProbeConfig,
    rng: &mut R,
) -> LinkRecord {
    // A URL that doesn't parse can't be requested at all. Charge it every
    // attempt so the record looks like any other exhausted probe.
    let url = match Url::parse(location) {
        Ok(url) => url,
        Err(e) => {
            warn!(location, error = %e, "malformed URL, skipping request");
            return LinkRecord {
                location: location.to_string(),
                status_code: 0,
                ok: false,
                message: format!("Malformed URL: {e}"),
                attempt: config.max_retries,
            };
        }
    };

    let mut attempt = 1;
    loop {
        let result = client
            .get(url.clone())
            .timeout(config.timeout)
            .send()
            .await;

        let failure = match result {
            Ok(response) if response.status().as_u16() < 400 => {
                let status = response.status();
                debug!(location, attempt, status = status.as_u16(), "link ok");
                return LinkRecord {
                    location: location.to_string(),
                    status_code: status.as_u16(),
                    ok: true,
                    message: reason_phrase(status),
                    attempt,
                };
            }
            Ok(response) => Failure::Status(response.status()),
            Err(e) => Failure::from_error(&e),
        };

        if attempt >= config.max_retries {
            let record = failure.into_record(location, attempt, config.timeout);
            debug!(location, attempt, message = %record.message, "link failed, retries exhausted");
            return record;
        }

        let delay = backoff_delay(config, rng);
        debug!(location, attempt, ?delay, "attempt failed, backing off");
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

// Standard phrase for a status, e.g. 404 -> "Not Found"
fn reason_phrase(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown Status")
        .to_string()
}

// Flattens an error and its causes into "outer: inner: root"
//
// Some reqwest versions already include the cause in Display, so causes
// whose text is already present are skipped.
fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}
