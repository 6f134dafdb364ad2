// src/checker/dispatch.rs
// =============================================================================
// Fans the classified links out to concurrent probes and collects the
// outcome of the whole run.
//
// Every link gets its own future running `probe`. The futures are driven
// together through a `buffer_unordered` stream, so a slow link never holds
// up a fast one, and the call only returns once every probe has finished.
// There is no early exit: a failing link doesn't cancel its siblings.
//
// The sink and the failure flag live behind one mutex, locked once per
// delivered record. Records arrive in completion order, not document order.
// =============================================================================

use futures::stream::{self, StreamExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::Client;
use std::num::NonZeroUsize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::probe::{probe, LinkRecord, ProbeConfig};
use crate::error::DispatchError;

/// Receives each record as soon as its probe completes.
///
/// Implementations don't need to be thread-safe; the dispatcher serializes
/// every call. They must not block indefinitely.
pub trait RecordSink {
    fn deliver(&mut self, record: &LinkRecord) -> std::io::Result<()>;
}

impl RecordSink for Vec<LinkRecord> {
    fn deliver(&mut self, record: &LinkRecord) -> std::io::Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

// Everything the probes share, guarded as a unit
struct Delivery<'a, S> {
    sink: &'a mut S,
    failed: usize,
    delivered: usize,
    sink_error: Option<std::io::Error>,
}

impl<S: RecordSink> Delivery<'_, S> {
    fn accept(&mut self, record: LinkRecord) {
        // Transport failures (status 0) count as broken, same as >= 400.
        if !record.ok {
            self.failed += 1;
        }

        match self.sink.deliver(&record) {
            Ok(()) => self.delivered += 1,
            Err(e) => {
                warn!(location = %record.location, error = %e, "failed to write link record");
                self.sink_error.get_or_insert(e);
            }
        }
    }
}

pub struct Dispatcher {
    client: Client,
    config: ProbeConfig,
    errors_ok: bool,
    concurrency: Option<NonZeroUsize>,
    seed: Option<u64>,
}

impl Dispatcher {
    pub fn new(client: Client, config: ProbeConfig, errors_ok: bool) -> Self {
        Self {
            client,
            config,
            errors_ok,
            concurrency: None,
            seed: None,
        }
    }

    /// Caps how many probes may be in flight at once. Unbounded by default.
    pub fn with_concurrency(mut self, limit: Option<NonZeroUsize>) -> Self {
        self.concurrency = limit;
        self
    }

    /// Makes backoff jitter reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    // Probes every link and reports each record to `sink`
    //
    // Returns:
    //   Ok(()) if every link was fine, or failures are tolerated (errors_ok)
    //   Err(LinksFailed) if some link failed and errors aren't tolerated
    //   Err(Sink) if the sink failed to write a record, regardless of errors_ok
    pub async fn run<S: RecordSink>(
        &self,
        links: Vec<String>,
        sink: &mut S,
    ) -> Result<(), DispatchError> {
        if links.is_empty() {
            info!("no links to check");
            return Ok(());
        }

        let total = links.len();
        let limit = self
            .concurrency
            .map(NonZeroUsize::get)
            .unwrap_or(total)
            .min(total);
        info!(links = total, concurrency = limit, "checking links");

        // One independent jitter stream per probe, derived up front so the
        // assignment doesn't depend on completion order.
        let mut master = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let jobs: Vec<(String, StdRng)> = links
            .into_iter()
            .map(|link| (link, StdRng::seed_from_u64(master.random())))
            .collect();

        let state = Mutex::new(Delivery {
            sink,
            failed: 0,
            delivered: 0,
            sink_error: None,
        });
        let shared = &state;
        let client = &self.client;
        let config = &self.config;

        stream::iter(jobs)
            .map(move |(link, mut rng)| async move {
                let record = probe(client, &link, config, &mut rng).await;
                shared.lock().await.accept(record);
            })
            .buffer_unordered(limit)
            .for_each(|()| async {})
            .await;

        let Delivery {
            failed,
            delivered,
            sink_error,
            ..
        } = state.into_inner();
        info!(links = total, delivered, failed, "finished checking links");

        if let Some(e) = sink_error {
            return Err(DispatchError::Sink(e));
        }
        if failed > 0 && !self.errors_ok {
            return Err(DispatchError::LinksFailed);
        }
        Ok(())
    }
}
