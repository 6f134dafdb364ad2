// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules, leaves first:
// - markdown: Pulls link and image destinations out of a markdown document
// - classify: Keeps only absolute HTTP/HTTPS destinations
// - probe: Checks one URL with retries, backoff and a per-attempt deadline
// - dispatch: Runs the probes concurrently and decides pass/fail for the run
//
// Data flow:
//   bytes -> extract_links -> classify -> Dispatcher::run -> probe (per link)
//         -> RecordSink::deliver (per record) -> aggregate result
// =============================================================================

mod classify;
mod dispatch;
mod markdown;
mod probe;

// Re-export the public API so callers can write `checker::classify()` instead
// of `checker::classify::classify()`
pub use classify::classify;
pub use dispatch::{Dispatcher, RecordSink};
pub use markdown::extract_links;
pub use probe::{build_client, LinkRecord, ProbeConfig};
