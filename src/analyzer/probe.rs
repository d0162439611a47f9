// src/analyzer/probe.rs
// =============================================================================
// This module checks whether links are reachable.
//
// Key functionality:
// - Makes HTTP HEAD requests (lightweight, no body download)
// - Treats 2xx and 3xx answers as reachable, everything else as not
// - Runs a fixed pool of 10 workers that pull URLs from a shared queue
// - Honors a CancellationToken: once cancelled, every remaining URL is
//   counted as inaccessible and the call returns right away
//
// Only the NUMBER of inaccessible links leaves this module. A link that
// cannot be probed (bad URL, DNS failure, timeout...) just adds one to it.
//
// Rust concepts:
// - tokio::spawn: Running workers as independent async tasks
// - Arc<Mutex<..>>: Sharing the job queue between tasks
// - mpsc channels: Each worker sends its results to one receiver
// - tokio::select!: Racing a request against cancellation
// =============================================================================

use futures::future::join_all;
use reqwest::Client;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Upper bound on probes in flight at the same time
pub const MAX_CONCURRENT_PROBES: usize = 10;

// Decides if a status code means "reachable"
//
// HTTP status codes:
// - 100-199: Informational  -> not reachable
// - 200-299: Success        -> reachable
// - 300-399: Redirect       -> reachable
// - 400-599: Client/server errors -> not reachable
pub fn is_accessible_status(status: u16) -> bool {
    (200..400).contains(&status)
}

// Probes a single URL with a HEAD request
//
// Parameters:
//   client: shared HTTP client (its connection pool is reused)
//   url: the URL to probe
//   cancel: the analysis-wide cancellation token
//
// Returns: true if the link answered with a 2xx/3xx status
pub async fn probe_link(client: &Client, url: &str, cancel: &CancellationToken) -> bool {
    if cancel.is_cancelled() {
        return false;
    }

    // Building the request fails for malformed URLs
    let request = match client.head(url).build() {
        Ok(request) => request,
        Err(e) => {
            debug!(url, error = %e, "could not build probe request");
            return false;
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(url, "probe cancelled");
            false
        }
        result = client.execute(request) => match result {
            Ok(response) => {
                let status = response.status().as_u16();
                // Dropping the response releases its body and connection
                drop(response);
                debug!(url, status, "probe finished");
                is_accessible_status(status)
            }
            Err(e) => {
                debug!(url, error = %e, "probe failed");
                false
            }
        },
    }
}

// Counts how many URLs are inaccessible
//
// Spawns min(10, urls.len()) workers. Each worker repeatedly takes the next
// URL from the shared queue, probes it, and sends true/false down the results
// channel. When the queue is empty the workers exit; we join them all and
// then tally the results.
//
// Returns: number of URLs that failed their probe (0 for an empty list)
pub async fn count_inaccessible(
    client: &Client,
    urls: Vec<String>,
    cancel: &CancellationToken,
) -> usize {
    if urls.is_empty() {
        return 0;
    }

    let total = urls.len();
    let queue = Arc::new(Mutex::new(VecDeque::from(urls)));

    // The channel holds one slot per URL, so workers never wait on send
    let (results_tx, mut results_rx) = mpsc::channel::<bool>(total);

    let worker_count = MAX_CONCURRENT_PROBES.min(total);
    let workers: Vec<_> = (0..worker_count)
        .map(|worker_id| {
            let client = client.clone();
            let queue = queue.clone();
            let results_tx = results_tx.clone();
            let cancel = cancel.clone();

            tokio::spawn(async move {
                loop {
                    // Hold the lock only long enough to pop one URL
                    let next = queue.lock().await.pop_front();
                    let Some(url) = next else {
                        break;
                    };

                    let accessible = probe_link(&client, &url, &cancel).await;
                    if results_tx.send(accessible).await.is_err() {
                        break;
                    }
                }
                debug!(worker_id, "probe worker finished");
            })
        })
        .collect();

    // Drop our own sender so the channel closes once every worker is done
    drop(results_tx);

    for joined in join_all(workers).await {
        if let Err(e) = joined {
            warn!(error = %e, "probe worker stopped early");
        }
    }

    let mut received = 0;
    let mut inaccessible = 0;
    while let Some(accessible) = results_rx.recv().await {
        received += 1;
        if !accessible {
            inaccessible += 1;
        }
    }

    // A worker that died took its outcomes with it; those links were never
    // confirmed reachable
    if received < total {
        warn!(missing = total - received, "some probe outcomes were lost");
        inaccessible += total - received;
    }

    inaccessible
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a worker pool instead of one task per link?
//    - A page can have hundreds of links
//    - 10 workers means at most 10 requests are in flight at once
//    - Each worker handles its links one after another
//
// 2. What is Arc<Mutex<VecDeque<String>>>?
//    - VecDeque: the queue of URLs still waiting to be probed
//    - Mutex: only one worker can pop from it at a time
//    - Arc: lets every worker task own a handle to the same queue
//
// 3. What is an mpsc channel?
//    - "multi-producer, single-consumer"
//    - Every worker has a Sender clone; we keep the one Receiver
//    - recv() returns None once all Senders are dropped
//
// 4. What does tokio::select! do?
//    - Waits on several futures and runs the branch of whichever finishes
//      first; the other futures are dropped (which cancels them)
//    - `biased;` checks branches top to bottom, so an already-cancelled
//      token always wins
//
// 5. What is CancellationToken?
//    - A cheap, cloneable "stop" flag from tokio-util
//    - cancel() on any clone wakes everyone waiting on cancelled()
// -----------------------------------------------------------------------------
