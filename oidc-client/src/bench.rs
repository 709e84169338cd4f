//! Concurrent throughput benchmark against a ready validation client.
//!
//! Workers are real OS threads: the point of the measurement is true
//! concurrent pressure on the shared engine handle, not cooperative
//! scheduling. Each worker keeps private counters and the driver only
//! merges them after every worker has joined, so the run itself needs
//! no locks around the statistics.

use std::num::NonZeroUsize;
use std::thread;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::client::Client;
use crate::engine::ValidationEngine;
use crate::error::ClientError;

/// Default iterations per worker; large enough for a stable
/// throughput figure.
pub const DEFAULT_ITERATIONS: u64 = 100_000;

/// Floor for the elapsed time used in rate computation, so a trivial
/// run can never divide by zero.
const MIN_ELAPSED_SECONDS: f64 = 1e-9;

/// Default worker count: one per available processing unit.
pub fn default_worker_count() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Counters owned by a single worker during the run.
///
/// `failure_count` covers every non-success outcome; the subset that
/// did not come from the engine's defined error path (panics,
/// `NotReady`) is additionally tracked in `unknown_count` so failure
/// rates can be read with and without unexpected faults.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct WorkerStats {
    /// Worker identifier, 1-based.
    pub worker_id: usize,
    /// Validations that returned a subject.
    pub success_count: u64,
    /// Validations that returned any error.
    pub failure_count: u64,
    /// Failures outside the engine's defined error path.
    pub unknown_count: u64,
}

/// Aggregate outcome of a benchmark run, derived once after the join
/// barrier.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    /// Workers that took part in the run.
    pub worker_count: usize,
    /// Sequential validations performed by each worker.
    pub iterations_per_worker: u64,
    /// Successful validations across all workers.
    pub total_success: u64,
    /// Failed validations across all workers.
    pub total_failure: u64,
    /// Failures outside the engine's defined error path.
    pub total_unknown: u64,
    /// Wall-clock time from dispatch to join, in seconds.
    pub elapsed_seconds: f64,
    /// Validations per second; zero when no operations ran.
    pub ops_per_second: f64,
    /// Per-worker counters, in worker order.
    pub per_worker: Vec<WorkerStats>,
}

impl BenchmarkResult {
    /// Total operations dispatched in the run.
    pub fn total_operations(&self) -> u64 {
        self.total_success + self.total_failure
    }
}

/// Runs `workers * iterations_per_worker` validations of `token`
/// against a `Ready` client and reports aggregate throughput.
///
/// Blocks until every worker has finished; per-call failures never
/// abort a worker's remaining iterations. `workers` must be at least
/// one.
pub fn run_benchmark<E: ValidationEngine>(
    client: &Client<E>,
    workers: usize,
    iterations_per_worker: u64,
    token: &str,
) -> Result<BenchmarkResult, ClientError> {
    if workers == 0 {
        return Err(ClientError::Unknown(
            "benchmark requires at least one worker".to_string(),
        ));
    }

    info!(workers, iterations_per_worker, "starting benchmark");
    let started = Instant::now();

    let stats: Vec<WorkerStats> = thread::scope(|scope| {
        let handles: Vec<_> = (1..=workers)
            .map(|id| scope.spawn(move || worker_loop(client, id, iterations_per_worker, token)))
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(idx, handle)| {
                handle.join().unwrap_or_else(|_| {
                    // The loop itself never panics; treat a lost worker
                    // as all-unknown so counters still add up.
                    error!(worker = idx + 1, "benchmark worker panicked");
                    WorkerStats {
                        worker_id: idx + 1,
                        success_count: 0,
                        failure_count: iterations_per_worker,
                        unknown_count: iterations_per_worker,
                    }
                })
            })
            .collect()
    });

    let elapsed_seconds = started.elapsed().as_secs_f64();
    let total_success: u64 = stats.iter().map(|s| s.success_count).sum();
    let total_failure: u64 = stats.iter().map(|s| s.failure_count).sum();
    let total_unknown: u64 = stats.iter().map(|s| s.unknown_count).sum();
    let total_ops = total_success + total_failure;
    let ops_per_second = if total_ops == 0 {
        0.0
    } else {
        total_ops as f64 / elapsed_seconds.max(MIN_ELAPSED_SECONDS)
    };

    info!(
        total_success,
        total_failure, elapsed_seconds, ops_per_second, "benchmark finished"
    );

    Ok(BenchmarkResult {
        worker_count: workers,
        iterations_per_worker,
        total_success,
        total_failure,
        total_unknown,
        elapsed_seconds,
        ops_per_second,
        per_worker: stats,
    })
}

fn worker_loop<E: ValidationEngine>(
    client: &Client<E>,
    id: usize,
    iterations: u64,
    token: &str,
) -> WorkerStats {
    debug!(worker = id, "worker started");

    let mut stats = WorkerStats {
        worker_id: id,
        ..WorkerStats::default()
    };
    for _ in 0..iterations {
        match client.validate_and_get_subject(token) {
            Ok(_) => stats.success_count += 1,
            Err(err) if err.is_validation() => {
                debug!(worker = id, error = %err, "validation failed");
                stats.failure_count += 1;
            }
            Err(err) => {
                error!(worker = id, error = %err, "unexpected validation fault");
                stats.failure_count += 1;
                stats.unknown_count += 1;
            }
        }
    }

    debug!(
        worker = id,
        success = stats.success_count,
        failed = stats.failure_count,
        "worker done"
    );
    stats
}
