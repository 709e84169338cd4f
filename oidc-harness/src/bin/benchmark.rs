//! Concurrent validation throughput benchmark.
//!
//! `oidc-benchmark <issuer> <token>` hammers the validation engine
//! from one worker thread per processing unit and reports elapsed
//! time and operations per second.

use clap::Parser;

use oidc_harness::cli::BenchmarkArgs;
use oidc_harness::runner::run_benchmark_cmd;
use oidc_harness::telemetry::init_tracing;

fn main() {
    let args = BenchmarkArgs::parse();
    init_tracing();
    std::process::exit(run_benchmark_cmd(&args));
}
