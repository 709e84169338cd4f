//! Argument parsing for the harness binaries.

use clap::Parser;

/// Single-shot token validation with latency measurement.
#[derive(Parser, Debug)]
#[command(name = "oidc-validate", version, about)]
pub struct ValidateArgs {
    /// Issuer URL/identifier to validate against.
    #[arg(default_value = "")]
    pub issuer: String,

    /// Bearer token to validate.
    #[arg(default_value = "")]
    pub token: String,

    /// Seconds to wait for engine readiness.
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Keep TLS certificate verification enabled. The harness targets
    /// local development issuers and disables verification by default.
    #[arg(long)]
    pub verify_tls: bool,

    /// Emit the report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

/// Concurrent validation throughput benchmark.
#[derive(Parser, Debug)]
#[command(name = "oidc-benchmark", version, about)]
pub struct BenchmarkArgs {
    /// Issuer URL/identifier to validate against.
    #[arg(default_value = "")]
    pub issuer: String,

    /// Bearer token validated on every iteration.
    #[arg(default_value = "")]
    pub token: String,

    /// Seconds to wait for engine readiness.
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Worker threads; defaults to the available processing units.
    #[arg(long)]
    pub workers: Option<usize>,

    /// Validations performed by each worker.
    #[arg(long, default_value_t = oidc_client::bench::DEFAULT_ITERATIONS)]
    pub iterations: u64,

    /// Keep TLS certificate verification enabled.
    #[arg(long)]
    pub verify_tls: bool,

    /// Emit the result as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}
