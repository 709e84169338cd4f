//! Single-shot token validator.
//!
//! `oidc-validate <issuer> <token>` validates one token, prints the
//! subject, validity, latency, and result code, and exits `0` on
//! success.

use clap::Parser;

use oidc_harness::cli::ValidateArgs;
use oidc_harness::runner::run_validate;
use oidc_harness::telemetry::init_tracing;

fn main() {
    let args = ValidateArgs::parse();
    init_tracing();
    std::process::exit(run_validate(&args));
}
