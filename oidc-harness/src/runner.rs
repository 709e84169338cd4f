//! Lifecycle bootstrap, report printing, and exit-code mapping.
//!
//! Both binaries follow the same shape: bring the client up (insecure
//! toggle, initialize, readiness wait), run their workload, then tear
//! the engine down best-effort. Lifecycle failures abort immediately
//! after the teardown attempt; a teardown failure never turns a
//! successful run into a process failure.

use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use oidc_client::{
    Client, StubEngine, ValidationEngine, ValidationReport, run_benchmark, validate_once,
};

use crate::cli::{BenchmarkArgs, ValidateArgs};

/// Process exit status for a successful run.
pub const EXIT_SUCCESS: i32 = 0;
/// Process exit status for any lifecycle or validation failure.
pub const EXIT_FAILURE: i32 = 1;

/// Builds the client driven by the binaries.
///
/// A production deployment links a real engine by implementing
/// `ValidationEngine` and swapping this constructor; the deterministic
/// stub keeps the harness runnable without a live issuer.
fn build_client() -> Client<StubEngine> {
    Client::new(StubEngine::fixture())
}

/// Brings the client to `Ready`. On failure the returned message is
/// already phrased for the `> Error:` report line.
fn bootstrap<E: ValidationEngine>(
    client: &Client<E>,
    issuer: &str,
    timeout: Duration,
    insecure: bool,
) -> Result<(), String> {
    if insecure {
        client
            .set_insecure_skip_verify(true)
            .map_err(|err| format!("insecure_skip_verify failed: {err}"))?;
    }
    client
        .initialize(issuer)
        .map_err(|err| format!("initialize failed: {err}"))?;
    client
        .wait_until_ready(timeout)
        .map_err(|err| format!("failed to get ready in time: {err}"))?;
    Ok(())
}

/// Best-effort teardown; failures are reported, never escalated.
fn teardown<E: ValidationEngine>(client: &Client<E>) {
    if let Err(err) = client.uninitialize() {
        eprintln!("> Error: failed to uninitialize: {err}");
    }
}

/// Result code column of the single-shot report: `0x0` on success,
/// the engine code in hex on failure, the error text when the failure
/// carried no engine code.
fn format_result_code(report: &ValidationReport) -> String {
    match (report.result_code(), &report.error) {
        (Some(code), _) => format!("0x{code:x}"),
        (None, Some(err)) => err.to_string(),
        (None, None) => "0x0".to_string(),
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(encoded) => println!("{encoded}"),
        Err(err) => warn!(error = %err, "failed to encode JSON report"),
    }
}

#[derive(Serialize)]
struct ValidateOutput {
    subject: Option<String>,
    valid: bool,
    result_code: Option<u64>,
    error: Option<String>,
    elapsed_seconds: f64,
}

/// Measures one validation and maps the outcome to an exit status.
pub fn run_validate(args: &ValidateArgs) -> i32 {
    run_validate_with(&build_client(), args)
}

fn run_validate_with<E: ValidationEngine>(client: &Client<E>, args: &ValidateArgs) -> i32 {
    let timeout = Duration::from_secs(args.timeout);
    if let Err(msg) = bootstrap(client, &args.issuer, timeout, !args.verify_tls) {
        eprintln!("> Error: {msg}");
        teardown(client);
        return EXIT_FAILURE;
    }

    let report = validate_once(client, &args.token);
    teardown(client);

    if args.json {
        print_json(&ValidateOutput {
            subject: report.subject.clone(),
            valid: report.is_valid(),
            result_code: report.result_code(),
            error: report.error.as_ref().map(|err| err.to_string()),
            elapsed_seconds: report.elapsed_seconds(),
        });
    } else {
        let validity = if report.is_valid() { "valid" } else { "invalid" };
        println!(
            "> Token subject : {} -> {}",
            report.subject.as_deref().unwrap_or(""),
            validity
        );
        println!("> Time spent    : {:.6}s", report.elapsed_seconds());
        println!("> Result code   : {}", format_result_code(&report));
    }

    if report.is_valid() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    }
}

/// Runs the concurrent benchmark and reports aggregate throughput.
pub fn run_benchmark_cmd(args: &BenchmarkArgs) -> i32 {
    let client = build_client();
    let timeout = Duration::from_secs(args.timeout);
    if let Err(msg) = bootstrap(&client, &args.issuer, timeout, !args.verify_tls) {
        eprintln!("> Error: {msg}");
        teardown(&client);
        return EXIT_FAILURE;
    }

    let workers = args
        .workers
        .unwrap_or_else(oidc_client::bench::default_worker_count);
    if !args.json {
        println!(
            "> Info : using {} threads with {} runs per thread",
            workers, args.iterations
        );
    }

    let outcome = run_benchmark(&client, workers, args.iterations, &args.token);
    teardown(&client);

    match outcome {
        Ok(result) => {
            if args.json {
                print_json(&result);
            } else {
                println!("> Time : {:.6}s", result.elapsed_seconds);
                println!("> Rate : {:.6} op/s", result.ops_per_second);
            }
            EXIT_SUCCESS
        }
        Err(err) => {
            eprintln!("> Error: benchmark failed: {err}");
            EXIT_FAILURE
        }
    }
}
