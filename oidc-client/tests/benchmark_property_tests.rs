//! Property tests for benchmark count conservation and rate guards.

use std::time::Duration;

use proptest::prelude::*;

use oidc_client::engine::stub::status;
use oidc_client::{Client, StubEngine, run_benchmark};

fn ready_client() -> Client<StubEngine> {
    let engine = StubEngine::fixture().reject("bad-signature", status::TOKEN_INVALID_SIGNATURE);
    let client = Client::new(engine);
    client
        .initialize("https://issuer.example")
        .expect("initialize stub");
    client
        .wait_until_ready(Duration::from_secs(1))
        .expect("stub readiness");
    client
}

fn arb_token() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("valid-token"),
        Just("expired-token"),
        Just("bad-signature"),
        Just("never-configured"),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// For any worker/iteration combination, every dispatched
    /// operation is accounted exactly once:
    /// `total_success + total_failure == workers * iterations`.
    #[test]
    fn counts_are_conserved(
        workers in 1usize..=8,
        iterations in 0u64..=64,
        token in arb_token(),
    ) {
        let client = ready_client();
        let result = run_benchmark(&client, workers, iterations, token).unwrap();

        prop_assert_eq!(
            result.total_success + result.total_failure,
            workers as u64 * iterations
        );
        prop_assert!(result.total_unknown <= result.total_failure);
    }

    /// A run against a single fixed token is all-success or
    /// all-failure; outcomes never depend on the worker.
    #[test]
    fn outcome_is_uniform_per_token(
        workers in 1usize..=4,
        iterations in 1u64..=32,
        token in arb_token(),
    ) {
        let client = ready_client();
        let result = run_benchmark(&client, workers, iterations, token).unwrap();

        let total = workers as u64 * iterations;
        if token == "valid-token" {
            prop_assert_eq!(result.total_success, total);
        } else {
            prop_assert_eq!(result.total_failure, total);
            // Engine-defined rejections never count as unknown faults.
            prop_assert_eq!(result.total_unknown, 0);
        }
    }

    /// The throughput figure is strictly positive whenever work was
    /// done, and exactly zero for the trivial run.
    #[test]
    fn rate_is_guarded(workers in 1usize..=4, iterations in 0u64..=32) {
        let client = ready_client();
        let result = run_benchmark(&client, workers, iterations, "valid-token").unwrap();

        prop_assert!(result.elapsed_seconds >= 0.0);
        if iterations == 0 {
            prop_assert_eq!(result.ops_per_second, 0.0);
        } else {
            prop_assert!(result.ops_per_second > 0.0);
        }
    }
}
