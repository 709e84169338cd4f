//! End-to-end lifecycle scenarios against the stub engine.

use std::thread;
use std::time::Duration;

use oidc_client::engine::stub::status;
use oidc_client::{Client, ClientError, Lifecycle, StubEngine, validate_once};

const ISSUER: &str = "https://issuer.example";

#[test]
fn ready_issuer_validates_token_to_subject() {
    let client = Client::new(StubEngine::fixture());

    client.initialize(ISSUER).unwrap();
    client.wait_until_ready(Duration::from_secs(10)).unwrap();

    let report = validate_once(&client, "valid-token");
    assert_eq!(report.subject.as_deref(), Some("user123"));
    assert!(report.is_valid());
    assert_eq!(report.result_code(), Some(0));

    client.uninitialize().unwrap();
}

#[test]
fn expired_token_surfaces_the_engine_code() {
    let client = Client::new(StubEngine::fixture());
    client.initialize(ISSUER).unwrap();
    client.wait_until_ready(Duration::from_secs(10)).unwrap();

    let report = validate_once(&client, "expired-token");
    assert!(!report.is_valid());
    assert_eq!(report.result_code(), Some(0x1001));
    assert_eq!(report.result_code(), Some(status::TOKEN_EXPIRED));

    client.uninitialize().unwrap();
}

#[test]
fn validate_before_ready_always_yields_not_ready() {
    let client = Client::new(StubEngine::fixture());
    assert_eq!(
        client.validate_and_get_subject("valid-token"),
        Err(ClientError::NotReady)
    );

    client.initialize(ISSUER).unwrap();
    assert_eq!(
        client.validate_and_get_subject("valid-token"),
        Err(ClientError::NotReady)
    );
}

#[test]
fn wait_before_initialize_fails_with_engine_code() {
    let client = Client::new(StubEngine::fixture());
    match client.wait_until_ready(Duration::from_secs(1)) {
        Err(ClientError::Engine(err)) => assert_eq!(err.code, status::NOT_INITIALIZED),
        other => panic!("expected engine error, got {other:?}"),
    }
}

#[test]
fn readiness_timeout_is_classified() {
    let client = Client::new(StubEngine::fixture().ready_delay(Duration::from_secs(60)));
    client.initialize(ISSUER).unwrap();

    match client.wait_until_ready(Duration::from_millis(5)) {
        Err(ClientError::Engine(err)) => assert_eq!(err.code, status::TIMEOUT),
        other => panic!("expected timeout, got {other:?}"),
    }

    // Lifecycle errors still allow best-effort teardown.
    client.uninitialize().unwrap();
    assert_eq!(client.lifecycle(), Lifecycle::Uninitialized);
}

#[test]
fn double_initialize_is_rejected() {
    let client = Client::new(StubEngine::fixture());
    client.initialize(ISSUER).unwrap();

    match client.initialize(ISSUER) {
        Err(ClientError::Engine(err)) => assert_eq!(err.code, status::ALREADY_INITIALIZED),
        other => panic!("expected engine error, got {other:?}"),
    }
}

#[test]
fn insecure_toggle_only_before_initialize() {
    let client = Client::new(StubEngine::fixture());
    client.set_insecure_skip_verify(true).unwrap();
    client.initialize(ISSUER).unwrap();

    match client.set_insecure_skip_verify(false) {
        Err(ClientError::Engine(err)) => assert_eq!(err.code, status::ALREADY_INITIALIZED),
        other => panic!("expected engine error, got {other:?}"),
    }
}

#[test]
fn repeated_uninitialize_is_a_benign_no_op() {
    let client = Client::new(StubEngine::fixture());
    client.initialize(ISSUER).unwrap();
    client.wait_until_ready(Duration::from_secs(10)).unwrap();

    client.uninitialize().unwrap();
    client.uninitialize().unwrap();
    client.uninitialize().unwrap();

    assert_eq!(
        client.validate_and_get_subject("valid-token"),
        Err(ClientError::NotReady)
    );
}

#[test]
fn teardown_after_failed_initialize_is_safe() {
    let client = Client::new(StubEngine::fixture());
    assert!(client.initialize("not a url").is_err());

    // Nothing was initialized; cleanup must still be harmless.
    client.uninitialize().unwrap();
    assert_eq!(client.lifecycle(), Lifecycle::Uninitialized);
}

#[test]
fn teardown_drains_in_flight_validations() {
    let client = Client::new(StubEngine::fixture());
    client.initialize(ISSUER).unwrap();
    client.wait_until_ready(Duration::from_secs(10)).unwrap();

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let mut torn_down = false;
                for _ in 0..500 {
                    match client.validate_and_get_subject("valid-token") {
                        Ok(subject) => {
                            assert_eq!(subject, "user123");
                            // Forward-only: once the client reports
                            // NotReady it can never validate again.
                            assert!(!torn_down, "validation succeeded after teardown");
                        }
                        Err(ClientError::NotReady) => torn_down = true,
                        Err(other) => panic!("unexpected error during teardown race: {other:?}"),
                    }
                }
            });
        }
        scope.spawn(|| {
            thread::sleep(Duration::from_millis(1));
            client.uninitialize().unwrap();
        });
    });

    assert_eq!(client.lifecycle(), Lifecycle::Uninitialized);
    assert_eq!(
        client.validate_and_get_subject("valid-token"),
        Err(ClientError::NotReady)
    );
}

#[test]
fn concurrent_validation_is_consistent() {
    let client = Client::new(StubEngine::fixture());
    client.initialize(ISSUER).unwrap();
    client.wait_until_ready(Duration::from_secs(10)).unwrap();

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..200 {
                    // Same token, same engine state: same outcome.
                    let subject = client.validate_and_get_subject("valid-token").unwrap();
                    assert_eq!(subject, "user123");
                }
            });
        }
    });

    client.uninitialize().unwrap();
}
