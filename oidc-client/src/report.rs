//! Single-shot validation with wall-clock timing.

use std::time::{Duration, Instant};

use crate::client::Client;
use crate::engine::ValidationEngine;
use crate::error::{ClientError, EngineCode};

/// Outcome of exactly one measured validation call.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Subject claim on success.
    pub subject: Option<String>,
    /// Failure, if any.
    pub error: Option<ClientError>,
    /// Wall-clock duration of the validation call.
    pub elapsed: Duration,
}

impl ValidationReport {
    /// True when the token validated successfully.
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Engine status code of the outcome: `0` on success, the
    /// engine's code on failure, `None` when the failure carried no
    /// engine code (`NotReady`, unknown faults).
    pub fn result_code(&self) -> Option<EngineCode> {
        match &self.error {
            None => Some(0),
            Some(err) => err.code(),
        }
    }

    /// Elapsed wall-clock time in seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Validates `token` once against a `Ready` client, measuring the
/// call's wall-clock duration.
pub fn validate_once<E: ValidationEngine>(client: &Client<E>, token: &str) -> ValidationReport {
    let begin = Instant::now();
    let outcome = client.validate_and_get_subject(token);
    let elapsed = begin.elapsed();

    match outcome {
        Ok(subject) => ValidationReport {
            subject: Some(subject),
            error: None,
            elapsed,
        },
        Err(err) => ValidationReport {
            subject: None,
            error: Some(err),
            elapsed,
        },
    }
}
