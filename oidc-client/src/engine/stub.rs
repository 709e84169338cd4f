//! Deterministic in-process engine for tests and offline harness runs.
//!
//! `StubEngine` implements the full lifecycle contract of a real
//! engine (issuer shape checks, double-initialization rejection,
//! readiness delay, timeout) while resolving tokens from a fixed rule
//! table instead of verifying signatures.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use url::Url;

use crate::engine::ValidationEngine;
use crate::error::{EngineCode, EngineError};

/// Status codes reported by the stub engine.
///
/// Lifecycle codes occupy `0x101..`; token-level codes occupy
/// `0x1001..`. Consumers of [`ValidationEngine`] must treat these as
/// opaque; the constants exist so tests and fixtures can construct and
/// compare exact outcomes.
pub mod status {
    use super::EngineCode;

    /// No error.
    pub const SUCCESS: EngineCode = 0x0;
    /// A failure with no more specific classification.
    pub const UNKNOWN: EngineCode = 0x101;
    /// The issuer identifier is malformed.
    pub const INVALID_ISSUER: EngineCode = 0x102;
    /// The engine is already bound to an issuer.
    pub const ALREADY_INITIALIZED: EngineCode = 0x103;
    /// The engine has not been initialized (or was torn down).
    pub const NOT_INITIALIZED: EngineCode = 0x104;
    /// Readiness was not reached within the requested timeout.
    pub const TIMEOUT: EngineCode = 0x105;
    /// The token is expired or not valid yet.
    pub const TOKEN_EXPIRED: EngineCode = 0x1001;
    /// The token is not a well-formed JWT.
    pub const TOKEN_MALFORMED: EngineCode = 0x1002;
    /// The token signature does not verify against the issuer keys.
    pub const TOKEN_INVALID_SIGNATURE: EngineCode = 0x1003;
    /// The token was rejected for any other reason.
    pub const TOKEN_VALIDATION_FAILED: EngineCode = 0x1004;

    /// Readable name for a stub status code.
    pub fn text(code: EngineCode) -> &'static str {
        match code {
            SUCCESS => "Success",
            INVALID_ISSUER => "Invalid Issuer Identifier Value",
            ALREADY_INITIALIZED => "Already Initialized",
            NOT_INITIALIZED => "Not Initialized",
            TIMEOUT => "Timeout",
            TOKEN_EXPIRED => "Token Expired Or Not Valid Yet",
            TOKEN_MALFORMED => "Malformed Token",
            TOKEN_INVALID_SIGNATURE => "Invalid Token Signature",
            TOKEN_VALIDATION_FAILED => "Token Validation Failed",
            _ => "Unknown",
        }
    }

    /// Engine error for a stub status code, with its readable name as
    /// the message.
    pub fn error(code: EngineCode) -> super::EngineError {
        super::EngineError::new(code, text(code))
    }
}

/// Per-token outcome configured on the stub.
#[derive(Debug, Clone)]
enum Rule {
    Accept(String),
    Reject(EngineCode),
}

#[derive(Debug)]
enum Phase {
    Idle,
    Running { ready_at: Instant },
}

#[derive(Debug)]
struct StubState {
    insecure: bool,
    phase: Phase,
}

/// Deterministic [`ValidationEngine`] backed by a token rule table.
///
/// Tokens without a configured rule fail with
/// [`status::TOKEN_VALIDATION_FAILED`]; the empty token fails with
/// [`status::TOKEN_MALFORMED`].
pub struct StubEngine {
    rules: HashMap<String, Rule>,
    ready_delay: Duration,
    state: Mutex<StubState>,
}

impl StubEngine {
    /// Creates a stub with an empty rule table and no readiness delay.
    pub fn new() -> Self {
        StubEngine {
            rules: HashMap::new(),
            ready_delay: Duration::ZERO,
            state: Mutex::new(StubState {
                insecure: false,
                phase: Phase::Idle,
            }),
        }
    }

    /// Stub preloaded with the canonical harness fixtures:
    /// `"valid-token"` resolves to subject `"user123"` and
    /// `"expired-token"` fails with [`status::TOKEN_EXPIRED`].
    pub fn fixture() -> Self {
        StubEngine::new()
            .accept("valid-token", "user123")
            .reject("expired-token", status::TOKEN_EXPIRED)
    }

    /// Configures `token` to validate successfully with `subject`.
    pub fn accept(mut self, token: impl Into<String>, subject: impl Into<String>) -> Self {
        self.rules
            .insert(token.into(), Rule::Accept(subject.into()));
        self
    }

    /// Configures `token` to fail with the given status code.
    pub fn reject(mut self, token: impl Into<String>, code: EngineCode) -> Self {
        self.rules.insert(token.into(), Rule::Reject(code));
        self
    }

    /// Simulated time between `initialize` and readiness.
    pub fn ready_delay(mut self, delay: Duration) -> Self {
        self.ready_delay = delay;
        self
    }

    fn check_issuer(issuer: &str, insecure: bool) -> Result<(), EngineError> {
        let parsed = Url::parse(issuer).map_err(|_| status::error(status::INVALID_ISSUER))?;
        if parsed.host_str().is_none() || parsed.scheme().is_empty() {
            return Err(status::error(status::INVALID_ISSUER));
        }
        if parsed.scheme() != "https" && !insecure {
            return Err(status::error(status::INVALID_ISSUER));
        }
        Ok(())
    }
}

impl Default for StubEngine {
    fn default() -> Self {
        StubEngine::new()
    }
}

impl ValidationEngine for StubEngine {
    fn set_insecure_skip_verify(&self, enabled: bool) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        if matches!(state.phase, Phase::Running { .. }) {
            return Err(status::error(status::ALREADY_INITIALIZED));
        }
        state.insecure = enabled;
        Ok(())
    }

    fn initialize(&self, issuer: &str) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        if matches!(state.phase, Phase::Running { .. }) {
            return Err(status::error(status::ALREADY_INITIALIZED));
        }
        Self::check_issuer(issuer, state.insecure)?;
        state.phase = Phase::Running {
            ready_at: Instant::now() + self.ready_delay,
        };
        Ok(())
    }

    fn wait_until_ready(&self, timeout: Duration) -> Result<(), EngineError> {
        let ready_at = match self.state.lock().phase {
            Phase::Idle => return Err(status::error(status::NOT_INITIALIZED)),
            Phase::Running { ready_at } => ready_at,
        };

        // Sleep outside the lock so concurrent calls are unaffected.
        let now = Instant::now();
        let remaining = ready_at.saturating_duration_since(now);
        if remaining <= timeout {
            std::thread::sleep(remaining);
            Ok(())
        } else {
            std::thread::sleep(timeout);
            Err(status::error(status::TIMEOUT))
        }
    }

    fn validate_token(&self, token: &str) -> Result<String, EngineError> {
        match self.state.lock().phase {
            Phase::Running { ready_at } if ready_at <= Instant::now() => {}
            _ => return Err(status::error(status::NOT_INITIALIZED)),
        }

        if token.is_empty() {
            return Err(status::error(status::TOKEN_MALFORMED));
        }
        match self.rules.get(token) {
            Some(Rule::Accept(subject)) => Ok(subject.clone()),
            Some(Rule::Reject(code)) => Err(status::error(*code)),
            None => Err(status::error(status::TOKEN_VALIDATION_FAILED)),
        }
    }

    fn uninitialize(&self) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        match state.phase {
            Phase::Idle => Err(status::error(status::NOT_INITIALIZED)),
            Phase::Running { .. } => {
                state.phase = Phase::Idle;
                Ok(())
            }
        }
    }
}
