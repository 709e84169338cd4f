//! Error taxonomy for the validation client.
//!
//! Engine failures carry an engine-defined numeric code which this
//! crate propagates but never interprets. The [`ClientError`] enum
//! discriminates where in the lifecycle a failure happened so callers
//! can apply the right policy: lifecycle errors abort the run,
//! validation errors are local to one call, unknown errors are kept
//! out of failure-rate accounting.

use serde::Serialize;
use thiserror::Error;

/// Numeric status code as defined by a validation engine.
pub type EngineCode = u64;

/// A failure reported by the delegated validation engine.
///
/// `code` is opaque to this crate; `message` is whatever diagnostic
/// text the engine attached. Displayed with the code in hex, e.g.
/// `Token Expired Or Not Valid Yet (0x1001)`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message} (0x{code:x})")]
pub struct EngineError {
    /// Engine-defined status code.
    pub code: EngineCode,
    /// Engine-provided diagnostic text.
    pub message: String,
}

impl EngineError {
    /// Creates an engine error from a code and diagnostic text.
    pub fn new(code: EngineCode, message: impl Into<String>) -> Self {
        EngineError {
            code,
            message: message.into(),
        }
    }
}

/// Errors surfaced by the lifecycle controller and validation invoker.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// A lifecycle step (insecure toggle, initialize, readiness wait,
    /// uninitialize) failed inside the engine. Aborts the run after
    /// best-effort teardown.
    #[error("engine error: {0}")]
    Engine(EngineError),

    /// The engine rejected a token. Local to that call; sibling
    /// workers and remaining iterations continue.
    #[error("validation error: {0}")]
    Validation(EngineError),

    /// Validation was requested outside the `Ready` state. A caller
    /// precondition violation; fails fast, never panics.
    #[error("client is not ready for validation")]
    NotReady,

    /// A failure off the engine's defined error path, such as a panic
    /// inside the engine call. Never silently swallowed.
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl ClientError {
    /// Returns the engine status code when this error carries one.
    pub fn code(&self) -> Option<EngineCode> {
        match self {
            ClientError::Engine(err) | ClientError::Validation(err) => Some(err.code),
            ClientError::NotReady | ClientError::Unknown(_) => None,
        }
    }

    /// True for per-token validation failures, which never abort a run.
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}
