//! The seam between this crate and the delegated OIDC engine.
//!
//! Everything cryptographic lives behind [`ValidationEngine`]: issuer
//! discovery, JWKS retrieval and caching, signature verification. The
//! lifecycle controller drives the trait and treats every returned
//! status code as opaque.

pub mod stub;

pub use stub::StubEngine;

use std::time::Duration;

use crate::error::EngineError;

/// The delegated OIDC validation engine.
///
/// Implementations must be safe to share across threads: after the
/// controller reaches `Ready`, [`validate_token`] is called
/// concurrently from the benchmark worker pool. Lifecycle methods
/// (`initialize`, `wait_until_ready`, `uninitialize`,
/// `set_insecure_skip_verify`) are only ever invoked single-threaded,
/// before workers are spawned or after they have joined.
///
/// [`validate_token`]: ValidationEngine::validate_token
pub trait ValidationEngine: Send + Sync {
    /// Toggles certificate-chain verification bypass. Intended for
    /// local development issuers only; must be called before
    /// [`initialize`](ValidationEngine::initialize).
    fn set_insecure_skip_verify(&self, enabled: bool) -> Result<(), EngineError>;

    /// Binds the engine to an issuer URL/identifier and starts
    /// fetching its metadata. Exactly one successful call is allowed
    /// per engine instance.
    fn initialize(&self, issuer: &str) -> Result<(), EngineError>;

    /// Blocks until issuer metadata and keys are available or the
    /// timeout elapses, in which case the engine's timeout status is
    /// returned.
    fn wait_until_ready(&self, timeout: Duration) -> Result<(), EngineError>;

    /// Validates a bearer token, returning its subject claim.
    fn validate_token(&self, token: &str) -> Result<String, EngineError>;

    /// Releases the engine's resources. Further validation calls are
    /// rejected.
    fn uninitialize(&self) -> Result<(), EngineError>;
}
