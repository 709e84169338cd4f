//! Lifecycle controller and validation invoker.
//!
//! [`Client`] owns the one live engine handle and sequences it through
//! `Unstarted -> InsecureConfigured? -> Initialized -> Ready ->
//! [Validating]* -> Uninitialized`. Transitions only move forward; a
//! torn-down client cannot be revived, a fresh [`Client`] must be
//! built instead.
//!
//! Locking follows the original provider: validation takes a read
//! lock (many concurrent validations), lifecycle mutations take the
//! write lock. `uninitialize` therefore drains in-flight validations
//! before touching the engine, which keeps the controller correct even
//! for engines that are not internally thread-safe.

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::engine::ValidationEngine;
use crate::error::ClientError;

/// Lifecycle states of a [`Client`]. Forward-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Fresh client; nothing has been sent to the engine.
    Unstarted,
    /// Certificate verification bypass has been configured.
    InsecureConfigured,
    /// The engine is bound to an issuer and fetching its metadata.
    Initialized,
    /// Issuer metadata and keys are available; validation is allowed.
    Ready,
    /// The engine handle has been released.
    Uninitialized,
}

/// Lifecycle controller owning the process's validation engine handle.
pub struct Client<E> {
    engine: E,
    state: RwLock<Lifecycle>,
}

impl<E: ValidationEngine> Client<E> {
    /// Wraps an engine in a fresh, unstarted client.
    pub fn new(engine: E) -> Self {
        Client {
            engine,
            state: RwLock::new(Lifecycle::Unstarted),
        }
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        *self.state.read()
    }

    fn reject_after_teardown(&self, op: &str) -> Result<(), ClientError> {
        if *self.state.read() == Lifecycle::Uninitialized {
            return Err(ClientError::Unknown(format!(
                "{op} called on an uninitialized client"
            )));
        }
        Ok(())
    }

    /// Toggles certificate-chain verification bypass in the engine.
    ///
    /// Only meaningful before [`initialize`](Client::initialize); the
    /// engine rejects it afterwards. Intended for local development
    /// issuers only.
    pub fn set_insecure_skip_verify(&self, enabled: bool) -> Result<(), ClientError> {
        self.reject_after_teardown("set_insecure_skip_verify")?;
        self.engine
            .set_insecure_skip_verify(enabled)
            .map_err(ClientError::Engine)?;

        let mut state = self.state.write();
        if *state == Lifecycle::Unstarted {
            *state = Lifecycle::InsecureConfigured;
        }
        if enabled {
            warn!("certificate verification is disabled - this is insecure");
        }
        Ok(())
    }

    /// Binds the engine to `issuer` and starts metadata discovery.
    ///
    /// Exactly one successful call is allowed; the engine rejects
    /// malformed issuers and double initialization with its own codes.
    pub fn initialize(&self, issuer: &str) -> Result<(), ClientError> {
        self.reject_after_teardown("initialize")?;
        debug!(issuer, "initializing validation engine");
        self.engine
            .initialize(issuer)
            .map_err(ClientError::Engine)?;

        let mut state = self.state.write();
        if matches!(*state, Lifecycle::Unstarted | Lifecycle::InsecureConfigured) {
            *state = Lifecycle::Initialized;
        }
        debug!(issuer, "validation engine initialized");
        Ok(())
    }

    /// Blocks until the engine is ready to validate tokens or the
    /// timeout elapses.
    ///
    /// Must follow a successful [`initialize`](Client::initialize); on
    /// success the client enters `Ready` and
    /// [`validate_and_get_subject`](Client::validate_and_get_subject)
    /// becomes available.
    pub fn wait_until_ready(&self, timeout: Duration) -> Result<(), ClientError> {
        self.reject_after_teardown("wait_until_ready")?;
        debug!(?timeout, "waiting for engine readiness");
        // The engine call blocks; no lock is held so teardown stays
        // possible from another thread.
        self.engine
            .wait_until_ready(timeout)
            .map_err(ClientError::Engine)?;

        let mut state = self.state.write();
        if *state == Lifecycle::Initialized {
            *state = Lifecycle::Ready;
        }
        info!("validation engine ready");
        Ok(())
    }

    /// Validates `token` and returns its subject claim.
    ///
    /// Thread-safe once the client is `Ready`; any number of callers
    /// may validate concurrently. Engine rejections map 1:1 to
    /// [`ClientError::Validation`]; a panic inside the engine is
    /// caught and surfaced as [`ClientError::Unknown`]. Outside
    /// `Ready` the call fails fast with [`ClientError::NotReady`].
    pub fn validate_and_get_subject(&self, token: &str) -> Result<String, ClientError> {
        let state = self.state.read();
        if *state != Lifecycle::Ready {
            return Err(ClientError::NotReady);
        }
        // Read lock stays held across the engine call so teardown
        // cannot release the handle underneath us.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.engine.validate_token(token)));
        drop(state);

        match outcome {
            Ok(Ok(subject)) => Ok(subject),
            Ok(Err(err)) => Err(ClientError::Validation(err)),
            Err(payload) => Err(ClientError::Unknown(panic_message(payload.as_ref()))),
        }
    }

    /// Releases the engine handle, best-effort.
    ///
    /// Safe to call from any state, including after failed lifecycle
    /// steps; repeated calls after a clean teardown are a no-op. An
    /// engine teardown failure is reported but the client still ends
    /// up `Uninitialized`.
    pub fn uninitialize(&self) -> Result<(), ClientError> {
        let mut state = self.state.write();
        let result = match *state {
            Lifecycle::Uninitialized => {
                debug!("uninitialize called again, nothing to do");
                return Ok(());
            }
            // Never initialized successfully; the engine holds nothing.
            Lifecycle::Unstarted | Lifecycle::InsecureConfigured => Ok(()),
            Lifecycle::Initialized | Lifecycle::Ready => {
                self.engine.uninitialize().map_err(ClientError::Engine)
            }
        };
        *state = Lifecycle::Uninitialized;

        match result {
            Ok(()) => {
                debug!("validation engine uninitialized");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "engine teardown failed");
                Err(err)
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "engine panicked".to_string()
    }
}
