//! Client-side lifecycle manager and benchmark driver for OIDC token
//! validation.
//!
//! The actual cryptographic work (issuer discovery, JWKS handling,
//! signature checks) is delegated to an engine behind the
//! [`ValidationEngine`] trait. This crate owns everything around it:
//!
//! - the lifecycle state machine ([`Client`]): insecure toggle,
//!   initialize, readiness wait, concurrent validation, teardown
//! - the error taxonomy ([`ClientError`], [`EngineError`])
//! - the concurrent benchmark driver ([`bench::run_benchmark`])
//! - the single-shot validator ([`report::validate_once`])
//!
//! A deterministic [`engine::StubEngine`] ships alongside the trait for
//! tests and for running the harness without a live issuer.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bench;
pub mod client;
pub mod engine;
pub mod error;
pub mod report;

pub use bench::{BenchmarkResult, WorkerStats, run_benchmark};
pub use client::{Client, Lifecycle};
pub use engine::{StubEngine, ValidationEngine};
pub use error::{ClientError, EngineCode, EngineError};
pub use report::{ValidationReport, validate_once};
