//! CLI front-ends for the OIDC validation client.
//!
//! Two binaries share this crate: `oidc-validate` measures a single
//! validation and maps the outcome to the process exit status,
//! `oidc-benchmark` drives the concurrent throughput benchmark. Both
//! take the issuer and token as positional arguments and print
//! `>`-prefixed report lines.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod runner;
pub mod telemetry;
