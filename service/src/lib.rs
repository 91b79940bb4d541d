//! The attestation service.
//!
//! Ties the signature verifier, the policy store, the stamp ledger and the
//! membership registry into the caller-facing API: verify an issuer-signed
//! proof and record a stamp, drop a stamp, and query stamps now or as of a
//! past instant.

pub mod config;
pub mod error;
pub mod service;

pub use attest_types::{Clock, SystemClock};
pub use config::{ConfigError, ServiceConfig};
pub use error::AttestationError;
pub use service::AttestationService;
