//! Fundamental types for the attestation engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! accounts, identity hashes, provider ids, timestamps, signatures, stamps, proofs
//! and the policy parameters.

pub mod address;
pub mod clock;
pub mod error;
pub mod hash;
pub mod params;
pub mod proof;
pub mod provider;
pub mod signature;
pub mod stamp;
pub mod time;

pub use address::Account;
pub use clock::{Clock, SystemClock};
pub use error::TypesError;
pub use hash::IdentityHash;
pub use params::{PolicyParams, WindowPolicy};
pub use proof::Proof;
pub use provider::ProviderId;
pub use signature::Signature;
pub use stamp::Stamp;
pub use time::{Timestamp, SECS_PER_DAY};
