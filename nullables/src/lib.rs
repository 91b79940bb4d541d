//! Nullable infrastructure for deterministic testing.
//!
//! Everything the engine reads from the outside world (the clock, the
//! issuer's signing key) has a test-friendly stand-in here:
//! - time only moves when told to
//! - keys are fixed, so accounts and signatures are reproducible
//!
//! Usage: build the service with a [`NullClock`] and mint proofs with
//! [`fixed_issuer`].

pub mod clock;
pub mod keys;

pub use clock::NullClock;
pub use keys::{fixed_issuer, fixed_key, fixed_owner, other_signer};
