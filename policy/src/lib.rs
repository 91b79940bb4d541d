//! Owner-gated policy parameters.
//!
//! Two values govern the engine: how many days a verification stays valid for
//! point-in-time queries, and how many days must pass before the same provider
//! can be reverified. Only the configured owner may change them, and changes
//! take effect immediately for every later read and write.

pub mod error;
pub mod param;
pub mod store;

pub use error::PolicyError;
pub use param::PolicyParam;
pub use store::PolicyStore;
