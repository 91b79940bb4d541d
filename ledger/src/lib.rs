//! Stamp ledger and membership registry.
//!
//! The ledger keeps, per account, at most one stamp per provider. Each stamp
//! carries an append-only, strictly increasing history of verification
//! timestamps. A global index maps `(provider, identity hash)` to the single
//! account allowed to hold it.
//!
//! The membership registry remembers every account that ever held a stamp,
//! in first-seen order. It never shrinks.
//!
//! Neither structure locks; callers serialise writes.

pub mod error;
pub mod history;
pub mod membership;
pub mod stamps;

pub use error::LedgerError;
pub use history::HistoryEntry;
pub use membership::MembershipRegistry;
pub use stamps::StampLedger;
