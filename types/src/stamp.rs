//! Stamp: a provider-scoped attestation with an append-only history.

use crate::{IdentityHash, ProviderId, Timestamp};
use serde::{Deserialize, Serialize};

/// A stamp as returned to callers.
///
/// `history` is strictly increasing. Point-in-time reads return a copy whose
/// history is truncated to the entries at or before the query instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    pub provider_id: ProviderId,
    pub identity_hash: IdentityHash,
    pub history: Vec<Timestamp>,
}

impl Stamp {
    /// Most recent verification, if any.
    pub fn last_verified(&self) -> Option<Timestamp> {
        self.history.last().copied()
    }

    /// First verification, if any.
    pub fn first_verified(&self) -> Option<Timestamp> {
        self.history.first().copied()
    }
}
