//! Signed proof handed out by the issuer and consumed by `verify_address`.

use crate::{Account, IdentityHash, ProviderId, Signature, Timestamp};
use serde::{Deserialize, Serialize};

/// A signed, time-stamped claim binding an account to an identity hash for a
/// provider. Proofs are never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub account: Account,
    pub identity_hash: IdentityHash,
    pub timestamp: Timestamp,
    pub provider_id: ProviderId,
    pub signature: Signature,
}
