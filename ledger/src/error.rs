use attest_types::{Account, ProviderId, Timestamp};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("identity hash is already bound to {holder}")]
    IdentityAlreadyBound { holder: Account },

    #[error("account {account} has no {provider} stamp")]
    NoSuchStamp { account: Account, provider: ProviderId },

    #[error("history entry {attempted} is not after the latest entry {latest}")]
    OutOfOrder { latest: Timestamp, attempted: Timestamp },
}
