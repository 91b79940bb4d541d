use attest_crypto::CryptoError;
use attest_ledger::LedgerError;
use attest_policy::PolicyError;
use attest_types::{Account, ProviderId, Timestamp};
use thiserror::Error;

/// Every way a service call can fail. All failures leave state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttestationError {
    #[error("account must not be the zero address")]
    InvalidAccount,

    #[error("identity hash is already bound to {holder}")]
    IdentityConflict { holder: Account },

    #[error("proof timestamp {timestamp} is more than {max_age_secs}s away from now ({now})")]
    ProofExpired {
        timestamp: Timestamp,
        now: Timestamp,
        max_age_secs: u64,
    },

    #[error("address already verified; cannot re-verify yet (next allowed at {next_allowed})")]
    ReverificationTooSoon {
        last: Timestamp,
        next_allowed: Timestamp,
    },

    #[error("invalid proof: {0}")]
    InvalidProof(#[from] CryptoError),

    #[error("could not find this provider among your stamps ({provider})")]
    NoSuchStamp { account: Account, provider: ProviderId },

    #[error("caller {caller} is not the policy owner")]
    Unauthorized { caller: Account },

    #[error("{param} must be a positive number of days, got {value}")]
    InvalidParameter { param: &'static str, value: u32 },

    #[error("provider {0} is not registered")]
    UnknownProvider(ProviderId),

    #[error("history entry {attempted} is not after the latest entry {latest}")]
    HistoryOutOfOrder {
        latest: Timestamp,
        attempted: Timestamp,
    },
}

impl From<LedgerError> for AttestationError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::IdentityAlreadyBound { holder } => Self::IdentityConflict { holder },
            LedgerError::NoSuchStamp { account, provider } => {
                Self::NoSuchStamp { account, provider }
            }
            LedgerError::OutOfOrder { latest, attempted } => {
                Self::HistoryOutOfOrder { latest, attempted }
            }
        }
    }
}

impl From<PolicyError> for AttestationError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::Unauthorized { caller } => Self::Unauthorized { caller },
            PolicyError::InvalidParameter { param, value } => {
                Self::InvalidParameter { param, value }
            }
        }
    }
}
