use attest_types::Account;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("caller {caller} is not the policy owner")]
    Unauthorized { caller: Account },

    #[error("{param} must be a positive number of days, got {value}")]
    InvalidParameter { param: &'static str, value: u32 },
}
