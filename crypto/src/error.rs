use attest_types::Account;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("signature recovers to {recovered}, expected {expected}")]
    SignerMismatch { expected: Account, recovered: Account },

    #[error("invalid private key: {0}")]
    InvalidKey(String),
}
