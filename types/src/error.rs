//! Parse and validation errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid provider id {0:?}: expected 1-32 chars of [a-z0-9_-]")]
    InvalidProvider(String),

    #[error("invalid recovery id {0}: expected 0, 1, 27 or 28")]
    InvalidRecoveryId(u8),
}
