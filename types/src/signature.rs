//! Recoverable secp256k1 signature in Ethereum `r || s || v` layout.

use crate::error::TypesError;
use crate::hash::decode_hex_fixed;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 65-byte recoverable signature: 32 bytes `r`, 32 bytes `s`, 1 byte `v`.
///
/// `v` is stored as received. Both the raw recovery id (0/1) and the
/// Ethereum-offset form (27/28) are accepted by [`Signature::recovery_id`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 65]);

impl Signature {
    pub const LEN: usize = 65;

    pub fn new(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }

    /// Build from compact `r || s` plus a raw recovery id (0 or 1), storing
    /// `v` in the Ethereum form (27 or 28).
    pub fn from_compact(rs: [u8; 64], recovery_id: u8) -> Self {
        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&rs);
        bytes[64] = recovery_id + 27;
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypesError> {
        let arr: [u8; 65] = bytes.try_into().map_err(|_| TypesError::InvalidLength {
            expected: Self::LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// The `r || s` part.
    pub fn compact(&self) -> &[u8] {
        &self.0[..64]
    }

    pub fn v(&self) -> u8 {
        self.0[64]
    }

    /// Normalised recovery id in `0..=1`.
    pub fn recovery_id(&self) -> Result<u8, TypesError> {
        match self.v() {
            0 | 1 => Ok(self.v()),
            27 | 28 => Ok(self.v() - 27),
            other => Err(TypesError::InvalidRecoveryId(other)),
        }
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(0x{}..)", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Signature {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_hex_fixed::<65>(s).map(Self)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
