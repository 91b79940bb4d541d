//! Identity provider ids.

use crate::error::TypesError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A validated provider id such as `github` or `proofofhumanity`.
///
/// Only 1-32 characters of `[a-z0-9_-]` are accepted, so malformed ids are
/// rejected where they enter the system. Whether a well-formed id is one the
/// service accepts is decided by the configured provider set.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProviderId(String);

impl ProviderId {
    pub const MAX_LEN: usize = 32;

    pub const GITHUB: &'static str = "github";
    pub const PROOF_OF_HUMANITY: &'static str = "proofofhumanity";

    pub fn new(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        let well_formed = !s.is_empty()
            && s.len() <= Self::MAX_LEN
            && s
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-');
        if well_formed {
            Ok(Self(s))
        } else {
            Err(TypesError::InvalidProvider(s))
        }
    }

    pub fn github() -> Self {
        Self(Self::GITHUB.to_string())
    }

    pub fn proof_of_humanity() -> Self {
        Self(Self::PROOF_OF_HUMANITY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProviderId({})", self.0)
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProviderId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ProviderId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProviderId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_providers_are_well_formed() {
        assert_eq!(ProviderId::new("github").unwrap(), ProviderId::github());
        assert_eq!(
            ProviderId::new("proofofhumanity").unwrap(),
            ProviderId::proof_of_humanity()
        );
    }

    #[test]
    fn rejects_empty_and_oversized() {
        assert!(ProviderId::new("").is_err());
        assert!(ProviderId::new("a".repeat(33)).is_err());
        assert!(ProviderId::new("a".repeat(32)).is_ok());
    }

    #[test]
    fn rejects_uppercase_and_spaces() {
        assert!(ProviderId::new("notARealProvider").is_err());
        assert!(ProviderId::new("git hub").is_err());
    }

    #[test]
    fn deserialize_validates() {
        let ok: ProviderId = serde_json::from_str("\"github\"").unwrap();
        assert_eq!(ok.as_str(), "github");
        assert!(serde_json::from_str::<ProviderId>("\"GitHub\"").is_err());
    }
}
