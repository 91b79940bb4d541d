//! Identity hash derivation, as performed by the issuer service.

use crate::hash::keccak256_multi;
use attest_types::{IdentityHash, ProviderId};

/// `keccak256(provider_user_id || provider || secret)` over the UTF-8 strings.
///
/// The secret keeps identity hashes unlinkable to provider user ids for anyone
/// who does not hold it.
pub fn derive_identity_hash(
    provider_user_id: &str,
    provider: &ProviderId,
    secret: &str,
) -> IdentityHash {
    IdentityHash::new(keccak256_multi(&[
        provider_user_id.as_bytes(),
        provider.as_bytes(),
        secret.as_bytes(),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::keccak256;

    #[test]
    fn matches_string_concatenation() {
        let hash = derive_identity_hash("12345", &ProviderId::github(), "s3cret");
        assert_eq!(hash.as_bytes(), &keccak256(b"12345githubs3cret"));
    }

    #[test]
    fn provider_separates_identities() {
        let a = derive_identity_hash("12345", &ProviderId::github(), "s");
        let b = derive_identity_hash("12345", &ProviderId::proof_of_humanity(), "s");
        assert_ne!(a, b);
    }

    #[test]
    fn secret_changes_hash() {
        let a = derive_identity_hash("12345", &ProviderId::github(), "one");
        let b = derive_identity_hash("12345", &ProviderId::github(), "two");
        assert_ne!(a, b);
    }
}
