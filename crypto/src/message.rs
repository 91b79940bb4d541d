//! Proof message canonicalisation.
//!
//! The packed layout matches Solidity `abi.encodePacked(address, string,
//! uint256, string)`:
//!
//! ```text
//! account (20 raw bytes)
//! identity hash, textual lowercase hex (64 ASCII bytes)
//! timestamp (32-byte big-endian uint256)
//! provider id (UTF-8)
//! ```
//!
//! The issuer signs `keccak256("\x19Ethereum Signed Message:\n32" || keccak256(packed))`.
//! Any deviation in order or encoding makes every signature fail.

use crate::hash::{keccak256, keccak256_multi};
use attest_types::{Account, IdentityHash, ProviderId, Timestamp};

/// Prefix of the personal-message envelope, up to (not including) the length.
pub const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// Build the packed message bytes for a proof.
pub fn pack_proof_message(
    account: &Account,
    identity_hash: &IdentityHash,
    timestamp: Timestamp,
    provider: &ProviderId,
) -> Vec<u8> {
    let hash_text = identity_hash.to_hex();
    let mut packed =
        Vec::with_capacity(Account::LEN + hash_text.len() + 32 + provider.as_bytes().len());
    packed.extend_from_slice(account.as_bytes());
    packed.extend_from_slice(hash_text.as_bytes());
    packed.extend_from_slice(&timestamp.to_be_bytes_256());
    packed.extend_from_slice(provider.as_bytes());
    packed
}

/// `keccak256` of the packed proof message.
pub fn proof_message_hash(
    account: &Account,
    identity_hash: &IdentityHash,
    timestamp: Timestamp,
    provider: &ProviderId,
) -> [u8; 32] {
    keccak256(&pack_proof_message(account, identity_hash, timestamp, provider))
}

/// Wrap a message in the personal-message envelope and hash it again.
///
/// For a 32-byte message hash the envelope reads
/// `"\x19Ethereum Signed Message:\n32" || hash`.
pub fn eth_signed_message_hash(message: &[u8]) -> [u8; 32] {
    let len = message.len().to_string();
    keccak256_multi(&[PERSONAL_MESSAGE_PREFIX, len.as_bytes(), message])
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_HASH: &str = "090d4910f4b4038000f6ea86644d55cb5261a1dc1f006d928dcc049b157daff8";

    fn fixture() -> (Account, IdentityHash, Timestamp, ProviderId) {
        (
            Account::new([0x11; 20]),
            USER_HASH.parse().unwrap(),
            Timestamp::new(1_700_000_000),
            ProviderId::github(),
        )
    }

    #[test]
    fn packed_layout_is_exact() {
        let (account, hash, ts, provider) = fixture();
        let packed = pack_proof_message(&account, &hash, ts, &provider);

        assert_eq!(packed.len(), 20 + 64 + 32 + 6);
        assert_eq!(&packed[..20], &[0x11; 20]);
        assert_eq!(&packed[20..84], USER_HASH.as_bytes());
        assert_eq!(&packed[84..116], &ts.to_be_bytes_256());
        assert_eq!(&packed[116..], b"github");
    }

    #[test]
    fn every_field_affects_the_hash() {
        let (account, hash, ts, provider) = fixture();
        let base = proof_message_hash(&account, &hash, ts, &provider);

        assert_ne!(
            base,
            proof_message_hash(&Account::new([0x12; 20]), &hash, ts, &provider)
        );
        assert_ne!(
            base,
            proof_message_hash(&account, &IdentityHash::new([0; 32]), ts, &provider)
        );
        assert_ne!(
            base,
            proof_message_hash(&account, &hash, Timestamp::new(ts.as_secs() + 1), &provider)
        );
        assert_ne!(
            base,
            proof_message_hash(&account, &hash, ts, &ProviderId::proof_of_humanity())
        );
    }

    #[test]
    fn packed_hash_matches_solidity_sha3() {
        let account: Account = "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23".parse().unwrap();
        let hash: IdentityHash = USER_HASH.parse().unwrap();
        let digest = proof_message_hash(
            &account,
            &hash,
            Timestamp::new(1_700_000_000),
            &ProviderId::github(),
        );
        assert_eq!(
            hex::encode(digest),
            "e9d7863ed127a46b8849291c15541790734817d287b2bf56b40c31d1bb0cab7b"
        );
        assert_eq!(
            hex::encode(eth_signed_message_hash(&digest)),
            "5db02c66c53dbff3d2b2753f213a88cfd88a8c2a215f4bb0f271affc8c93262f"
        );
    }

    #[test]
    fn envelope_embeds_decimal_length() {
        let digest = [0xAA; 32];
        let mut manual = Vec::new();
        manual.extend_from_slice(b"\x19Ethereum Signed Message:\n32");
        manual.extend_from_slice(&digest);
        assert_eq!(eth_signed_message_hash(&digest), keccak256(&manual));
    }
}
