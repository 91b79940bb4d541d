//! secp256k1 key handling and account derivation.

use crate::error::CryptoError;
use crate::hash::keccak256;
use crate::message::{eth_signed_message_hash, proof_message_hash};
use attest_types::{Account, IdentityHash, Proof, ProviderId, Signature, Timestamp};
use secp256k1::{Message, PublicKey, SecretKey, SECP256K1};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 32-byte secp256k1 secret scalar.
///
/// This type intentionally does not implement `Debug`, `Serialize`, or `Clone`
/// to prevent accidental exposure. Key bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from optionally `0x`-prefixed hex.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = hex::decode(digits).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let result = <[u8; 32]>::try_from(bytes.as_slice())
            .map(Self)
            .map_err(|_| {
                CryptoError::InvalidKey(format!("expected 32 bytes, got {}", bytes.len()))
            });
        bytes.zeroize();
        result
    }

    fn secret_key(&self) -> Result<SecretKey, CryptoError> {
        SecretKey::from_slice(&self.0).map_err(|e| CryptoError::InvalidKey(e.to_string()))
    }
}

/// Derive an account from a public key: the low 20 bytes of
/// `keccak256(uncompressed_key[1..])`.
pub fn account_from_public_key(public_key: &PublicKey) -> Account {
    let uncompressed = public_key.serialize_uncompressed();
    let digest = keccak256(&uncompressed[1..]);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest[12..]);
    Account::new(bytes)
}

/// The trusted issuer's signing key.
///
/// Holds the secret and its derived account. Signatures carry `v` in the
/// Ethereum form (27/28), matching what wallet libraries produce.
pub struct IssuerKey {
    private: PrivateKey,
    account: Account,
}

impl IssuerKey {
    pub fn from_private(private: PrivateKey) -> Result<Self, CryptoError> {
        let secret = private.secret_key()?;
        let public = PublicKey::from_secret_key(SECP256K1, &secret);
        Ok(Self {
            account: account_from_public_key(&public),
            private,
        })
    }

    /// Deterministic key from a 32-byte seed. The seed is used as the secret
    /// scalar directly, so it must be a valid non-zero scalar.
    pub fn from_seed(seed: [u8; 32]) -> Result<Self, CryptoError> {
        Self::from_private(PrivateKey::new(seed))
    }

    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        Self::from_private(PrivateKey::from_hex(s)?)
    }

    pub fn account(&self) -> Account {
        self.account
    }

    /// Sign a 32-byte digest as-is.
    pub fn sign_digest(&self, digest: [u8; 32]) -> Result<Signature, CryptoError> {
        let secret = self.private.secret_key()?;
        let message = Message::from_digest(digest);
        let recoverable = SECP256K1.sign_ecdsa_recoverable(&message, &secret);
        let (recovery_id, compact) = recoverable.serialize_compact();
        let rec = u8::try_from(recovery_id.to_i32())
            .map_err(|_| CryptoError::InvalidSignature("recovery id out of range".into()))?;
        Ok(Signature::from_compact(compact, rec))
    }

    /// Personal-sign arbitrary bytes (envelope + hash + sign).
    pub fn sign_message(&self, message: &[u8]) -> Result<Signature, CryptoError> {
        self.sign_digest(eth_signed_message_hash(message))
    }

    /// Sign the canonical proof message for the given fields.
    pub fn sign_proof(
        &self,
        account: &Account,
        identity_hash: &IdentityHash,
        timestamp: Timestamp,
        provider: &ProviderId,
    ) -> Result<Signature, CryptoError> {
        self.sign_message(&proof_message_hash(account, identity_hash, timestamp, provider))
    }

    /// Build a complete signed proof.
    pub fn issue(
        &self,
        account: Account,
        identity_hash: IdentityHash,
        timestamp: Timestamp,
        provider: ProviderId,
    ) -> Result<Proof, CryptoError> {
        let signature = self.sign_proof(&account, &identity_hash, timestamp, &provider)?;
        Ok(Proof {
            account,
            identity_hash,
            timestamp,
            provider_id: provider,
            signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn known_key_derives_known_account() {
        let key = IssuerKey::from_hex(KNOWN_KEY).unwrap();
        let expected: Account = "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23".parse().unwrap();
        assert_eq!(key.account(), expected);
    }

    #[test]
    fn seed_derivation_is_deterministic() {
        let a = IssuerKey::from_seed([7u8; 32]).unwrap();
        let b = IssuerKey::from_seed([7u8; 32]).unwrap();
        assert_eq!(a.account(), b.account());
        assert_ne!(a.account(), IssuerKey::from_seed([8u8; 32]).unwrap().account());
    }

    #[test]
    fn zero_seed_rejected() {
        assert!(matches!(
            IssuerKey::from_seed([0u8; 32]),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    #[test]
    fn bad_hex_rejected() {
        assert!(IssuerKey::from_hex("0x1234").is_err());
        assert!(IssuerKey::from_hex("not hex").is_err());
    }

    #[test]
    fn signatures_use_ethereum_v() {
        let key = IssuerKey::from_seed([9u8; 32]).unwrap();
        let sig = key.sign_digest([1u8; 32]).unwrap();
        assert!(sig.v() == 27 || sig.v() == 28);
    }

    #[test]
    fn signing_is_deterministic() {
        let key = IssuerKey::from_seed([9u8; 32]).unwrap();
        assert_eq!(
            key.sign_message(b"stamp").unwrap(),
            key.sign_message(b"stamp").unwrap()
        );
    }

    #[test]
    fn personal_sign_matches_web3_vector() {
        let key = IssuerKey::from_hex(KNOWN_KEY).unwrap();
        assert_eq!(
            hex::encode(eth_signed_message_hash(b"Some data")),
            "1da44b586eb0729ff70a73c326926f6ed5a25f5b056e7f47fbc6e58d86871655"
        );
        assert_eq!(
            key.sign_message(b"Some data").unwrap().to_string(),
            "0xb91467e570a6466aa9e9876cbcd013baba02900b8979d43fe208a4a4f339f5fd\
             6007e74cd82e037b800186422fc2da167c747ef045e5d18a5f5d4300f8e1a0291c"
        );
    }

    #[test]
    fn proof_signature_matches_known_vector() {
        let key = IssuerKey::from_hex(KNOWN_KEY).unwrap();
        let identity: IdentityHash =
            "090d4910f4b4038000f6ea86644d55cb5261a1dc1f006d928dcc049b157daff8"
                .parse()
                .unwrap();
        let proof = key
            .issue(
                key.account(),
                identity,
                Timestamp::new(1_700_000_000),
                ProviderId::github(),
            )
            .unwrap();
        assert_eq!(
            proof.signature.to_string(),
            "0x1ae729b18b56d8a937fab4a30dc47f397cf49c5eb3d77d296342ec45ea870769\
             732a55218f08ae2593e4a07e9d231024b711db163977688f9d025032948243911c"
        );
        let message =
            proof_message_hash(&proof.account, &identity, proof.timestamp, &proof.provider_id);
        assert_eq!(
            crate::sign::recover_signer(&message, &proof.signature).unwrap(),
            key.account()
        );
    }
}
