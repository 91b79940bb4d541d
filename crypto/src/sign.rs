//! Signer recovery and proof signature checks.

use crate::error::CryptoError;
use crate::keys::account_from_public_key;
use crate::message::{eth_signed_message_hash, proof_message_hash};
use attest_types::{Account, IdentityHash, ProviderId, Signature, Timestamp};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, SECP256K1};

/// Recover the account that produced `signature` over an already-enveloped
/// 32-byte digest.
pub fn recover_digest(digest: [u8; 32], signature: &Signature) -> Result<Account, CryptoError> {
    let rec = signature
        .recovery_id()
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    let recovery_id = RecoveryId::from_i32(i32::from(rec))
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    let recoverable = RecoverableSignature::from_compact(signature.compact(), recovery_id)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    let public = SECP256K1
        .recover_ecdsa(&Message::from_digest(digest), &recoverable)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    Ok(account_from_public_key(&public))
}

/// Recover the signer of a personal-signed `message`.
pub fn recover_signer(message: &[u8], signature: &Signature) -> Result<Account, CryptoError> {
    recover_digest(eth_signed_message_hash(message), signature)
}

/// Checks proof signatures against the single trusted issuer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignatureVerifier {
    issuer: Account,
}

impl SignatureVerifier {
    pub fn new(issuer: Account) -> Self {
        Self { issuer }
    }

    pub fn issuer(&self) -> Account {
        self.issuer
    }

    /// Whether `signature` over `message` recovers to `expected`.
    pub fn verify_message(expected: &Account, message: &[u8], signature: &Signature) -> bool {
        recover_signer(message, signature).is_ok_and(|signer| &signer == expected)
    }

    /// Check a proof's signature, returning the reason on failure.
    pub fn check(
        &self,
        account: &Account,
        identity_hash: &IdentityHash,
        timestamp: Timestamp,
        provider: &ProviderId,
        signature: &Signature,
    ) -> Result<(), CryptoError> {
        let message = proof_message_hash(account, identity_hash, timestamp, provider);
        let recovered = recover_signer(&message, signature)?;
        if recovered != self.issuer {
            return Err(CryptoError::SignerMismatch {
                expected: self.issuer,
                recovered,
            });
        }
        Ok(())
    }

    /// Whether a proof's signature recovers to the trusted issuer.
    pub fn verify(
        &self,
        account: &Account,
        identity_hash: &IdentityHash,
        timestamp: Timestamp,
        provider: &ProviderId,
        signature: &Signature,
    ) -> bool {
        self.check(account, identity_hash, timestamp, provider, signature)
            .is_ok()
    }
}
