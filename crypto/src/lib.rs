//! Cryptographic primitives for the attestation engine.
//!
//! - **Keccak-256** for message digests, identity hashes and account derivation
//! - **secp256k1** ECDSA public-key recovery (Ethereum `personal_sign` flavour)
//! - Proof message canonicalisation, bit-compatible with Solidity
//!   `abi.encodePacked(address, string, uint256, string)`
//! - Issuer-side signing, so tests and tooling can mint proofs

pub mod error;
pub mod hash;
pub mod identity;
pub mod keys;
pub mod message;
pub mod sign;

pub use error::CryptoError;
pub use hash::{keccak256, keccak256_multi};
pub use identity::derive_identity_hash;
pub use keys::{account_from_public_key, IssuerKey, PrivateKey};
pub use message::{eth_signed_message_hash, pack_proof_message, proof_message_hash};
pub use sign::{recover_digest, recover_signer, SignatureVerifier};
