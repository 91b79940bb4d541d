//! Fixed secp256k1 keys so tests produce the same accounts every run.

use attest_crypto::IssuerKey;
use attest_types::Account;

const ISSUER_SEED: u8 = 0x11;
const OWNER_SEED: u8 = 0x22;
const OTHER_SEED: u8 = 0x33;

/// Deterministic key whose secret scalar is `[byte; 32]`.
///
/// Any byte in `1..=0xFE` gives a valid scalar.
pub fn fixed_key(byte: u8) -> IssuerKey {
    match IssuerKey::from_seed([byte; 32]) {
        Ok(key) => key,
        Err(err) => panic!("fixed test key 0x{byte:02x} is not a valid scalar: {err}"),
    }
}

/// The trusted issuer used throughout the tests.
pub fn fixed_issuer() -> IssuerKey {
    fixed_key(ISSUER_SEED)
}

/// The policy owner account.
pub fn fixed_owner() -> Account {
    fixed_key(OWNER_SEED).account()
}

/// A signer that is neither issuer nor owner, for forged proofs.
pub fn other_signer() -> IssuerKey {
    fixed_key(OTHER_SEED)
}
